pub mod client;
pub mod month;
pub mod record;
pub mod type_label;
pub mod year;

pub use client::Client;
pub use month::{Month, MonthlyMap, ParseMonthError};
pub use record::{PaymentRecord, DEFAULT_REMARK};
pub use type_label::TypeLabel;
pub use year::TrackedYear;
