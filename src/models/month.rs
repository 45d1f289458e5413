//! Calendar months and the per-year month-keyed value maps.
//!
//! Payment records store one string per month. An empty string means
//! "not yet billed"; `"0"` means billed but unpaid, which is a different
//! thing for due calculation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month. Ordering follows the calendar, January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Zero-based position in the calendar year.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a month name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthError(pub String);

impl fmt::Display for ParseMonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a calendar month", self.0)
    }
}

impl std::error::Error for ParseMonthError {}

impl FromStr for Month {
    type Err = ParseMonthError;

    /// Case-insensitive parse of the full English month name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMonthError(s.to_string()))
    }
}

/// One string value per calendar month, persisted as a document keyed by
/// month name (`{ "January": "1000", ... }`), matching the payment record
/// layout tenants see in exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyMap {
    #[serde(rename = "January", default)]
    pub january: String,
    #[serde(rename = "February", default)]
    pub february: String,
    #[serde(rename = "March", default)]
    pub march: String,
    #[serde(rename = "April", default)]
    pub april: String,
    #[serde(rename = "May", default)]
    pub may: String,
    #[serde(rename = "June", default)]
    pub june: String,
    #[serde(rename = "July", default)]
    pub july: String,
    #[serde(rename = "August", default)]
    pub august: String,
    #[serde(rename = "September", default)]
    pub september: String,
    #[serde(rename = "October", default)]
    pub october: String,
    #[serde(rename = "November", default)]
    pub november: String,
    #[serde(rename = "December", default)]
    pub december: String,
}

impl MonthlyMap {
    /// A map with every month set to the same value. Used to seed remarks
    /// with their "N/A" default.
    pub fn filled(value: &str) -> Self {
        let mut map = Self::default();
        for month in Month::ALL {
            map.set(month, value);
        }
        map
    }

    pub fn get(&self, month: Month) -> &str {
        match month {
            Month::January => &self.january,
            Month::February => &self.february,
            Month::March => &self.march,
            Month::April => &self.april,
            Month::May => &self.may,
            Month::June => &self.june,
            Month::July => &self.july,
            Month::August => &self.august,
            Month::September => &self.september,
            Month::October => &self.october,
            Month::November => &self.november,
            Month::December => &self.december,
        }
    }

    pub fn set(&mut self, month: Month, value: impl Into<String>) {
        let slot = match month {
            Month::January => &mut self.january,
            Month::February => &mut self.february,
            Month::March => &mut self.march,
            Month::April => &mut self.april,
            Month::May => &mut self.may,
            Month::June => &mut self.june,
            Month::July => &mut self.july,
            Month::August => &mut self.august,
            Month::September => &mut self.september,
            Month::October => &mut self.october,
            Month::November => &mut self.november,
            Month::December => &mut self.december,
        };
        *slot = value.into();
    }

    /// Iterate months in calendar order with their values.
    pub fn iter(&self) -> impl Iterator<Item = (Month, &str)> + '_ {
        Month::ALL.into_iter().map(move |m| (m, self.get(m)))
    }

    /// True when no entry has been made for the month (empty or whitespace).
    pub fn is_blank(&self, month: Month) -> bool {
        self.get(month).trim().is_empty()
    }
}
