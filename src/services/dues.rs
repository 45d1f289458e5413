//! Due-payment calculation.
//!
//! Pure functions over a year's monthly entries. A month whose entry is
//! non-empty is "active" (billing has started), even when the entry is "0";
//! the due amount is what the active months should have produced minus what
//! was actually paid, never negative, plus whatever balance rolled over from
//! the previous year.
//!
//! These functions never fail: malformed numeric strings are coerced to 0 so
//! that one bad historical entry can never block a tenant from getting an
//! updated balance. Input validation belongs to the handler layer.

use crate::models::{Month, MonthlyMap};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Whether billing has started for a month's entry.
pub fn is_active(entry: &str) -> bool {
    !entry.trim().is_empty()
}

/// Parse an entered amount, coercing empty or malformed strings to 0.
fn parse_amount(entry: &str) -> Decimal {
    Decimal::from_str(entry.trim()).unwrap_or(Decimal::ZERO)
}

/// Compute the outstanding balance for one year of entries.
///
/// `previous_year_due` is the prior tracked year's final due, supplied only
/// for years after the tenant's first tracked year; it is added flat, with
/// no amortization. The result is rounded half-up at the cent boundary.
pub fn due_payment(
    expected_monthly: Decimal,
    payments: &MonthlyMap,
    previous_year_due: Option<Decimal>,
) -> Decimal {
    let mut active_months = 0u32;
    let mut paid_total = Decimal::ZERO;

    for (_, entry) in payments.iter() {
        if is_active(entry) {
            active_months += 1;
            paid_total += parse_amount(entry);
        }
    }

    let expected_total = Decimal::from(active_months) * expected_monthly;
    let current_year_due = (expected_total - paid_total).max(Decimal::ZERO);
    let total_due = current_year_due + previous_year_due.unwrap_or(Decimal::ZERO);

    // Half-up at the cent boundary, then pin the scale so the persisted
    // figure always reads as a two-decimal amount.
    let mut rounded = total_due.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Backfill every blank month before `through` with an explicit "0".
///
/// Billing is assumed contiguous from the first active month: entering a
/// value for month N marks every earlier blank month as billed-but-unpaid.
/// This runs on the caller side before recomputation; the calculator itself
/// only ever sees the map it is handed. Returns how many months were filled.
pub fn fill_forward(payments: &mut MonthlyMap, through: Month) -> usize {
    let mut filled = 0;
    for month in Month::ALL {
        if month >= through {
            break;
        }
        if payments.is_blank(month) {
            payments.set(month, "0");
            filled += 1;
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entries(pairs: &[(Month, &str)]) -> MonthlyMap {
        let mut map = MonthlyMap::default();
        for (month, value) in pairs {
            map.set(*month, *value);
        }
        map
    }

    #[test]
    fn all_empty_entries_owe_nothing() {
        let map = MonthlyMap::default();
        assert_eq!(due_payment(dec!(1000), &map, None), Decimal::ZERO);
        assert_eq!(due_payment(dec!(0.01), &map, None), Decimal::ZERO);
    }

    #[test]
    fn fully_paid_months_owe_nothing() {
        let map = entries(&[
            (Month::January, "1000"),
            (Month::February, "1200"),
            (Month::March, "1000"),
        ]);
        assert_eq!(due_payment(dec!(1000), &map, None), Decimal::ZERO);
    }

    #[test]
    fn partial_payment_scenario() {
        // expected 1000; Jan fully paid, Feb half paid: 2 active months,
        // expected 2000, paid 1500, due 500.
        let map = entries(&[(Month::January, "1000"), (Month::February, "500")]);
        assert_eq!(due_payment(dec!(1000), &map, None), dec!(500.00));
    }

    #[test]
    fn zero_entries_count_as_active() {
        // "0" means billed but unpaid, not "not yet billed".
        let map = entries(&[
            (Month::January, "0"),
            (Month::February, "0"),
            (Month::March, "1000"),
        ]);
        assert_eq!(due_payment(dec!(1000), &map, None), dec!(2000.00));
    }

    #[test]
    fn carry_in_flows_through_an_untouched_year() {
        let map = MonthlyMap::default();
        assert_eq!(due_payment(dec!(500), &map, Some(dec!(750))), dec!(750.00));
    }

    #[test]
    fn carry_in_is_additive() {
        let map = entries(&[(Month::January, "250"), (Month::February, "")]);
        let base = due_payment(dec!(400), &map, None);
        for prev in [dec!(0), dec!(1), dec!(750.25), dec!(100000)] {
            assert_eq!(due_payment(dec!(400), &map, Some(prev)), base + prev);
        }
    }

    #[test]
    fn overpayment_clamps_to_zero_not_negative() {
        let map = entries(&[(Month::January, "5000")]);
        assert_eq!(due_payment(dec!(1000), &map, None), Decimal::ZERO);
        // Overpayment does not eat into the carried balance either.
        assert_eq!(due_payment(dec!(1000), &map, Some(dec!(300))), dec!(300.00));
    }

    #[test]
    fn pure_function_is_idempotent() {
        let map = entries(&[(Month::January, "123.45"), (Month::June, "7")]);
        let first = due_payment(dec!(333.33), &map, Some(dec!(12)));
        let second = due_payment(dec!(333.33), &map, Some(dec!(12)));
        assert_eq!(first, second);
    }

    #[test]
    fn raising_a_payment_never_raises_the_due() {
        let base = entries(&[
            (Month::January, "100"),
            (Month::February, "0"),
            (Month::March, "250"),
        ]);
        let before = due_payment(dec!(500), &base, Some(dec!(80)));

        let mut bumped = base.clone();
        bumped.set(Month::February, "400");
        let after = due_payment(dec!(500), &bumped, Some(dec!(80)));

        assert!(after <= before);
    }

    #[test]
    fn malformed_entries_coerce_to_zero_but_stay_active() {
        // "abc" is active (billing started) but contributes nothing paid.
        let map = entries(&[(Month::January, "abc"), (Month::February, "1000")]);
        assert_eq!(due_payment(dec!(1000), &map, None), dec!(1000.00));
    }

    #[test]
    fn whitespace_only_entries_are_not_active() {
        let map = entries(&[(Month::January, "   ")]);
        assert_eq!(due_payment(dec!(1000), &map, None), Decimal::ZERO);
    }

    #[test]
    fn rounds_half_up_on_the_cent() {
        // 1 active month at 100.005 expected, nothing paid.
        let map = entries(&[(Month::January, "0")]);
        assert_eq!(due_payment(dec!(100.005), &map, None), dec!(100.01));
        assert_eq!(due_payment(dec!(100.004), &map, None), dec!(100.00));
    }

    #[test]
    fn fill_forward_backfills_blank_earlier_months() {
        let mut map = entries(&[(Month::June, "200")]);
        let filled = fill_forward(&mut map, Month::June);
        assert_eq!(filled, 5);
        for month in [
            Month::January,
            Month::February,
            Month::March,
            Month::April,
            Month::May,
        ] {
            assert_eq!(map.get(month), "0");
        }
        // June itself and later months are untouched.
        assert_eq!(map.get(Month::June), "200");
        assert_eq!(map.get(Month::July), "");

        // Jan-May now active: 6 active months, 5 unpaid.
        assert_eq!(due_payment(dec!(100), &map, None), dec!(400.00));
    }

    #[test]
    fn fill_forward_preserves_existing_entries() {
        let mut map = entries(&[(Month::February, "150"), (Month::April, "75")]);
        let filled = fill_forward(&mut map, Month::April);
        assert_eq!(filled, 2); // January and March only
        assert_eq!(map.get(Month::February), "150");
        assert_eq!(map.get(Month::January), "0");
        assert_eq!(map.get(Month::March), "0");
    }

    #[test]
    fn fill_forward_for_january_is_a_no_op() {
        let mut map = MonthlyMap::default();
        assert_eq!(fill_forward(&mut map, Month::January), 0);
        assert_eq!(map, MonthlyMap::default());
    }
}
