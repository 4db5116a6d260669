//! Pricing calculator
//!
//! Pure cost computation for a stay: nightly subtotal, service fee, tax on
//! the fee-inclusive amount, grand total. The computation order is fixed
//! because each line is rounded to cents independently; reordering changes
//! totals by a cent on some inputs.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Platform fee rates applied on top of the nightly price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRates {
    /// Service fee as a fraction of the subtotal.
    pub service_fee_rate: Decimal,
    /// Tax rate applied to subtotal + service fee + cleaning fee.
    pub tax_rate: Decimal,
}

impl Default for PricingRates {
    fn default() -> Self {
        Self {
            service_fee_rate: dec!(0.03),
            tax_rate: dec!(0.10),
        }
    }
}

/// Cost breakdown for a stay, every amount rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PricingQuote {
    pub subtotal: Decimal,
    pub cleaning_fee: Decimal,
    pub service_fee: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl PricingRates {
    /// Quote a stay of `nights` nights.
    ///
    /// Caller precondition: `nights > 0` (range validation belongs to the
    /// booking service, this is a pure function that trusts its inputs).
    ///
    /// Fixed order: subtotal, then service fee on the subtotal, then tax on
    /// subtotal + service fee + cleaning fee, then the total. Each monetary
    /// output is rounded to 2 decimal places independently, never derived
    /// from unrounded intermediates.
    pub fn quote(&self, price_per_night: Decimal, nights: i64, cleaning_fee: Decimal) -> PricingQuote {
        let subtotal = round_cents(price_per_night * Decimal::from(nights));
        let service_fee = round_cents(subtotal * self.service_fee_rate);
        let cleaning_fee = round_cents(cleaning_fee);
        let tax = round_cents((subtotal + service_fee + cleaning_fee) * self.tax_rate);
        let total = round_cents(subtotal + cleaning_fee + service_fee + tax);

        PricingQuote {
            subtotal,
            cleaning_fee,
            service_fee,
            tax,
            total,
        }
    }
}

/// Round a monetary amount to cents, half-up.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of billable nights in `[check_in, check_out)`.
///
/// Partial days count as a full night: `ceil((check_out - check_in) / 1 day)`.
pub fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    let seconds = (check_out - check_in).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + 86_399) / 86_400
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn reference_quote() {
        // 100/night x 3 nights + 50 cleaning at default rates.
        let q = PricingRates::default().quote(dec!(100), 3, dec!(50));
        assert_eq!(q.subtotal, dec!(300.00));
        assert_eq!(q.service_fee, dec!(9.00));
        assert_eq!(q.cleaning_fee, dec!(50.00));
        assert_eq!(q.tax, dec!(35.90));
        assert_eq!(q.total, dec!(394.90));
    }

    #[test]
    fn total_equals_sum_of_rounded_components() {
        let rates = PricingRates::default();
        for (price, nights, cleaning) in [
            (dec!(99.99), 1, dec!(0)),
            (dec!(133.33), 7, dec!(45.50)),
            (dec!(250.01), 14, dec!(120)),
            (dec!(1), 1, dec!(0.01)),
        ] {
            let q = rates.quote(price, nights, cleaning);
            assert_eq!(
                q.total,
                q.subtotal + q.cleaning_fee + q.service_fee + q.tax,
                "price={price} nights={nights}"
            );
            // Everything already at cent precision.
            assert_eq!(q.tax, round_cents(q.tax));
            assert_eq!(q.total, round_cents(q.total));
        }
    }

    #[test]
    fn tax_includes_fees_not_just_subtotal() {
        let q = PricingRates::default().quote(dec!(100), 1, dec!(100));
        // (100 + 3 + 100) * 0.10, not 100 * 0.10
        assert_eq!(q.tax, dec!(20.30));
    }

    #[test]
    fn zero_cleaning_fee() {
        let q = PricingRates::default().quote(dec!(80), 2, dec!(0));
        assert_eq!(q.subtotal, dec!(160.00));
        assert_eq!(q.service_fee, dec!(4.80));
        assert_eq!(q.tax, dec!(16.48));
        assert_eq!(q.total, dec!(181.28));
    }

    #[test]
    fn quote_is_deterministic() {
        let rates = PricingRates::default();
        let a = rates.quote(dec!(123.45), 5, dec!(67.89));
        let b = rates.quote(dec!(123.45), 5, dec!(67.89));
        assert_eq!(a, b);
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn whole_days_count_exactly() {
        assert_eq!(nights_between(at(2025, 6, 1, 14), at(2025, 6, 4, 14)), 3);
        assert_eq!(nights_between(at(2025, 6, 1, 0), at(2025, 6, 2, 0)), 1);
    }

    #[test]
    fn partial_day_rounds_up() {
        // 14:00 check-in, 11:00 check-out three days later: 2d21h -> 3 nights
        assert_eq!(nights_between(at(2025, 6, 1, 14), at(2025, 6, 4, 11)), 3);
        // A few hours still bill one night
        assert_eq!(nights_between(at(2025, 6, 1, 14), at(2025, 6, 1, 18)), 1);
    }

    #[test]
    fn inverted_or_empty_range_is_zero_nights() {
        assert_eq!(nights_between(at(2025, 6, 4, 0), at(2025, 6, 1, 0)), 0);
        assert_eq!(nights_between(at(2025, 6, 1, 0), at(2025, 6, 1, 0)), 0);
    }
}
