//! Selection of the applicable exchange rate from the trip's rate series.

use chrono::NaiveDate;

use crate::error::RateError;
use crate::types::{Currency, FxRate};

/// Resolve the exchange rate for *currency* as of *as_of*.
///
/// The applicable rate is the entry with the latest date that is not after
/// *as_of*. When two entries share that date, the one appearing later in the
/// series wins, so re-entering a rate for the same day overrides the old one.
///
/// The base currency always resolves to exactly 1 without consulting the
/// series. When no entry applies the caller decides on a fallback; the
/// resolver itself has no default.
pub fn resolve_rate(
    rates: &[FxRate],
    currency: Currency,
    as_of: NaiveDate,
) -> Result<f64, RateError> {
    if currency.is_base() {
        return Ok(1.0);
    }

    rates
        .iter()
        .filter(|r| r.currency == currency && r.date <= as_of)
        .max_by_key(|r| r.date)
        .map(|r| r.rate)
        .ok_or(RateError::NotFound { currency, as_of })
}
