use chrono::NaiveDate;
use thiserror::Error;

use crate::types::Currency;

/// Errors raised when the input of a share allocation (or another write
/// operation) does not satisfy its preconditions.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("there are no participants in this expense")]
    NoParticipants,

    #[error("invalid expense amount `{0}`: the amount must be positive")]
    NonPositiveAmount(f64),

    #[error(
        "the split configuration has {config} entries but the expense \
             has {participants} participants: every participant needs exactly one entry"
    )]
    SplitConfigCardinality { config: usize, participants: usize },

    #[error("`{0}` appears in the split configuration but is not a participant")]
    SplitConfigUnknownMember(String),

    #[error("participant `{0}` appears more than once in the split configuration")]
    SplitConfigDuplicateMember(String),

    #[error(
        "fixed split values sum to {actual:.2} but the expense amount \
             is {expected:.2}: they must match"
    )]
    FixedSumMismatch { expected: f64, actual: f64 },

    #[error("percentage split values sum to {0:.2}: they must sum to 100")]
    PercentageSumMismatch(f64),

    #[error("weight split values sum to {0:.2}: the total weight must be positive")]
    NonPositiveWeightSum(f64),

    #[error("invalid FX rate `{0}`: the rate must be positive")]
    NonPositiveRate(f64),

    #[error("`{0}` is not a member of this trip")]
    UnknownMember(String),
}

/// Raised by the FX resolver when the rate series has no applicable entry.
/// The fallback policy belongs to the caller, not to the resolver.
#[derive(Error, Debug)]
pub enum RateError {
    #[error("no {currency:?} rate on record on or before {as_of}")]
    NotFound { currency: Currency, as_of: NaiveDate },
}

/// Raised when a derived view violates a global invariant. This is a
/// diagnostic: the computation is returned anyway, never silently corrected.
#[derive(Error, Debug)]
pub enum ConsistencyError {
    #[error(
        "ledger net balances deviate from the starting totals by {0:.2}: \
             this points at a share-allocation bug"
    )]
    UnbalancedLedger(f64),
}
