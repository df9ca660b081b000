//! Functions that check the validity of an expense before shares
//! are allocated.
//!
//! The original frontend ran these checks in the form and trusted the
//! allocator input; here the allocator calls them itself, so a bad split
//! configuration can never produce a silent partial allocation.

use std::collections::HashSet;

use crate::engine::TOLERANCE;
use crate::error::ValidationError;
use crate::types::{Member, SplitConfig};

pub fn validate_participants(participants: &[Member]) -> Result<(), ValidationError> {
    if participants.is_empty() {
        Err(ValidationError::NoParticipants)
    } else {
        Ok(())
    }
}

pub fn validate_amount(amount: f64) -> Result<(), ValidationError> {
    if amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount(amount))
    }
}

/// Check that the split configuration covers the participant set exactly:
/// one entry per participant, no strangers, no duplicates.
pub fn validate_split_config(
    participants: &[Member],
    split_config: &[SplitConfig],
) -> Result<(), ValidationError> {
    if split_config.len() != participants.len() {
        return Err(ValidationError::SplitConfigCardinality {
            config: split_config.len(),
            participants: participants.len(),
        });
    }

    let participant_ids: HashSet<_> = participants.iter().map(|m| &m.id).collect();
    let mut seen = HashSet::new();
    for entry in split_config {
        if !participant_ids.contains(&entry.member_id) {
            return Err(ValidationError::SplitConfigUnknownMember(
                entry.member_id.clone(),
            ));
        }
        if !seen.insert(&entry.member_id) {
            return Err(ValidationError::SplitConfigDuplicateMember(
                entry.member_id.clone(),
            ));
        }
    }

    Ok(())
}

/// Fixed splits are a user-facing contract: the values must sum to the
/// expense amount, within one cent.
pub fn validate_fixed_sum(amount: f64, split_config: &[SplitConfig]) -> Result<(), ValidationError> {
    let total: f64 = split_config.iter().map(|sc| sc.value).sum();
    if (total - amount).abs() > TOLERANCE {
        Err(ValidationError::FixedSumMismatch {
            expected: amount,
            actual: total,
        })
    } else {
        Ok(())
    }
}

pub fn validate_percentage_sum(split_config: &[SplitConfig]) -> Result<(), ValidationError> {
    let total: f64 = split_config.iter().map(|sc| sc.value).sum();
    if (total - 100.0).abs() > TOLERANCE {
        Err(ValidationError::PercentageSumMismatch(total))
    } else {
        Ok(())
    }
}

/// Weights are normalized, so any combination with a positive total is legal.
pub fn validate_weight_sum(split_config: &[SplitConfig]) -> Result<(), ValidationError> {
    let total: f64 = split_config.iter().map(|sc| sc.value).sum();
    if total > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveWeightSum(total))
    }
}

pub fn validate_rate(rate: f64) -> Result<(), ValidationError> {
    if rate > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveRate(rate))
    }
}
