//! Construction of the per-member ledger from the trip snapshot.

use crate::engine::TOLERANCE;
use crate::error::ConsistencyError;
use crate::types::{Currency, Expense, Member, MemberLedger};

/// Build the per-member ledger: starting balances, total paid, total owed
/// and the resulting net balance, everything but the raw starting amounts
/// expressed in base currency.
///
/// MYR starting balances are converted with the member's own override rate
/// when one was recorded, otherwise with *current_myr_rate*. The output
/// preserves the member order of the input.
pub fn build_ledger(
    members: &[Member],
    expenses: &[Expense],
    current_myr_rate: f64,
) -> Vec<MemberLedger> {
    members
        .iter()
        .map(|member| {
            let starting_inr = starting_amount(member, Currency::Inr);
            let starting_myr = starting_amount(member, Currency::Myr);
            let starting_in_base = starting_balance_in_base(member, current_myr_rate);

            let total_spent: f64 = expenses
                .iter()
                .filter(|e| e.paid_by_id == member.id)
                .map(|e| e.amount_in_base)
                .sum();

            let total_share: f64 = expenses
                .iter()
                .flat_map(|e| &e.shares)
                .filter(|s| s.member_id == member.id)
                .map(|s| s.amount_in_base)
                .sum();

            MemberLedger {
                member_id: member.id.clone(),
                member_name: member.name.clone(),
                starting_balance_inr: starting_inr,
                starting_balance_myr: starting_myr,
                total_spent,
                total_share,
                net_balance: starting_in_base + total_spent - total_share,
            }
        })
        .collect()
}

/// Expenses are zero-sum transfers among members, so the net balances must
/// add up to the base-converted starting totals. A deviation beyond
/// tolerance points at a share-allocation bug and is reported, never
/// corrected.
pub fn check_ledger_consistency(
    members: &[Member],
    ledger: &[MemberLedger],
    current_myr_rate: f64,
) -> Result<(), ConsistencyError> {
    let starting_total: f64 = members
        .iter()
        .map(|m| starting_balance_in_base(m, current_myr_rate))
        .sum();
    let net_total: f64 = ledger.iter().map(|l| l.net_balance).sum();

    let deviation = net_total - starting_total;
    if deviation.abs() > TOLERANCE {
        Err(ConsistencyError::UnbalancedLedger(deviation))
    } else {
        Ok(())
    }
}

fn starting_amount(member: &Member, currency: Currency) -> f64 {
    member
        .balances
        .iter()
        .filter(|b| b.currency == currency)
        .map(|b| b.amount)
        .sum()
}

fn starting_balance_in_base(member: &Member, current_myr_rate: f64) -> f64 {
    member
        .balances
        .iter()
        .map(|b| {
            if b.currency.is_base() {
                b.amount
            } else {
                b.amount * b.fx_rate.unwrap_or(current_myr_rate)
            }
        })
        .sum()
}
