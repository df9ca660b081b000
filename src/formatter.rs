//! Produce the strings that are printed for the balances view.
//! The formatting consists in aligning the members into columns and
//! composing the actual output string.

use std::iter::repeat;

use crate::types::{MemberLedger, Settlement};

pub fn format_ledger(ledger: &[MemberLedger]) -> String {
    if ledger.is_empty() {
        "Nothing to show!".to_string()
    } else {
        let max_name_length = ledger
            .iter()
            .map(|l| l.member_name.len())
            .max()
            .expect("just checked the ledger is non-empty!");
        ledger
            .iter()
            .map(|l| format_ledger_entry(l, max_name_length))
            .fold(String::new(), |a, b| a + &b + "\n")
    }
}

fn format_ledger_entry(entry: &MemberLedger, target_length: usize) -> String {
    let sign = if entry.net_balance >= 0.0 { "+" } else { "-" };
    format!(
        "{}  start ₹{:.2} RM {:.2}  paid ₹{:.2}  owes ₹{:.2}  net {}₹{:.2}",
        pad(&entry.member_name, target_length),
        entry.starting_balance_inr,
        entry.starting_balance_myr,
        entry.total_spent,
        entry.total_share,
        sign,
        entry.net_balance.abs()
    )
}

pub fn format_settlements(settlements: &[Settlement]) -> String {
    if settlements.is_empty() {
        "All clean!".to_string()
    } else {
        let max_debtor_length = settlements
            .iter()
            .map(|s| s.from_member_name.len())
            .max()
            .expect("just checked there are settlements!");
        settlements
            .iter()
            .map(|s| format_settlement(s, max_debtor_length))
            .fold(String::new(), |a, b| a + &b + "\n")
    }
}

fn format_settlement(settlement: &Settlement, target_length: usize) -> String {
    format!(
        "💰  {} 💸  ₹{:.2} (RM {:.2})  {} 🤑",
        pad(&settlement.from_member_name, target_length),
        settlement.amount,
        settlement.amount_in_myr,
        settlement.to_member_name
    )
}

/// We make sure that the amounts are always aligned, by padding the names
/// where needed.
fn pad(name: &str, target_length: usize) -> String {
    if name.len() < target_length {
        name.to_string() + &make_string_of_char(' ', target_length - name.len())
    } else {
        name.to_string()
    }
}

fn make_string_of_char(c: char, length: usize) -> String {
    repeat(c).take(length).collect::<String>()
}
