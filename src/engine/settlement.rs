//! Reduction of net balances into the money transfers that settle them.

use log::warn;

use crate::engine::TOLERANCE;
use crate::types::{MemberLedger, Settlement};

/// Get the list of transfers that settle the debts described by the ledger.
///
/// The algorithm works as follows:
/// - split the ledger into creditors (positive net balance) and debtors
///   (negative net balance), ignoring anyone within tolerance of zero
/// - repeatedly match the largest remaining creditor with the largest
///   remaining debtor and transfer the smaller of the two magnitudes
/// - stop when either side runs out
///
/// Every transfer zeroes out at least one member, so the result holds at
/// most `creditors + debtors - 1` transfers. The solution is correct but
/// not necessarily optimal: the truly minimal transfer set is NP-hard to
/// find and this greedy approximation is normally good enough.
///
/// When two members have the same remaining magnitude, the one earlier in
/// ledger order is matched first, which keeps the output deterministic for
/// a given snapshot. Transfer amounts are settled in base currency; the MYR
/// figure on each transfer is derived from *current_myr_rate* for display
/// only.
pub fn reduce_to_settlements(ledger: &[MemberLedger], current_myr_rate: f64) -> Vec<Settlement> {
    // Entries are (ledger index, remaining magnitude).
    let mut creditors: Vec<(usize, f64)> = ledger
        .iter()
        .enumerate()
        .filter_map(|(i, l)| (l.net_balance > TOLERANCE).then(|| (i, l.net_balance)))
        .collect();
    let mut debtors: Vec<(usize, f64)> = ledger
        .iter()
        .enumerate()
        .filter_map(|(i, l)| (l.net_balance < -TOLERANCE).then(|| (i, -l.net_balance)))
        .collect();

    let mut result = vec![];

    while !creditors.is_empty() && !debtors.is_empty() {
        let ci = index_of_largest(&creditors);
        let di = index_of_largest(&debtors);
        let credit = creditors[ci].1;
        let debt = debtors[di].1;
        let amount = credit.min(debt);

        result.push(Settlement::new(
            &ledger[debtors[di].0],
            &ledger[creditors[ci].0],
            amount,
            current_myr_rate,
        ));

        creditors[ci].1 -= amount;
        debtors[di].1 -= amount;
        if creditors[ci].1 <= TOLERANCE {
            creditors.swap_remove(ci);
        }
        if debtors[di].1 <= TOLERANCE {
            debtors.swap_remove(di);
        }
    }

    if !creditors.is_empty() {
        warn!(
            "We run out of debtors but we still have creditors: {:?}",
            creditors
        );
    } else if !debtors.is_empty() {
        warn!(
            "We run out of creditors but we still have debtors: {:?}",
            debtors
        );
    }

    result
}

/// Position of the entry with the largest remaining magnitude, breaking ties
/// by the smaller ledger index.
fn index_of_largest(entries: &[(usize, f64)]) -> usize {
    let mut best = 0;
    for (i, entry) in entries.iter().enumerate().skip(1) {
        let (best_ledger_idx, best_amount) = entries[best];
        if entry.1 > best_amount || (entry.1 == best_amount && entry.0 < best_ledger_idx) {
            best = i;
        }
    }
    best
}
