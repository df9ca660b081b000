//! Orchestration between the datastore and the engine.
//!
//! These handlers own the fetch-compute-persist choreography: they gather a
//! consistent snapshot from the store, run the pure engine functions over it
//! and write results back. Derived views are never cached; every call
//! recomputes from the freshest snapshot.

use chrono::{NaiveDate, Utc};
use log::warn;

use crate::engine::ledger::{build_ledger, check_ledger_consistency};
use crate::engine::rates::resolve_rate;
use crate::engine::settlement::reduce_to_settlements;
use crate::engine::shares::allocate;
use crate::error::ValidationError;
use crate::store::Datastore;
use crate::types::{
    Currency, Expense, FxRate, Member, MemberLedger, NewExpense, Settlement, SplitConfig,
    SplitMethod,
};
use crate::validator::validate_rate;

/// Rate applied when the trip has no usable MYR entry yet. This mirrors the
/// default the original trip forms used; it is a policy of this layer, not
/// of the resolver.
pub const DEFAULT_MYR_RATE: f64 = 19.0;

/// Everything the balances view needs, computed from one snapshot.
pub struct SettlementView {
    pub ledger: Vec<MemberLedger>,
    pub settlements: Vec<Settlement>,
    pub current_rate: f64,
}

/// Resolve the rate for *currency* as of *date*, falling back to the
/// default when the series has no applicable entry.
fn rate_or_default(rates: &[FxRate], currency: Currency, date: NaiveDate) -> f64 {
    match resolve_rate(rates, currency, date) {
        Ok(rate) => rate,
        Err(e) => {
            warn!("{e}; falling back to the default rate {DEFAULT_MYR_RATE}");
            DEFAULT_MYR_RATE
        }
    }
}

/// Allocate and persist a new expense.
///
/// The split is computed before anything is written, so a validation failure
/// leaves the store untouched, and the same allocation path can serve a
/// preview without persisting.
#[allow(clippy::too_many_arguments)]
pub async fn handle_add_expense<D: Datastore>(
    store: &D,
    trip_id: &str,
    paid_by_id: &str,
    amount: f64,
    currency: Currency,
    description: &str,
    date: NaiveDate,
    method: SplitMethod,
    participant_ids: &[String],
    split_config: &[SplitConfig],
) -> anyhow::Result<Expense> {
    let members = store.list_members(trip_id).await?;

    if !members.iter().any(|m| m.id == paid_by_id) {
        return Err(ValidationError::UnknownMember(paid_by_id.to_string()).into());
    }
    let participants = select_participants(&members, participant_ids)?;

    let rates = store.list_fx_rates(trip_id).await?;
    let fx_rate = rate_or_default(&rates, currency, date);

    let shares = allocate(&participants, amount, currency, fx_rate, method, split_config)?;

    let expense = NewExpense {
        trip_id: trip_id.to_string(),
        paid_by_id: paid_by_id.to_string(),
        amount,
        currency,
        description: description.to_string(),
        date,
        split_method: method,
        fx_rate,
        shares,
    };
    store.create_expense(expense).await
}

/// Compute the balances view for a trip: per-member ledger plus the
/// transfers that settle it.
pub async fn handle_settlement<D: Datastore>(
    store: &D,
    trip_id: &str,
) -> anyhow::Result<SettlementView> {
    let members = store.list_members(trip_id).await?;
    let expenses = store.list_expenses(trip_id).await?;
    let rates = store.list_fx_rates(trip_id).await?;

    let today = Utc::now().date_naive();
    let current_rate = rate_or_default(&rates, Currency::Myr, today);

    let ledger = build_ledger(&members, &expenses, current_rate);
    if let Err(e) = check_ledger_consistency(&members, &ledger, current_rate) {
        // Diagnostic only: the view is still returned as computed.
        warn!("{e}");
    }
    let settlements = reduce_to_settlements(&ledger, current_rate);

    Ok(SettlementView {
        ledger,
        settlements,
        current_rate,
    })
}

pub async fn handle_set_member_balance<D: Datastore>(
    store: &D,
    trip_id: &str,
    member_id: &str,
    currency: Currency,
    amount: f64,
    fx_rate: Option<f64>,
) -> anyhow::Result<()> {
    if let Some(rate) = fx_rate {
        validate_rate(rate)?;
    }
    let members = store.list_members(trip_id).await?;
    if !members.iter().any(|m| m.id == member_id) {
        return Err(ValidationError::UnknownMember(member_id.to_string()).into());
    }
    store
        .set_member_balance(member_id, trip_id, currency, amount, fx_rate)
        .await
}

pub async fn handle_set_fx_rate<D: Datastore>(
    store: &D,
    trip_id: &str,
    currency: Currency,
    rate: f64,
    date: NaiveDate,
) -> anyhow::Result<FxRate> {
    validate_rate(rate)?;
    store.set_fx_rate(trip_id, currency, rate, date).await
}

/// Project the trip roster onto the participant subset, keeping the order
/// of *participant_ids*.
fn select_participants(
    members: &[Member],
    participant_ids: &[String],
) -> Result<Vec<Member>, ValidationError> {
    participant_ids
        .iter()
        .map(|id| {
            members
                .iter()
                .find(|m| &m.id == id)
                .cloned()
                .ok_or_else(|| ValidationError::UnknownMember(id.clone()))
        })
        .collect()
}
