//! Access to the trip data owned by the backing service.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{Currency, Expense, FxRate, Member, NewExpense};

pub mod http;

/// This trait abstracts over the backing data store.
///
/// The production implementation talks to the REST backend over HTTP, but
/// anything that can hand out a consistent snapshot of a trip works; tests
/// use an in-memory implementation. The engine itself never touches this
/// trait: callers gather a snapshot first and feed it to the engine as
/// plain data.
#[async_trait]
pub trait Datastore {
    /// Get the members of a trip, with their starting balances.
    async fn list_members(&self, trip_id: &str) -> anyhow::Result<Vec<Member>>;

    /// Get the expenses of a trip, with their shares.
    async fn list_expenses(&self, trip_id: &str) -> anyhow::Result<Vec<Expense>>;

    /// Get the exchange-rate series of a trip.
    async fn list_fx_rates(&self, trip_id: &str) -> anyhow::Result<Vec<FxRate>>;

    /// Persist an expense together with its precomputed shares.
    ///
    /// The shares must be stored atomically with the expense record: an
    /// expense without its full share set must never be observable.
    async fn create_expense(&self, expense: NewExpense) -> anyhow::Result<Expense>;

    /// Record a member's starting balance for one currency, replacing any
    /// previous entry for that (member, currency) pair.
    async fn set_member_balance(
        &self,
        member_id: &str,
        trip_id: &str,
        currency: Currency,
        amount: f64,
        fx_rate: Option<f64>,
    ) -> anyhow::Result<()>;

    /// Record an exchange rate effective as of *date*.
    async fn set_fx_rate(
        &self,
        trip_id: &str,
        currency: Currency,
        rate: f64,
        date: NaiveDate,
    ) -> anyhow::Result<FxRate>;
}
