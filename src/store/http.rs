//! `Datastore` implementation backed by the trip REST service.
//!
//! The backend owns persistence; this module only translates between the
//! wire JSON (snake_case, stringly-typed currencies and split methods) and
//! the domain types.

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use super::Datastore;
use crate::types::{Currency, Expense, ExpenseShare, FxRate, Member, MemberBalance, NewExpense};

pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStore {
    pub fn new(base_url: &str) -> HttpStore {
        HttpStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Look up a trip ID by its name, case-insensitively.
    pub async fn find_trip_id_by_name(&self, name: &str) -> anyhow::Result<Option<String>> {
        let trips: Vec<TripRow> = self
            .client
            .get(format!("{}/trips", self.base_url))
            .send()
            .await
            .with_context(|| "Could not list trips")?
            .error_for_status()?
            .json()
            .await
            .with_context(|| "Could not decode trip list")?;

        Ok(trips
            .into_iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .map(|t| t.id))
    }

    /// The backend serves a trip as one aggregate document; every list
    /// operation fetches it and projects the relevant slice.
    async fn fetch_trip(&self, trip_id: &str) -> anyhow::Result<TripDetailRow> {
        debug!("Fetching trip {trip_id}");
        self.client
            .get(format!("{}/trips/{}", self.base_url, trip_id))
            .send()
            .await
            .with_context(|| format!("Could not fetch trip {trip_id}"))?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("Could not decode trip {trip_id}"))
    }
}

#[async_trait::async_trait]
impl Datastore for HttpStore {
    async fn list_members(&self, trip_id: &str) -> anyhow::Result<Vec<Member>> {
        let trip = self.fetch_trip(trip_id).await?;
        trip.members.into_iter().map(parse_member).collect()
    }

    async fn list_expenses(&self, trip_id: &str) -> anyhow::Result<Vec<Expense>> {
        let trip = self.fetch_trip(trip_id).await?;
        trip.expenses.into_iter().map(parse_expense).collect()
    }

    async fn list_fx_rates(&self, trip_id: &str) -> anyhow::Result<Vec<FxRate>> {
        let trip = self.fetch_trip(trip_id).await?;
        trip.fx_rates.into_iter().map(parse_fx_rate).collect()
    }

    async fn create_expense(&self, expense: NewExpense) -> anyhow::Result<Expense> {
        let payload = NewExpensePayload::from(&expense);
        let row: ExpenseRow = self
            .client
            .post(format!("{}/expenses", self.base_url))
            .json(&payload)
            .send()
            .await
            .with_context(|| "Could not create expense")?
            .error_for_status()?
            .json()
            .await
            .with_context(|| "Could not decode created expense")?;
        parse_expense(row)
    }

    async fn set_member_balance(
        &self,
        member_id: &str,
        trip_id: &str,
        currency: Currency,
        amount: f64,
        fx_rate: Option<f64>,
    ) -> anyhow::Result<()> {
        self.client
            .post(format!(
                "{}/members/{}/balance?trip_id={}",
                self.base_url, member_id, trip_id
            ))
            .json(&BalancePayload {
                currency: currency.code(),
                amount,
                fx_rate,
            })
            .send()
            .await
            .with_context(|| format!("Could not set balance for member {member_id}"))?
            .error_for_status()?;
        Ok(())
    }

    async fn set_fx_rate(
        &self,
        trip_id: &str,
        currency: Currency,
        rate: f64,
        date: NaiveDate,
    ) -> anyhow::Result<FxRate> {
        let row: FxRateRow = self
            .client
            .post(format!("{}/fxrates", self.base_url))
            .json(&FxRatePayload {
                trip_id,
                currency: currency.code(),
                rate,
                date,
            })
            .send()
            .await
            .with_context(|| "Could not set FX rate")?
            .error_for_status()?
            .json()
            .await
            .with_context(|| "Could not decode created FX rate")?;
        parse_fx_rate(row)
    }
}

fn parse_currency(code: &str) -> anyhow::Result<Currency> {
    Currency::from_code(code).ok_or_else(|| anyhow!("unknown currency `{code}`"))
}

fn parse_member(row: MemberRow) -> anyhow::Result<Member> {
    let balances = row
        .balances
        .into_iter()
        .map(|b| {
            Ok(MemberBalance::new(
                parse_currency(&b.currency)?,
                b.amount,
                b.fx_rate,
            ))
        })
        .collect::<anyhow::Result<_>>()?;
    Ok(Member {
        id: row.id,
        name: row.name,
        balances,
    })
}

fn parse_fx_rate(row: FxRateRow) -> anyhow::Result<FxRate> {
    Ok(FxRate::new(parse_currency(&row.currency)?, row.rate, row.date))
}

fn parse_expense(row: ExpenseRow) -> anyhow::Result<Expense> {
    let split_method = crate::types::SplitMethod::from_code(&row.split_method)
        .ok_or_else(|| anyhow!("unknown split method `{}`", row.split_method))?;
    Ok(Expense {
        id: row.id,
        paid_by_id: row.paid_by_id,
        amount: row.amount,
        currency: parse_currency(&row.currency)?,
        description: row.description,
        date: row.date,
        split_method,
        fx_rate: row.fx_rate,
        amount_in_base: row.amount_in_base,
        shares: row
            .shares
            .into_iter()
            .map(|s| ExpenseShare::new(&s.member_id, s.amount, s.amount_in_base))
            .collect(),
    })
}

#[derive(Deserialize)]
struct TripRow {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct TripDetailRow {
    #[serde(default)]
    members: Vec<MemberRow>,
    #[serde(default)]
    fx_rates: Vec<FxRateRow>,
    #[serde(default)]
    expenses: Vec<ExpenseRow>,
}

#[derive(Deserialize)]
struct MemberRow {
    id: String,
    name: String,
    #[serde(default)]
    balances: Vec<BalanceRow>,
}

#[derive(Deserialize)]
struct BalanceRow {
    currency: String,
    amount: f64,
    fx_rate: Option<f64>,
}

#[derive(Deserialize)]
struct FxRateRow {
    currency: String,
    rate: f64,
    date: NaiveDate,
}

#[derive(Deserialize)]
struct ExpenseRow {
    id: String,
    paid_by_id: String,
    amount: f64,
    currency: String,
    #[serde(default)]
    description: String,
    date: NaiveDate,
    split_method: String,
    fx_rate: f64,
    amount_in_base: f64,
    #[serde(default)]
    shares: Vec<ShareRow>,
}

#[derive(Deserialize)]
struct ShareRow {
    member_id: String,
    amount: f64,
    amount_in_base: f64,
}

#[derive(Serialize)]
struct NewExpensePayload<'a> {
    trip_id: &'a str,
    paid_by_id: &'a str,
    amount: f64,
    currency: &'static str,
    description: &'a str,
    date: NaiveDate,
    split_method: &'static str,
    fx_rate: f64,
    shares: Vec<SharePayload<'a>>,
}

#[derive(Serialize)]
struct SharePayload<'a> {
    member_id: &'a str,
    amount: f64,
    amount_in_base: f64,
}

impl<'a> From<&'a NewExpense> for NewExpensePayload<'a> {
    fn from(expense: &'a NewExpense) -> NewExpensePayload<'a> {
        NewExpensePayload {
            trip_id: &expense.trip_id,
            paid_by_id: &expense.paid_by_id,
            amount: expense.amount,
            currency: expense.currency.code(),
            description: &expense.description,
            date: expense.date,
            split_method: expense.split_method.code(),
            fx_rate: expense.fx_rate,
            shares: expense
                .shares
                .iter()
                .map(|s| SharePayload {
                    member_id: &s.member_id,
                    amount: s.amount,
                    amount_in_base: s.amount_in_base,
                })
                .collect(),
        }
    }
}

#[derive(Serialize)]
struct BalancePayload {
    currency: &'static str,
    amount: f64,
    fx_rate: Option<f64>,
}

#[derive(Serialize)]
struct FxRatePayload<'a> {
    trip_id: &'a str,
    currency: &'static str,
    rate: f64,
    date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::types::SplitMethod;

    use super::*;

    #[test]
    fn test_parse_trip_document() {
        let json = r#"{
            "id": "t1",
            "name": "Langkawi",
            "members": [
                {
                    "id": "m1",
                    "name": "ana",
                    "balances": [
                        {"currency": "INR", "amount": 5000.0, "fx_rate": null},
                        {"currency": "MYR", "amount": 200.0, "fx_rate": 18.5}
                    ]
                },
                {"id": "m2", "name": "bo"}
            ],
            "fx_rates": [
                {"currency": "MYR", "rate": 18.0, "date": "2024-01-01"}
            ],
            "expenses": [
                {
                    "id": "e1",
                    "paid_by_id": "m1",
                    "amount": 19.0,
                    "currency": "MYR",
                    "description": "lunch",
                    "date": "2024-01-05",
                    "split_method": "even",
                    "fx_rate": 19.0,
                    "amount_in_base": 361.0,
                    "shares": [
                        {"member_id": "m1", "amount": 9.5, "amount_in_base": 180.5},
                        {"member_id": "m2", "amount": 9.5, "amount_in_base": 180.5}
                    ]
                }
            ]
        }"#;

        let trip: TripDetailRow = serde_json::from_str(json).expect("test");

        let members: Vec<_> = trip
            .members
            .into_iter()
            .map(|m| parse_member(m).expect("test"))
            .collect();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].balances.len(), 2);
        assert_eq!(members[0].balances[1].currency, Currency::Myr);
        assert_eq!(members[0].balances[1].fx_rate, Some(18.5));
        assert!(members[1].balances.is_empty());

        let rates: Vec<_> = trip
            .fx_rates
            .into_iter()
            .map(|r| parse_fx_rate(r).expect("test"))
            .collect();
        assert_eq!(rates[0].currency, Currency::Myr);
        assert_abs_diff_eq!(rates[0].rate, 18.0);

        let expenses: Vec<_> = trip
            .expenses
            .into_iter()
            .map(|e| parse_expense(e).expect("test"))
            .collect();
        assert_eq!(expenses[0].split_method, SplitMethod::Even);
        assert_eq!(expenses[0].currency, Currency::Myr);
        assert_abs_diff_eq!(expenses[0].amount_in_base, 361.0);
        assert_eq!(expenses[0].shares.len(), 2);
    }

    #[test]
    fn test_unknown_currency_is_an_error() {
        let row = FxRateRow {
            currency: "USD".to_string(),
            rate: 83.0,
            date: "2024-01-01".parse().expect("test"),
        };
        assert!(parse_fx_rate(row).is_err());
    }

    #[test]
    fn test_new_expense_payload_shape() {
        let expense = NewExpense {
            trip_id: "t1".to_string(),
            paid_by_id: "m1".to_string(),
            amount: 19.0,
            currency: Currency::Myr,
            description: "lunch".to_string(),
            date: "2024-01-05".parse().expect("test"),
            split_method: SplitMethod::Even,
            fx_rate: 19.0,
            shares: vec![ExpenseShare::new("m1", 19.0, 361.0)],
        };

        let value = serde_json::to_value(NewExpensePayload::from(&expense)).expect("test");

        assert_eq!(value["trip_id"], "t1");
        assert_eq!(value["currency"], "MYR");
        assert_eq!(value["split_method"], "even");
        assert_eq!(value["date"], "2024-01-05");
        assert_eq!(value["shares"][0]["member_id"], "m1");
        assert_eq!(value["shares"][0]["amount_in_base"], 361.0);
    }
}
