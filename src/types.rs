//! Domain types shared across the whole application.

use chrono::NaiveDate;

/// The two currencies a trip can record expenses in. All derived values
/// (ledger, settlements) are expressed in the base currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Currency {
    Inr,
    Myr,
}

impl Currency {
    pub const BASE: Currency = Currency::Inr;

    pub fn is_base(&self) -> bool {
        *self == Currency::BASE
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Myr => "MYR",
        }
    }

    pub fn from_code(code: &str) -> Option<Currency> {
        match code {
            "INR" => Some(Currency::Inr),
            "MYR" => Some(Currency::Myr),
            _ => None,
        }
    }
}

/// The policy governing how an expense amount is divided among participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitMethod {
    Even,
    Fixed,
    Percentage,
    Weight,
}

impl SplitMethod {
    pub fn code(&self) -> &'static str {
        match self {
            SplitMethod::Even => "even",
            SplitMethod::Fixed => "fixed",
            SplitMethod::Percentage => "percentage",
            SplitMethod::Weight => "weight",
        }
    }

    pub fn from_code(code: &str) -> Option<SplitMethod> {
        match code {
            "even" => Some(SplitMethod::Even),
            "fixed" => Some(SplitMethod::Fixed),
            "percentage" => Some(SplitMethod::Percentage),
            "weight" => Some(SplitMethod::Weight),
            _ => None,
        }
    }
}

/// One entry of the exchange-rate time series: how many base-currency units
/// one unit of *currency* is worth, effective as of *date*.
#[derive(Clone, Debug)]
pub struct FxRate {
    pub currency: Currency,
    pub rate: f64,
    pub date: NaiveDate,
}

impl FxRate {
    pub fn new(currency: Currency, rate: f64, date: NaiveDate) -> FxRate {
        FxRate {
            currency,
            rate,
            date,
        }
    }
}

/// A starting cash position a member brought into the trip, per currency.
///
/// The optional *fx_rate* overrides the trip rate series when converting this
/// one balance to base currency.
#[derive(Clone, Debug)]
pub struct MemberBalance {
    pub currency: Currency,
    pub amount: f64,
    pub fx_rate: Option<f64>,
}

impl MemberBalance {
    pub fn new(currency: Currency, amount: f64, fx_rate: Option<f64>) -> MemberBalance {
        MemberBalance {
            currency,
            amount,
            fx_rate,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub balances: Vec<MemberBalance>,
}

impl Member {
    pub fn new(id: &str, name: &str, balances: Vec<MemberBalance>) -> Member {
        Member {
            id: id.to_string(),
            name: name.to_string(),
            balances,
        }
    }
}

/// One member's allocated portion of one expense, in both currencies.
#[derive(Clone, Debug)]
pub struct ExpenseShare {
    pub member_id: String,
    pub amount: f64,
    pub amount_in_base: f64,
}

impl ExpenseShare {
    pub fn new(member_id: &str, amount: f64, amount_in_base: f64) -> ExpenseShare {
        ExpenseShare {
            member_id: member_id.to_string(),
            amount,
            amount_in_base,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Expense {
    pub id: String,
    pub paid_by_id: String,
    pub amount: f64,
    pub currency: Currency,
    pub description: String,
    pub date: NaiveDate,
    pub split_method: SplitMethod,
    pub fx_rate: f64,
    pub amount_in_base: f64,
    pub shares: Vec<ExpenseShare>,
}

/// An expense that has not been persisted yet: the allocator has produced its
/// shares but the backing store has not assigned it an ID.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub trip_id: String,
    pub paid_by_id: String,
    pub amount: f64,
    pub currency: Currency,
    pub description: String,
    pub date: NaiveDate,
    pub split_method: SplitMethod,
    pub fx_rate: f64,
    pub shares: Vec<ExpenseShare>,
}

/// The raw per-member input driving a non-even split: a currency amount for
/// `fixed`, percentage points for `percentage`, a relative weight for `weight`.
#[derive(Clone, Debug)]
pub struct SplitConfig {
    pub member_id: String,
    pub value: f64,
}

impl SplitConfig {
    pub fn new(member_id: &str, value: f64) -> SplitConfig {
        SplitConfig {
            member_id: member_id.to_string(),
            value,
        }
    }
}

/// Per-member derived view: starting balances, total paid, total owed and the
/// resulting net balance in base currency. Recomputed on demand, never stored.
#[derive(Clone, Debug)]
pub struct MemberLedger {
    pub member_id: String,
    pub member_name: String,
    pub starting_balance_inr: f64,
    pub starting_balance_myr: f64,
    pub total_spent: f64,
    pub total_share: f64,
    pub net_balance: f64,
}

/// A directed transfer extinguishing debt. Amounts are settled in base
/// currency; the MYR figure is informational only.
#[derive(Clone, Debug)]
pub struct Settlement {
    pub from_member_id: String,
    pub from_member_name: String,
    pub to_member_id: String,
    pub to_member_name: String,
    pub amount: f64,
    pub amount_in_myr: f64,
}

impl Settlement {
    pub fn new(from: &MemberLedger, to: &MemberLedger, amount: f64, myr_rate: f64) -> Settlement {
        Settlement {
            from_member_id: from.member_id.clone(),
            from_member_name: from.member_name.clone(),
            to_member_id: to.member_id.clone(),
            to_member_name: to.member_name.clone(),
            amount,
            amount_in_myr: amount / myr_rate,
        }
    }
}
