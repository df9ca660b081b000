//! Allocation of an expense amount across its participants.

use crate::error::ValidationError;
use crate::types::{Currency, ExpenseShare, Member, SplitConfig, SplitMethod};
use crate::validator::{
    validate_amount, validate_fixed_sum, validate_participants, validate_percentage_sum,
    validate_split_config, validate_weight_sum,
};

/// Convert an amount in *currency* to the base currency at *fx_rate*.
pub fn to_base(amount: f64, currency: Currency, fx_rate: f64) -> f64 {
    if currency.is_base() {
        amount
    } else {
        amount * fx_rate
    }
}

/// Split *amount* among *participants* according to *method*, producing one
/// share per participant in both the expense currency and the base currency.
///
/// *participants* is the subset of the trip roster taking part in the
/// expense, not the full roster, and the payer does not have to be in it.
/// For every method except `even`, *split_config* must hold exactly one
/// entry per participant; for `even` it is ignored.
///
/// All preconditions are checked here and reported as [`ValidationError`],
/// so the caller can never end up with a silent partial allocation. The
/// shares are stored verbatim on the expense and only replaced wholesale
/// when the expense is edited.
pub fn allocate(
    participants: &[Member],
    amount: f64,
    currency: Currency,
    fx_rate: f64,
    method: SplitMethod,
    split_config: &[SplitConfig],
) -> Result<Vec<ExpenseShare>, ValidationError> {
    validate_participants(participants)?;
    validate_amount(amount)?;

    let amount_in_base = to_base(amount, currency, fx_rate);

    if method == SplitMethod::Even {
        let n = participants.len() as f64;
        return Ok(participants
            .iter()
            .map(|m| ExpenseShare::new(&m.id, amount / n, amount_in_base / n))
            .collect());
    }

    validate_split_config(participants, split_config)?;

    let shares = match method {
        SplitMethod::Even => unreachable!("even split handled above"),
        SplitMethod::Fixed => {
            validate_fixed_sum(amount, split_config)?;
            split_config
                .iter()
                .map(|sc| {
                    ExpenseShare::new(&sc.member_id, sc.value, to_base(sc.value, currency, fx_rate))
                })
                .collect()
        }
        SplitMethod::Percentage => {
            validate_percentage_sum(split_config)?;
            split_config
                .iter()
                .map(|sc| {
                    ExpenseShare::new(
                        &sc.member_id,
                        amount * sc.value / 100.0,
                        amount_in_base * sc.value / 100.0,
                    )
                })
                .collect()
        }
        SplitMethod::Weight => {
            validate_weight_sum(split_config)?;
            let total_weight: f64 = split_config.iter().map(|sc| sc.value).sum();
            split_config
                .iter()
                .map(|sc| {
                    ExpenseShare::new(
                        &sc.member_id,
                        amount * sc.value / total_weight,
                        amount_in_base * sc.value / total_weight,
                    )
                })
                .collect()
        }
    };

    Ok(shares)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::engine::TOLERANCE;

    use super::*;

    fn make_participants(n: usize) -> Vec<Member> {
        (1..=n)
            .map(|i| Member::new(&format!("m{i}"), &format!("member {i}"), vec![]))
            .collect()
    }

    fn assert_sums_match(shares: &[ExpenseShare], amount: f64, amount_in_base: f64) {
        let total: f64 = shares.iter().map(|s| s.amount).sum();
        let total_base: f64 = shares.iter().map(|s| s.amount_in_base).sum();
        assert_abs_diff_eq!(total, amount, epsilon = TOLERANCE);
        assert_abs_diff_eq!(total_base, amount_in_base, epsilon = TOLERANCE);
    }

    #[test]
    fn test_even_split_two_members() {
        let participants = make_participants(2);
        let shares = allocate(
            &participants,
            100.0,
            Currency::Inr,
            1.0,
            SplitMethod::Even,
            &[],
        )
        .expect("test");

        assert_eq!(shares.len(), 2);
        for share in &shares {
            assert_abs_diff_eq!(share.amount, 50.0);
            assert_abs_diff_eq!(share.amount_in_base, 50.0);
        }
        assert_sums_match(&shares, 100.0, 100.0);
    }

    #[test]
    fn test_percentage_split() {
        let participants = make_participants(3);
        let config = vec![
            SplitConfig::new("m1", 50.0),
            SplitConfig::new("m2", 30.0),
            SplitConfig::new("m3", 20.0),
        ];
        let shares = allocate(
            &participants,
            200.0,
            Currency::Inr,
            1.0,
            SplitMethod::Percentage,
            &config,
        )
        .expect("test");

        assert_abs_diff_eq!(shares[0].amount, 100.0);
        assert_abs_diff_eq!(shares[1].amount, 60.0);
        assert_abs_diff_eq!(shares[2].amount, 40.0);
        assert_sums_match(&shares, 200.0, 200.0);
    }

    #[test]
    fn test_foreign_currency_expense() {
        let participants = make_participants(1);
        let shares = allocate(
            &participants,
            19.0,
            Currency::Myr,
            19.0,
            SplitMethod::Even,
            &[],
        )
        .expect("test");

        assert_eq!(shares.len(), 1);
        assert_abs_diff_eq!(shares[0].amount, 19.0);
        assert_abs_diff_eq!(shares[0].amount_in_base, 361.0);
    }

    #[test]
    fn test_fixed_split_converts_at_rate() {
        let participants = make_participants(2);
        let config = vec![SplitConfig::new("m1", 12.0), SplitConfig::new("m2", 7.0)];
        let shares = allocate(
            &participants,
            19.0,
            Currency::Myr,
            19.0,
            SplitMethod::Fixed,
            &config,
        )
        .expect("test");

        assert_abs_diff_eq!(shares[0].amount, 12.0);
        assert_abs_diff_eq!(shares[0].amount_in_base, 228.0);
        assert_abs_diff_eq!(shares[1].amount, 7.0);
        assert_abs_diff_eq!(shares[1].amount_in_base, 133.0);
        assert_sums_match(&shares, 19.0, 361.0);
    }

    #[test]
    fn test_weight_split_normalizes() {
        let participants = make_participants(3);
        let config = vec![
            SplitConfig::new("m1", 2.0),
            SplitConfig::new("m2", 1.0),
            SplitConfig::new("m3", 1.0),
        ];
        let shares = allocate(
            &participants,
            100.0,
            Currency::Inr,
            1.0,
            SplitMethod::Weight,
            &config,
        )
        .expect("test");

        assert_abs_diff_eq!(shares[0].amount, 50.0);
        assert_abs_diff_eq!(shares[1].amount, 25.0);
        assert_abs_diff_eq!(shares[2].amount, 25.0);
        assert_sums_match(&shares, 100.0, 100.0);
    }

    #[test]
    fn test_allocation_sums_for_all_methods() {
        let participants = make_participants(3);
        let config = vec![
            SplitConfig::new("m1", 70.0),
            SplitConfig::new("m2", 20.0),
            SplitConfig::new("m3", 10.0),
        ];
        let weights = vec![
            SplitConfig::new("m1", 3.0),
            SplitConfig::new("m2", 2.0),
            SplitConfig::new("m3", 5.0),
        ];

        let cases = vec![
            (SplitMethod::Even, vec![]),
            (SplitMethod::Fixed, config.clone()),
            (SplitMethod::Percentage, config),
            (SplitMethod::Weight, weights),
        ];

        for (method, config) in cases {
            let shares = allocate(
                &participants,
                100.0,
                Currency::Myr,
                18.0,
                method,
                &config,
            )
            .expect("test");
            assert_sums_match(&shares, 100.0, 1800.0);
        }
    }

    #[test]
    fn test_rejects_empty_participants() {
        let result = allocate(&[], 100.0, Currency::Inr, 1.0, SplitMethod::Even, &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let participants = make_participants(2);
        let result = allocate(
            &participants,
            0.0,
            Currency::Inr,
            1.0,
            SplitMethod::Even,
            &[],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_mismatched_config() {
        let participants = make_participants(2);
        let config = vec![SplitConfig::new("m1", 100.0)];
        let result = allocate(
            &participants,
            100.0,
            Currency::Inr,
            1.0,
            SplitMethod::Fixed,
            &config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_sums() {
        let participants = make_participants(2);

        let config = vec![SplitConfig::new("m1", 60.0), SplitConfig::new("m2", 60.0)];
        let result = allocate(
            &participants,
            100.0,
            Currency::Inr,
            1.0,
            SplitMethod::Fixed,
            &config,
        );
        assert!(result.is_err());

        let result = allocate(
            &participants,
            100.0,
            Currency::Inr,
            1.0,
            SplitMethod::Percentage,
            &config,
        );
        assert!(result.is_err());

        let config = vec![SplitConfig::new("m1", 0.0), SplitConfig::new("m2", 0.0)];
        let result = allocate(
            &participants,
            100.0,
            Currency::Inr,
            1.0,
            SplitMethod::Weight,
            &config,
        );
        assert!(result.is_err());
    }
}
