use rust_decimal::Decimal;
use serde::Serialize;

/// Bonus rules applied on top of a staff member's base salary.
#[derive(Debug, Clone, PartialEq)]
pub struct SalaryPolicy {
    /// Base pay for staff whose profile carries none.
    pub default_base: Decimal,
    pub attendance_bonus_rate: Decimal,
    pub attendance_bonus_threshold: f64,
    pub performance_bonus_rate: Decimal,
    pub performance_bonus_threshold: f64,
}

impl Default for SalaryPolicy {
    fn default() -> Self {
        Self {
            default_base: Decimal::new(50_000, 0),
            attendance_bonus_rate: Decimal::new(10, 2),
            attendance_bonus_threshold: 8.0,
            performance_bonus_rate: Decimal::new(5, 2),
            performance_bonus_threshold: 7.0,
        }
    }
}

impl SalaryPolicy {
    pub fn with_default_base(mut self, base: Decimal) -> Self {
        self.default_base = base;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SalaryBreakdown {
    pub base: Decimal,
    pub attendance_bonus: Decimal,
    pub performance_bonus: Decimal,
    pub total: Decimal,
}

/// Derives a salary from a base amount and a performance score.
///
/// Each bonus is a fraction of `base`, paid only when the score reaches its
/// threshold. Bonuses are rounded to cents; `total` is the exact sum.
pub fn derive_salary(base: Decimal, score: f64, policy: &SalaryPolicy) -> SalaryBreakdown {
    let bonus = |rate: Decimal, threshold: f64| {
        if score >= threshold {
            (base * rate).round_dp(2)
        } else {
            Decimal::ZERO
        }
    };

    let attendance_bonus = bonus(
        policy.attendance_bonus_rate,
        policy.attendance_bonus_threshold,
    );
    let performance_bonus = bonus(
        policy.performance_bonus_rate,
        policy.performance_bonus_threshold,
    );

    SalaryBreakdown {
        base,
        attendance_bonus,
        performance_bonus,
        total: base + attendance_bonus + performance_bonus,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn high_score_earns_both_bonuses() {
        let salary = derive_salary(dec("50000"), 9.5, &SalaryPolicy::default());
        assert_eq!(salary.attendance_bonus, dec("5000"));
        assert_eq!(salary.performance_bonus, dec("2500"));
        assert_eq!(salary.total, dec("57500"));
    }

    #[test]
    fn score_of_seven_earns_performance_bonus_only() {
        let salary = derive_salary(dec("50000"), 7.0, &SalaryPolicy::default());
        assert_eq!(salary.attendance_bonus, Decimal::ZERO);
        assert_eq!(salary.performance_bonus, dec("2500"));
        assert_eq!(salary.total, dec("52500"));
    }

    #[test]
    fn score_of_eight_is_inclusive() {
        let salary = derive_salary(dec("50000"), 8.0, &SalaryPolicy::default());
        assert_eq!(salary.attendance_bonus, dec("5000"));
    }

    #[test]
    fn low_score_is_base_only() {
        let salary = derive_salary(dec("50000"), 0.0, &SalaryPolicy::default());
        assert_eq!(salary.total, dec("50000"));
        assert_eq!(salary.attendance_bonus + salary.performance_bonus, Decimal::ZERO);
    }

    #[test]
    fn bonuses_round_to_cents() {
        let salary = derive_salary(dec("33333.33"), 10.0, &SalaryPolicy::default());
        assert_eq!(salary.attendance_bonus, dec("3333.33"));
        assert_eq!(salary.performance_bonus, dec("1666.67"));
        assert_eq!(salary.total, dec("38333.33"));
    }

    #[test]
    fn default_base_can_be_overridden() {
        let policy = SalaryPolicy::default().with_default_base(dec("42000"));
        assert_eq!(policy.default_base, dec("42000"));
        assert_eq!(policy.attendance_bonus_rate, dec("0.10"));
    }

    proptest! {
        #[test]
        fn bonus_thresholds_hold(score in 0.0f64..=10.0, base in 1_000u32..200_000) {
            let base = Decimal::from(base);
            let salary = derive_salary(base, score, &SalaryPolicy::default());

            prop_assert_eq!(salary.attendance_bonus > Decimal::ZERO, score >= 8.0);
            prop_assert_eq!(salary.performance_bonus > Decimal::ZERO, score >= 7.0);
            prop_assert_eq!(
                salary.total,
                salary.base + salary.attendance_bonus + salary.performance_bonus
            );
        }
    }
}
