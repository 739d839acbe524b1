//! Allocation calculator
//!
//! Turns a budget amount and a set of counties into a per-county
//! distribution. Every amount is rounded to whole cents independently, so the
//! rounded amounts may not add up exactly to the budget; the difference is
//! reported as `remaining` on the summary rather than being pushed onto one
//! county.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{AllocationMethod, County, CountyId, Money, MAX_BUDGET_AMOUNT};

/// The county attributes the allocation methods read
pub trait CountyProfile {
    fn county_id(&self) -> CountyId;
    fn county_name(&self) -> &str;
    fn gdp_per_capita(&self) -> f64;
    fn project_score(&self) -> u32;
}

impl CountyProfile for County {
    fn county_id(&self) -> CountyId {
        self.id
    }

    fn county_name(&self) -> &str {
        &self.name
    }

    fn gdp_per_capita(&self) -> f64 {
        County::gdp_per_capita(self)
    }

    fn project_score(&self) -> u32 {
        u32::from(self.project_score)
    }
}

/// One county's share under one method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationLine {
    pub county_id: CountyId,
    pub county_name: String,
    pub amount: Money,
    /// Share of the budget in percent, rounded to 2 decimals
    pub percentage: f64,
    pub method: AllocationMethod,
    /// Set by the GDP-per-capita method, rounded to 2 decimals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gdp_per_capita: Option<f64>,
    /// Set by the project-based method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_score: Option<u32>,
}

/// Result of running one method, with totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSummary {
    pub method: AllocationMethod,
    pub total_budget: Money,
    /// Sum of the rounded amounts
    pub total_allocated: Money,
    /// `total_budget - total_allocated`; a few cents either way from rounding
    pub remaining: Money,
    pub num_counties: usize,
    pub allocations: Vec<AllocationLine>,
}

/// Computes allocations for a fixed budget amount and county set
#[derive(Debug)]
pub struct AllocationCalculator<'a, C: CountyProfile> {
    budget_amount: Money,
    counties: &'a [C],
}

impl<'a, C: CountyProfile> AllocationCalculator<'a, C> {
    /// Create a calculator
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `counties` is empty, or `budget_amount` is not
    /// strictly positive or exceeds [`MAX_BUDGET_AMOUNT`].
    pub fn new(budget_amount: Money, counties: &'a [C]) -> BudgetResult<Self> {
        if counties.is_empty() {
            return Err(BudgetError::InvalidInput(
                "Cannot allocate budget to zero counties".into(),
            ));
        }

        if !budget_amount.is_positive() {
            return Err(BudgetError::InvalidInput(format!(
                "Budget amount must be greater than zero (got {})",
                budget_amount
            )));
        }

        if budget_amount > MAX_BUDGET_AMOUNT {
            return Err(BudgetError::InvalidInput(format!(
                "Budget amount cannot exceed {} (got {})",
                MAX_BUDGET_AMOUNT, budget_amount
            )));
        }

        Ok(Self {
            budget_amount,
            counties,
        })
    }

    pub fn budget_amount(&self) -> Money {
        self.budget_amount
    }

    pub fn num_counties(&self) -> usize {
        self.counties.len()
    }

    /// Same amount for every county, in input order
    pub fn equal_allocation(&self) -> Vec<AllocationLine> {
        let share = self.budget_amount.as_f64() / self.counties.len() as f64;

        self.counties
            .iter()
            .map(|county| self.line(county, share, AllocationMethod::Equal))
            .collect()
    }

    /// Inverse GDP-per-capita weighting, largest amount first
    ///
    /// Each county's weight is `max - gdp + min` over the set's GDP-per-capita
    /// range, so the poorest county gets weight `max` and the richest gets
    /// weight `min`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if a county's GDP per capita is negative or not finite,
    /// `DivisionByZero` if every weight is zero (all counties report zero
    /// output).
    pub fn gdp_per_capita_allocation(&self) -> BudgetResult<Vec<AllocationLine>> {
        let gdps = self
            .counties
            .iter()
            .map(|county| {
                let gdp = county.gdp_per_capita();
                if gdp.is_finite() && gdp >= 0.0 {
                    Ok(gdp)
                } else {
                    Err(BudgetError::InvalidInput(format!(
                        "County '{}' has an invalid GDP per capita: {}",
                        county.county_name(),
                        gdp
                    )))
                }
            })
            .collect::<BudgetResult<Vec<f64>>>()?;

        let min_gdp = gdps.iter().copied().fold(f64::INFINITY, f64::min);
        let max_gdp = gdps.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let weights: Vec<f64> = gdps.iter().map(|gdp| max_gdp - gdp + min_gdp).collect();
        let total_weight: f64 = weights.iter().sum();

        if total_weight <= 0.0 {
            return Err(BudgetError::DivisionByZero(
                "Total GDP-per-capita weight is zero".into(),
            ));
        }

        let budget = self.budget_amount.as_f64();
        let mut lines: Vec<AllocationLine> = self
            .counties
            .iter()
            .zip(gdps.iter().zip(&weights))
            .map(|(county, (gdp, weight))| {
                let mut line = self.line(
                    county,
                    weight / total_weight * budget,
                    AllocationMethod::GdpPerCapita,
                );
                line.gdp_per_capita = Some(round2(*gdp));
                line
            })
            .collect();

        // Stable, so exact ties keep input order
        lines.sort_by(|a, b| b.amount.cmp(&a.amount));
        Ok(lines)
    }

    /// Shares proportional to project score, highest score first
    ///
    /// # Errors
    ///
    /// `DivisionByZero` if the scores sum to zero.
    pub fn project_based_allocation(&self) -> BudgetResult<Vec<AllocationLine>> {
        let total_score: u32 = self.counties.iter().map(|c| c.project_score()).sum();

        if total_score == 0 {
            return Err(BudgetError::DivisionByZero(
                "Total project score cannot be zero".into(),
            ));
        }

        let mut ranked: Vec<&C> = self.counties.iter().collect();
        ranked.sort_by_key(|county| Reverse(county.project_score()));

        let budget = self.budget_amount.as_f64();
        Ok(ranked
            .into_iter()
            .map(|county| {
                let score = county.project_score();
                let amount = f64::from(score) / f64::from(total_score) * budget;
                let mut line = self.line(county, amount, AllocationMethod::ProjectBased);
                line.project_score = Some(score);
                line
            })
            .collect())
    }

    /// Run a single method
    pub fn allocate(&self, method: AllocationMethod) -> BudgetResult<Vec<AllocationLine>> {
        match method {
            AllocationMethod::Equal => Ok(self.equal_allocation()),
            AllocationMethod::GdpPerCapita => self.gdp_per_capita_allocation(),
            AllocationMethod::ProjectBased => self.project_based_allocation(),
        }
    }

    /// Run a method and total up the rounded amounts
    pub fn summary(&self, method: AllocationMethod) -> BudgetResult<AllocationSummary> {
        let allocations = self.allocate(method)?;
        let total_allocated: Money = allocations.iter().map(|line| line.amount).sum();

        Ok(AllocationSummary {
            method,
            total_budget: self.budget_amount,
            total_allocated,
            remaining: self.budget_amount - total_allocated,
            num_counties: self.counties.len(),
            allocations,
        })
    }

    /// Like [`summary`](Self::summary), with the method given by name
    ///
    /// # Errors
    ///
    /// `UnknownMethod` if `method` is not `equal`, `gdp_per_capita` or
    /// `project_based`.
    pub fn summary_by_name(&self, method: &str) -> BudgetResult<AllocationSummary> {
        self.summary(method.parse()?)
    }

    fn line(&self, county: &C, raw_amount: f64, method: AllocationMethod) -> AllocationLine {
        AllocationLine {
            county_id: county.county_id(),
            county_name: county.county_name().to_string(),
            amount: Money::from_f64_rounded(raw_amount),
            percentage: round2(raw_amount / self.budget_amount.as_f64() * 100.0),
            method,
            gdp_per_capita: None,
            project_score: None,
        }
    }
}

/// Round to 2 decimal places, half away from zero
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::NewCounty;

    /// Test double that skips `NewCounty` validation
    #[derive(Debug, Clone)]
    pub(crate) struct Profile {
        pub id: i64,
        pub name: &'static str,
        pub gdp: f64,
        pub score: u32,
    }

    impl CountyProfile for Profile {
        fn county_id(&self) -> CountyId {
            CountyId::new(self.id)
        }
        fn county_name(&self) -> &str {
            self.name
        }
        fn gdp_per_capita(&self) -> f64 {
            self.gdp
        }
        fn project_score(&self) -> u32 {
            self.score
        }
    }

    pub(crate) fn county(id: i64, name: &str, population: i64, output: f64, score: i64) -> County {
        County::from_draft(
            CountyId::new(id),
            NewCounty::new(name, population, output, score).unwrap(),
        )
    }

    fn two_counties() -> Vec<County> {
        vec![
            county(1, "Lowland", 1000, 1_000_000.0, 5),
            county(2, "Highland", 1000, 2_000_000.0, 5),
        ]
    }

    fn sample_counties() -> Vec<County> {
        vec![
            county(1, "Nairobi", 4_397_073, 2_500_000_000.0, 9),
            county(2, "Mombasa", 1_208_333, 800_000_000.0, 8),
            county(3, "Kiambu", 2_417_735, 600_000_000.0, 7),
            county(4, "Nakuru", 2_162_202, 450_000_000.0, 6),
            county(5, "Machakos", 1_421_932, 300_000_000.0, 5),
            county(6, "Kajiado", 1_117_840, 200_000_000.0, 6),
        ]
    }

    fn amounts(lines: &[AllocationLine]) -> Vec<Money> {
        lines.iter().map(|l| l.amount).collect()
    }

    fn within_cents(actual: Money, expected: Money, cents: i64) -> bool {
        (actual - expected).cents().abs() <= cents
    }

    #[test]
    fn test_rejects_empty_county_list() {
        let counties: Vec<County> = Vec::new();
        let err = AllocationCalculator::new(Money::from_units(1000), &counties).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_rejects_non_positive_budget() {
        let counties = two_counties();
        assert!(AllocationCalculator::new(Money::zero(), &counties)
            .unwrap_err()
            .is_invalid_input());
        assert!(AllocationCalculator::new(Money::from_units(-5), &counties)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_budget_upper_bound() {
        let counties = two_counties();

        let calc = AllocationCalculator::new(MAX_BUDGET_AMOUNT, &counties).unwrap();
        for method in AllocationMethod::ALL {
            let summary = calc.summary(method).unwrap();
            assert!(summary.total_allocated <= MAX_BUDGET_AMOUNT + Money::from_cents(1));
        }
        let equal = calc.summary(AllocationMethod::Equal).unwrap();
        assert_eq!(equal.total_allocated, MAX_BUDGET_AMOUNT);
        assert!(equal.remaining.is_zero());

        let over = MAX_BUDGET_AMOUNT + Money::from_cents(1);
        assert!(AllocationCalculator::new(over, &counties)
            .unwrap_err()
            .is_invalid_input());

        let huge = Money::parse("92,233,720,368,547,758.07").unwrap();
        assert!(AllocationCalculator::new(huge, &counties)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_two_county_scenario() {
        let counties = two_counties();
        let calc = AllocationCalculator::new(Money::from_units(1_000_000), &counties).unwrap();

        let equal = calc.equal_allocation();
        assert_eq!(
            amounts(&equal),
            vec![Money::from_units(500_000), Money::from_units(500_000)]
        );
        assert!(equal.iter().all(|l| l.percentage == 50.0));

        let gdp = calc.gdp_per_capita_allocation().unwrap();
        assert_eq!(gdp[0].county_name, "Lowland");
        assert_eq!(gdp[0].amount, Money::from_cents(66_666_667));
        assert_eq!(gdp[1].amount, Money::from_cents(33_333_333));
        assert_eq!(gdp[0].gdp_per_capita, Some(1000.0));
        assert_eq!(gdp[0].percentage, 66.67);

        let project = calc.project_based_allocation().unwrap();
        assert_eq!(
            amounts(&project),
            vec![Money::from_units(500_000), Money::from_units(500_000)]
        );
    }

    #[test]
    fn test_equal_preserves_input_order() {
        let counties = sample_counties();
        let calc = AllocationCalculator::new(Money::from_units(600), &counties).unwrap();
        let names: Vec<_> = calc
            .equal_allocation()
            .into_iter()
            .map(|l| l.county_name)
            .collect();
        assert_eq!(
            names,
            vec!["Nairobi", "Mombasa", "Kiambu", "Nakuru", "Machakos", "Kajiado"]
        );
    }

    #[test]
    fn test_equal_remaining_is_reported() {
        let counties = vec![
            county(1, "A", 1, 1.0, 1),
            county(2, "B", 1, 1.0, 1),
            county(3, "C", 1, 1.0, 1),
        ];
        let calc = AllocationCalculator::new(Money::from_units(1000), &counties).unwrap();
        let summary = calc.summary(AllocationMethod::Equal).unwrap();

        assert!(summary
            .allocations
            .iter()
            .all(|l| l.amount == Money::from_cents(33_333) && l.percentage == 33.33));
        assert_eq!(summary.total_allocated, Money::from_cents(99_999));
        assert_eq!(summary.remaining, Money::from_cents(1));
        assert_eq!(summary.num_counties, 3);
    }

    #[test]
    fn test_gdp_lowest_gets_most_highest_gets_least() {
        let counties = sample_counties();
        let calc = AllocationCalculator::new(Money::from_units(10_000_000), &counties).unwrap();
        let lines = calc.gdp_per_capita_allocation().unwrap();

        let poorest = counties
            .iter()
            .min_by(|a, b| a.gdp_per_capita().total_cmp(&b.gdp_per_capita()))
            .unwrap();
        let richest = counties
            .iter()
            .max_by(|a, b| a.gdp_per_capita().total_cmp(&b.gdp_per_capita()))
            .unwrap();

        assert_eq!(lines.first().unwrap().county_id, poorest.id);
        assert_eq!(lines.last().unwrap().county_id, richest.id);
        assert!(lines.windows(2).all(|w| w[0].amount >= w[1].amount));

        let total: Money = lines.iter().map(|l| l.amount).sum();
        assert!(within_cents(total, Money::from_units(10_000_000), 3));
    }

    #[test]
    fn test_gdp_weights_use_range_reflection() {
        // gdp 100, 200, 400 -> weights 400, 300, 100 (total 800)
        let counties = vec![
            Profile { id: 1, name: "A", gdp: 100.0, score: 1 },
            Profile { id: 2, name: "B", gdp: 200.0, score: 1 },
            Profile { id: 3, name: "C", gdp: 400.0, score: 1 },
        ];
        let calc = AllocationCalculator::new(Money::from_units(800), &counties).unwrap();
        let lines = calc.gdp_per_capita_allocation().unwrap();
        assert_eq!(
            amounts(&lines),
            vec![
                Money::from_units(400),
                Money::from_units(300),
                Money::from_units(100)
            ]
        );
    }

    #[test]
    fn test_gdp_single_county_gets_everything() {
        let counties = vec![county(1, "Solo", 10, 500.0, 3)];
        let calc = AllocationCalculator::new(Money::from_units(1234), &counties).unwrap();
        let lines = calc.gdp_per_capita_allocation().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].amount, Money::from_units(1234));
        assert_eq!(lines[0].percentage, 100.0);
    }

    #[test]
    fn test_gdp_ties_keep_input_order() {
        let counties = vec![
            Profile { id: 1, name: "First", gdp: 50.0, score: 1 },
            Profile { id: 2, name: "Rich", gdp: 90.0, score: 1 },
            Profile { id: 3, name: "Second", gdp: 50.0, score: 1 },
        ];
        let calc = AllocationCalculator::new(Money::from_units(1000), &counties).unwrap();
        let names: Vec<_> = calc
            .gdp_per_capita_allocation()
            .unwrap()
            .into_iter()
            .map(|l| l.county_name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Rich"]);
    }

    #[test]
    fn test_gdp_all_zero_output_is_division_by_zero() {
        let counties = vec![county(1, "A", 10, 0.0, 3), county(2, "B", 20, 0.0, 4)];
        let calc = AllocationCalculator::new(Money::from_units(100), &counties).unwrap();
        assert!(matches!(
            calc.gdp_per_capita_allocation(),
            Err(BudgetError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_gdp_rejects_non_finite_values() {
        let counties = vec![
            Profile { id: 1, name: "A", gdp: f64::NAN, score: 1 },
            Profile { id: 2, name: "B", gdp: 10.0, score: 1 },
        ];
        let calc = AllocationCalculator::new(Money::from_units(100), &counties).unwrap();
        assert!(calc.gdp_per_capita_allocation().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_project_based_orders_by_score() {
        let counties = sample_counties();
        let calc = AllocationCalculator::new(Money::from_units(1_000_000), &counties).unwrap();
        let lines = calc.project_based_allocation().unwrap();

        let scores: Vec<_> = lines.iter().map(|l| l.project_score.unwrap()).collect();
        assert_eq!(scores, vec![9, 8, 7, 6, 6, 5]);
        // Nakuru precedes Kajiado on the tie, as in the input
        assert_eq!(lines[3].county_name, "Nakuru");
        assert_eq!(lines[4].county_name, "Kajiado");

        assert!(lines.windows(2).all(|w| w[0].amount >= w[1].amount));
        let total: Money = lines.iter().map(|l| l.amount).sum();
        assert!(within_cents(total, Money::from_units(1_000_000), 3));
    }

    #[test]
    fn test_project_based_zero_total_is_division_by_zero() {
        let counties = vec![
            Profile { id: 1, name: "A", gdp: 1.0, score: 0 },
            Profile { id: 2, name: "B", gdp: 2.0, score: 0 },
        ];
        let calc = AllocationCalculator::new(Money::from_units(100), &counties).unwrap();
        assert!(matches!(
            calc.project_based_allocation(),
            Err(BudgetError::DivisionByZero(_))
        ));
    }

    #[test]
    fn test_equal_shares_for_various_sizes() {
        for n in 1..=12 {
            let counties: Vec<County> = (1..=n)
                .map(|i| county(i, &format!("County {}", i), 100, 1000.0, 5))
                .collect();
            let budget = Money::from_cents(123_456_789);
            let calc = AllocationCalculator::new(budget, &counties).unwrap();
            let summary = calc.summary(AllocationMethod::Equal).unwrap();

            assert_eq!(summary.allocations.len(), n as usize);
            let expected_pct = round2(100.0 / n as f64);
            assert!(summary.allocations.iter().all(|l| l.percentage == expected_pct));
            assert!(summary.remaining.cents().abs() <= n);
        }
    }

    #[test]
    fn test_methods_are_idempotent() {
        let counties = sample_counties();
        let calc = AllocationCalculator::new(Money::from_units(750_000), &counties).unwrap();
        for method in AllocationMethod::ALL {
            assert_eq!(calc.summary(method).unwrap(), calc.summary(method).unwrap());
        }
    }

    #[test]
    fn test_summary_by_name() {
        let counties = two_counties();
        let calc = AllocationCalculator::new(Money::from_units(1_000_000), &counties).unwrap();

        let summary = calc.summary_by_name("project_based").unwrap();
        assert_eq!(summary.method, AllocationMethod::ProjectBased);
        assert_eq!(summary.total_allocated, Money::from_units(1_000_000));
        assert_eq!(summary.remaining, Money::zero());

        assert!(matches!(
            calc.summary_by_name("lottery"),
            Err(BudgetError::UnknownMethod(name)) if name == "lottery"
        ));
    }
}
