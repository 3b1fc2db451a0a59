//! Cross-user rollup of emissions analytics.

use serde::{Deserialize, Serialize};

use super::emissions::{UserAnalytics, compute_user_analytics};
use super::{mean, round1, round2};
use crate::data::DataStore;
use crate::error::Result;

/// One user's entry in the comparison, in store enumeration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserComparison {
    pub name: String,
    pub baseline: f64,
    pub analytics: UserAnalytics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonAnalytics {
    pub user_count: usize,
    pub avg_baseline: f64,
    pub avg_current_emissions: f64,
    pub total_saved_across_users: f64,
    pub avg_reduction_percentage: f64,
    pub users: Vec<UserComparison>,
}

impl ComparisonAnalytics {
    /// Users ordered by total kg saved, highest first. Ties keep store order.
    pub fn ranked_by_saved(&self) -> Vec<&UserComparison> {
        let mut ranked: Vec<&UserComparison> = self.users.iter().collect();
        ranked.sort_by(|a, b| b.analytics.total_saved.total_cmp(&a.analytics.total_saved));
        ranked
    }
}

/// Compute analytics for every user and aggregate them.
///
/// An empty store yields zero averages rather than NaN.
pub fn compute_comparison<S>(store: &S) -> Result<ComparisonAnalytics>
where
    S: DataStore + ?Sized,
{
    let users = store
        .users()
        .iter()
        .map(|user| {
            Ok(UserComparison {
                name: user.first_name.clone(),
                baseline: user.baseline_monthly_kg_co2,
                analytics: compute_user_analytics(store, &user.user_id)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let avg_baseline = mean(users.iter().map(|u| u.baseline));
    let avg_current = mean(users.iter().map(|u| u.analytics.current_month_emissions));
    let total_saved: f64 = users.iter().map(|u| u.analytics.total_saved).sum();
    let avg_reduction = mean(
        users
            .iter()
            .map(|u| u.analytics.percentage_change.abs() as f64),
    );

    Ok(ComparisonAnalytics {
        user_count: users.len(),
        avg_baseline: round1(avg_baseline),
        avg_current_emissions: round1(avg_current),
        total_saved_across_users: round2(total_saved),
        avg_reduction_percentage: round1(avg_reduction),
        users,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Dataset, demo};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn aggregates_demo_users() {
        let ds = demo::dataset();
        let cmp = compute_comparison(&ds).unwrap();

        assert_eq!(cmp.user_count, 3);
        assert!(approx(cmp.avg_baseline, 186.7));
        assert!(approx(cmp.avg_current_emissions, 18.6));
        assert!(approx(cmp.total_saved_across_users, 6.85));
        assert_eq!(cmp.avg_reduction_percentage, 0.0);
    }

    #[test]
    fn preserves_user_enumeration_order() {
        let ds = demo::dataset();
        let cmp = compute_comparison(&ds).unwrap();
        let names: Vec<&str> = cmp.users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Alexa", "Ben", "Mei"]);
    }

    #[test]
    fn ranking_is_stable_and_descending() {
        let ds = demo::dataset();
        let cmp = compute_comparison(&ds).unwrap();
        let ranked: Vec<&str> = cmp
            .ranked_by_saved()
            .iter()
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(ranked, vec!["Alexa", "Ben", "Mei"]);
    }

    #[test]
    fn empty_store_yields_zeroes() {
        let cmp = compute_comparison(&Dataset::default()).unwrap();
        assert_eq!(cmp.user_count, 0);
        assert_eq!(cmp.avg_baseline, 0.0);
        assert_eq!(cmp.avg_current_emissions, 0.0);
        assert_eq!(cmp.avg_reduction_percentage, 0.0);
        assert!(cmp.users.is_empty());
    }
}
