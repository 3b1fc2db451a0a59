//! Per-user emissions analytics.
//!
//! Derives a [`UserAnalytics`] summary from a user's daily log rows and
//! action progress: running total, category breakdown, a seven-bucket
//! weekly trend and a 30-day forecast driven by completed actions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{round_whole, round1, round2, share_pct};
use crate::data::{DailyLogEntry, DataStore, EventCategory, UserProgressEntry};
use crate::error::{AnalyticsError, Result};

/// Weekly trend bucket labels, in calendar order.
pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Forecast horizon in days.
const FORECAST_DAYS: f64 = 30.0;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One slice of the category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    /// Capitalized category label, e.g. `"Commute"`.
    pub name: String,
    /// Category total, rounded to whole kg.
    pub value: f64,
    /// Share of the unrounded grand total, whole percent.
    pub percentage: i64,
}

/// One day of the weekly trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPoint {
    pub day: String,
    pub emissions: f64,
    pub actions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Absolute value of the reported `percentage_change`.
    pub reduction: i64,
    pub estimated_emissions: f64,
}

/// Emissions summary for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnalytics {
    pub user_id: String,
    /// Sum over the whole available log (no date window), 1 decimal.
    pub current_month_emissions: f64,
    pub baseline_monthly: f64,
    /// Forecast change versus baseline; never positive.
    pub percentage_change: i64,
    pub total_saved: f64,
    pub actions_completed: usize,
    pub total_points: u64,
    pub category_breakdown: Vec<CategorySlice>,
    pub weekly_trend: Vec<WeeklyPoint>,
    pub forecast_30_days: Forecast,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute emissions analytics for `user_id`.
///
/// Fails with [`AnalyticsError::UserNotFound`] when no such user exists.
pub fn compute_user_analytics<S>(store: &S, user_id: &str) -> Result<UserAnalytics>
where
    S: DataStore + ?Sized,
{
    let user = store
        .find_user(user_id)
        .ok_or_else(|| AnalyticsError::UserNotFound(user_id.to_string()))?;

    let logs = store.daily_logs_for(user_id);
    let total_emissions: f64 = logs.iter().map(|l| l.estimated_co2_kg).sum();

    let progress = store.progress_for(user_id);
    let completed: Vec<&UserProgressEntry> =
        progress.iter().copied().filter(|p| p.completed).collect();

    // Unknown action ids save nothing.
    let total_saved: f64 = completed
        .iter()
        .map(|p| store.find_action(&p.action_id).map_or(0.0, |a| a.est_saved_kg))
        .sum();
    let total_points: u64 = progress.iter().map(|p| u64::from(p.points_earned)).sum();

    let baseline = user.baseline_monthly_kg_co2;
    let (percentage_change, estimated_emissions) =
        forecast(baseline, total_saved, completed.len());

    Ok(UserAnalytics {
        user_id: user_id.to_string(),
        current_month_emissions: round1(total_emissions),
        baseline_monthly: baseline,
        percentage_change,
        total_saved: round2(total_saved),
        actions_completed: completed.len(),
        total_points,
        category_breakdown: category_breakdown(&logs, total_emissions),
        weekly_trend: weekly_trend(&logs, &progress),
        forecast_30_days: Forecast {
            reduction: percentage_change.abs(),
            estimated_emissions: round1(estimated_emissions),
        },
    })
}

/// Group log rows by category in first-seen order.
fn category_breakdown(logs: &[&DailyLogEntry], total: f64) -> Vec<CategorySlice> {
    let mut order: Vec<EventCategory> = Vec::new();
    let mut sums: HashMap<EventCategory, f64> = HashMap::new();
    for log in logs {
        let sum = sums.entry(log.event_type).or_insert_with(|| {
            order.push(log.event_type);
            0.0
        });
        *sum += log.estimated_co2_kg;
    }

    order
        .into_iter()
        .map(|category| {
            let sum = sums[&category];
            CategorySlice {
                name: category.label(),
                value: round_whole(sum) as f64,
                percentage: round_whole(share_pct(sum, total)),
            }
        })
        .collect()
}

/// Seven fixed buckets filled positionally: the i-th of the first seven log
/// rows lands in the i-th weekday bucket, regardless of its date. Completed
/// actions among the first seven progress rows are counted the same way.
fn weekly_trend(logs: &[&DailyLogEntry], progress: &[&UserProgressEntry]) -> Vec<WeeklyPoint> {
    let mut emissions = [0.0_f64; 7];
    let mut actions = [0_u32; 7];

    for (index, log) in logs.iter().take(7).enumerate() {
        emissions[index] += log.estimated_co2_kg;
    }
    for (index, entry) in progress.iter().take(7).enumerate() {
        if entry.completed {
            actions[index.min(6)] += 1;
        }
    }

    WEEKDAYS
        .iter()
        .enumerate()
        .map(|(i, day)| WeeklyPoint {
            day: day.to_string(),
            emissions: round1(emissions[i]),
            actions: actions[i],
        })
        .collect()
}

/// Linear 30-day extrapolation of the per-action savings rate.
///
/// Returns the clamped percentage change (never positive) and the unrounded
/// estimated monthly emissions.
fn forecast(baseline: f64, total_saved: f64, completed: usize) -> (i64, f64) {
    let avg_daily_savings = total_saved / completed.max(1) as f64;
    let projected_savings = avg_daily_savings * FORECAST_DAYS;

    let raw_change = if baseline == 0.0 {
        0
    } else {
        round_whole((baseline - projected_savings) / baseline * 100.0)
    };

    (raw_change.min(0), (baseline - projected_savings).max(0.0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
