//! Appliance energy analytics.
//!
//! Aggregates a user's energy log rows into totals, daily averages,
//! per-appliance stats, a per-type breakdown, a daily trend and
//! optimization suggestions for the heaviest non-5-star consumers.
//!
//! Rounding resolution differs by field: kWh figures use 1 decimal, CO2 and
//! cost figures use 2 decimals, percentages are whole numbers. Per-appliance
//! stats are left unrounded.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{round_whole, round1, round2, share_pct};
use crate::data::{ApplianceType, DataStore, EfficiencyRating, EnergyLogEntry};

/// Maximum number of appliances reported as top consumers.
pub const TOP_CONSUMERS: usize = 5;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Aggregated usage of one appliance over the user's log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceStats {
    pub appliance_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub appliance_type: ApplianceType,
    pub total_energy_kwh: f64,
    pub total_co2_kg: f64,
    pub total_cost_usd: f64,
    /// Hours used divided by the user's distinct log days, not the
    /// appliance's own active days.
    pub avg_daily_hours: f64,
    pub efficiency_rating: EfficiencyRating,
    pub co2_percentage: f64,
    pub cost_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    /// Capitalized appliance type label.
    #[serde(rename = "type")]
    pub type_label: String,
    pub kwh: f64,
    pub co2: f64,
    pub percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEnergy {
    pub date: String,
    pub kwh: f64,
    pub co2: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSuggestion {
    pub appliance: String,
    pub current_co2_kg: f64,
    pub potential_savings_kg: f64,
    pub potential_savings_usd: f64,
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyAnalytics {
    pub user_id: String,
    pub total_energy_kwh: f64,
    pub total_co2_kg: f64,
    pub total_cost_usd: f64,
    pub daily_average_kwh: f64,
    pub daily_average_co2: f64,
    pub daily_average_cost: f64,
    pub top_consumers: Vec<ApplianceStats>,
    pub energy_by_type: Vec<TypeBreakdown>,
    pub daily_trend: Vec<DailyEnergy>,
    pub optimization_suggestions: Vec<OptimizationSuggestion>,
}

impl EnergyAnalytics {
    /// The result for a user with no energy log rows: zero totals, empty lists.
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    kwh: f64,
    co2: f64,
    cost: f64,
}

impl Totals {
    fn add(&mut self, log: &EnergyLogEntry) {
        self.kwh += log.energy_consumed_kwh;
        self.co2 += log.estimated_co2_kg;
        self.cost += log.cost_usd;
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Compute energy analytics for `user_id`.
///
/// Does not require the user to exist: a user without energy log rows
/// (known or not) gets [`EnergyAnalytics::empty`].
pub fn compute_energy_analytics<S>(store: &S, user_id: &str) -> EnergyAnalytics
where
    S: DataStore + ?Sized,
{
    let logs = store.energy_logs_for(user_id);
    if logs.is_empty() {
        return EnergyAnalytics::empty(user_id);
    }

    let mut totals = Totals::default();
    for log in &logs {
        totals.add(log);
    }

    let unique_days = logs
        .iter()
        .map(|l| l.date.as_str())
        .collect::<HashSet<_>>()
        .len() as f64;

    let stats = appliance_stats(store, user_id, &logs, &totals, unique_days);
    let top_consumers = top_consumers(&stats);
    let optimization_suggestions = suggestions(&top_consumers);

    EnergyAnalytics {
        user_id: user_id.to_string(),
        total_energy_kwh: round1(totals.kwh),
        total_co2_kg: round2(totals.co2),
        total_cost_usd: round2(totals.cost),
        daily_average_kwh: round1(totals.kwh / unique_days),
        daily_average_co2: round2(totals.co2 / unique_days),
        daily_average_cost: round2(totals.cost / unique_days),
        energy_by_type: energy_by_type(&stats, totals.co2),
        daily_trend: daily_trend(&logs),
        top_consumers,
        optimization_suggestions,
    }
}

/// Group rows by appliance in first-seen order. Rows whose appliance is not
/// in the user's inventory are skipped.
fn appliance_stats<S>(
    store: &S,
    user_id: &str,
    logs: &[&EnergyLogEntry],
    totals: &Totals,
    unique_days: f64,
) -> Vec<ApplianceStats>
where
    S: DataStore + ?Sized,
{
    let mut stats: Vec<ApplianceStats> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for log in logs {
        let Some(appliance) = store.find_appliance(user_id, &log.appliance_id) else {
            continue;
        };

        let slot = *index.entry(log.appliance_id.as_str()).or_insert_with(|| {
            stats.push(ApplianceStats {
                appliance_id: appliance.appliance_id.clone(),
                name: appliance.name.clone(),
                appliance_type: appliance.appliance_type,
                total_energy_kwh: 0.0,
                total_co2_kg: 0.0,
                total_cost_usd: 0.0,
                avg_daily_hours: 0.0,
                efficiency_rating: appliance.efficiency_rating,
                co2_percentage: 0.0,
                cost_percentage: 0.0,
            });
            stats.len() - 1
        });

        let stat = &mut stats[slot];
        stat.total_energy_kwh += log.energy_consumed_kwh;
        stat.total_co2_kg += log.estimated_co2_kg;
        stat.total_cost_usd += log.cost_usd;
        stat.avg_daily_hours += log.hours_used;
    }

    for stat in &mut stats {
        stat.avg_daily_hours /= unique_days;
        stat.co2_percentage = share_pct(stat.total_co2_kg, totals.co2);
        stat.cost_percentage = share_pct(stat.total_cost_usd, totals.cost);
    }

    stats
}

/// Highest-CO2 appliances first, at most [`TOP_CONSUMERS`]. The sort is
/// stable, so ties keep first-seen order.
fn top_consumers(stats: &[ApplianceStats]) -> Vec<ApplianceStats> {
    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.total_co2_kg.total_cmp(&a.total_co2_kg));
    sorted.truncate(TOP_CONSUMERS);
    sorted
}

/// Re-group appliance stats by type, heaviest CO2 first.
fn energy_by_type(stats: &[ApplianceStats], total_co2: f64) -> Vec<TypeBreakdown> {
    let mut order: Vec<ApplianceType> = Vec::new();
    let mut sums: HashMap<ApplianceType, (f64, f64)> = HashMap::new();
    for stat in stats {
        let sum = sums.entry(stat.appliance_type).or_insert_with(|| {
            order.push(stat.appliance_type);
            (0.0, 0.0)
        });
        sum.0 += stat.total_energy_kwh;
        sum.1 += stat.total_co2_kg;
    }

    let mut breakdown: Vec<TypeBreakdown> = order
        .into_iter()
        .map(|appliance_type| {
            let (kwh, co2) = sums[&appliance_type];
            TypeBreakdown {
                type_label: appliance_type.label(),
                kwh: round1(kwh),
                co2: round2(co2),
                percentage: round_whole(share_pct(co2, total_co2)),
            }
        })
        .collect();

    breakdown.sort_by(|a, b| b.co2.total_cmp(&a.co2));
    breakdown
}

/// Per-date sums, ascending by ISO date string.
fn daily_trend(logs: &[&EnergyLogEntry]) -> Vec<DailyEnergy> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, Totals> = HashMap::new();
    for log in logs {
        sums.entry(log.date.as_str())
            .or_insert_with(|| {
                order.push(log.date.as_str());
                Totals::default()
            })
            .add(log);
    }

    let mut trend: Vec<DailyEnergy> = order
        .into_iter()
        .map(|date| {
            let day = sums[date];
            DailyEnergy {
                date: date.to_string(),
                kwh: round1(day.kwh),
                co2: round2(day.co2),
                cost: round2(day.cost),
            }
        })
        .collect();

    trend.sort_by(|a, b| a.date.cmp(&b.date));
    trend
}

/// Suggestions for the top consumers, skipping 5-star appliances.
///
/// The kg figure in the action text is rounded independently from
/// `potential_savings_kg`, and tiers below 4-star fall into the
/// usage-optimization message even though they claim zero numeric savings.
fn suggestions(top: &[ApplianceStats]) -> Vec<OptimizationSuggestion> {
    top.iter()
        .filter(|app| app.efficiency_rating != EfficiencyRating::FiveStar)
        .map(|app| {
            let factor = app.efficiency_rating.savings_factor();
            let action = match app.efficiency_rating {
                EfficiencyRating::ThreeStar => format!(
                    "Upgrade {} to a 5-star model - save ~{}kg CO2",
                    app.name,
                    round_whole(app.total_co2_kg * 0.3)
                ),
                _ => format!(
                    "Consider eco-friendly usage of {} - save ~{}kg CO2",
                    app.name,
                    round_whole(app.total_co2_kg * 0.15)
                ),
            };

            OptimizationSuggestion {
                appliance: app.name.clone(),
                current_co2_kg: round2(app.total_co2_kg),
                potential_savings_kg: round2(app.total_co2_kg * factor),
                potential_savings_usd: round2(app.total_cost_usd * factor),
                action,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
