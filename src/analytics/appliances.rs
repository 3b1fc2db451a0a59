//! Appliance inventory insights: rule-based tips, per-appliance usage
//! history and totals.

use serde::{Deserialize, Serialize};

use crate::data::{ApplianceType, DataStore, EfficiencyRating, HomeAppliance};

const OLD_APPLIANCE_YEARS: f64 = 7.0;
const HEAVY_USE_HOURS: f64 = 8.0;
const COOLING_HEAVY_USE_HOURS: f64 = 4.0;

/// One log row of a single appliance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsagePoint {
    pub date: String,
    pub kwh: f64,
    pub co2: f64,
    pub cost: f64,
}

/// Unrounded sums over an appliance's log rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplianceTotals {
    pub kwh: f64,
    pub co2: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplianceInsight {
    pub appliance: HomeAppliance,
    pub totals: ApplianceTotals,
    pub tips: Vec<String>,
}

/// Optimization tips for an appliance, in rule order. Never empty.
pub fn appliance_tips(appliance: &HomeAppliance) -> Vec<String> {
    let mut tips = Vec::new();

    if appliance.efficiency_rating == EfficiencyRating::ThreeStar {
        tips.push("Consider upgrading to a newer energy-efficient model".to_string());
    }
    if appliance.age_years > OLD_APPLIANCE_YEARS {
        tips.push(
            "This appliance is older - newer models use significantly less energy".to_string(),
        );
    }
    if appliance.usage_hours_daily > HEAVY_USE_HOURS {
        tips.push("Try to reduce daily usage hours to save energy".to_string());
    }
    if appliance.appliance_type == ApplianceType::Cooling
        && appliance.usage_hours_daily > COOLING_HEAVY_USE_HOURS
    {
        tips.push("Use fans for cooler days and increase AC temperature by 1-2 degrees".to_string());
    }
    if appliance.appliance_type == ApplianceType::Heating {
        tips.push("Use blankets or layer clothing to reduce heater dependency".to_string());
    }

    if tips.is_empty() {
        tips.push("This appliance is already optimized for energy efficiency".to_string());
    }
    tips
}

/// The user's log rows for one appliance, ascending by date.
pub fn appliance_usage<S>(store: &S, user_id: &str, appliance_id: &str) -> Vec<UsagePoint>
where
    S: DataStore + ?Sized,
{
    let mut points: Vec<UsagePoint> = store
        .energy_logs_for(user_id)
        .into_iter()
        .filter(|l| l.appliance_id == appliance_id)
        .map(|l| UsagePoint {
            date: l.date.clone(),
            kwh: l.energy_consumed_kwh,
            co2: l.estimated_co2_kg,
            cost: l.cost_usd,
        })
        .collect();

    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

pub fn appliance_totals<S>(store: &S, user_id: &str, appliance_id: &str) -> ApplianceTotals
where
    S: DataStore + ?Sized,
{
    store
        .energy_logs_for(user_id)
        .into_iter()
        .filter(|l| l.appliance_id == appliance_id)
        .fold(ApplianceTotals::default(), |mut acc, l| {
            acc.kwh += l.energy_consumed_kwh;
            acc.co2 += l.estimated_co2_kg;
            acc.cost += l.cost_usd;
            acc
        })
}

/// Every appliance the user owns, in store order, with totals and tips.
pub fn appliance_inventory<S>(store: &S, user_id: &str) -> Vec<ApplianceInsight>
where
    S: DataStore + ?Sized,
{
    store
        .appliances_for(user_id)
        .into_iter()
        .map(|appliance| ApplianceInsight {
            totals: appliance_totals(store, user_id, &appliance.appliance_id),
            tips: appliance_tips(appliance),
            appliance: appliance.clone(),
        })
        .collect()
}
