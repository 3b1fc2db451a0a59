//! Source entities and the read-only store the analytics engines borrow from.
//!
//! Every collection is exposed in its native insertion order. The engines
//! rely on that order for "first N rows" bucketing and for stable
//! tie-breaks, so implementations of [`DataStore`] must never re-sort.
//!
//! Categorical tags (`event_type`, `type`, `efficiency_rating`) are closed
//! enumerations: an unknown tag in a dataset file fails deserialization
//! instead of silently flowing into a catch-all branch.

pub mod demo;

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

// ---------------------------------------------------------------------------
// Categorical tags
// ---------------------------------------------------------------------------

/// Emission event category of a daily log row or a catalog action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Commute,
    Diet,
    Energy,
    Device,
    Shopping,
    Waste,
}

impl EventCategory {
    /// The raw tag as it appears in the dataset.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Commute => "commute",
            Self::Diet => "diet",
            Self::Energy => "energy",
            Self::Device => "device",
            Self::Shopping => "shopping",
            Self::Waste => "waste",
        }
    }

    /// Parse a raw tag, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "commute" => Some(Self::Commute),
            "diet" => Some(Self::Diet),
            "energy" => Some(Self::Energy),
            "device" => Some(Self::Device),
            "shopping" => Some(Self::Shopping),
            "waste" => Some(Self::Waste),
            _ => None,
        }
    }

    /// Display label: the raw tag with its first character upper-cased.
    pub fn label(self) -> String {
        capitalize(self.as_str())
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appliance category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplianceType {
    Cooling,
    Heating,
    Kitchen,
    Laundry,
    Lighting,
    Entertainment,
    Cleaning,
}

impl ApplianceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cooling => "cooling",
            Self::Heating => "heating",
            Self::Kitchen => "kitchen",
            Self::Laundry => "laundry",
            Self::Lighting => "lighting",
            Self::Entertainment => "entertainment",
            Self::Cleaning => "cleaning",
        }
    }

    pub fn label(self) -> String {
        capitalize(self.as_str())
    }
}

impl fmt::Display for ApplianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal energy-efficiency tier. Variants are declared in ascending order
/// so the derived `Ord` matches the tier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EfficiencyRating {
    #[serde(rename = "1-star")]
    OneStar,
    #[serde(rename = "2-star")]
    TwoStar,
    #[serde(rename = "3-star")]
    ThreeStar,
    #[serde(rename = "4-star")]
    FourStar,
    #[serde(rename = "5-star")]
    FiveStar,
}

impl EfficiencyRating {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneStar => "1-star",
            Self::TwoStar => "2-star",
            Self::ThreeStar => "3-star",
            Self::FourStar => "4-star",
            Self::FiveStar => "5-star",
        }
    }

    /// Fraction of an appliance's CO2/cost assumed recoverable by acting on
    /// it. Only 3-star and 4-star tiers claim savings.
    pub fn savings_factor(self) -> f64 {
        match self {
            Self::ThreeStar => 0.3,
            Self::FourStar => 0.15,
            Self::OneStar | Self::TwoStar | Self::FiveStar => 0.0,
        }
    }
}

impl fmt::Display for EfficiencyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-case the first character of a tag.
pub fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub region: String,
    pub household_size: u32,
    /// Reference monthly emissions; the divisor for forecast percentages.
    #[serde(rename = "baseline_monthly_kgCO2")]
    pub baseline_monthly_kg_co2: f64,
}

/// One emissions event for a user on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    pub user_id: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub event_type: EventCategory,
    pub estimated_co2_kg: f64,
}

/// A reusable micro-action template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCatalogEntry {
    pub action_id: String,
    #[serde(default)]
    pub title: String,
    pub category: EventCategory,
    pub est_saved_kg: f64,
}

/// One attempt at a catalog action by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgressEntry {
    pub user_id: String,
    pub action_id: String,
    pub completed: bool,
    #[serde(default)]
    pub points_earned: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeAppliance {
    pub user_id: String,
    pub appliance_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub appliance_type: ApplianceType,
    pub power_watts: f64,
    pub usage_hours_daily: f64,
    pub age_years: f64,
    pub efficiency_rating: EfficiencyRating,
    #[serde(rename = "estimated_monthly_kgCO2")]
    pub estimated_monthly_kg_co2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyLogEntry {
    pub user_id: String,
    pub appliance_id: String,
    /// ISO `YYYY-MM-DD`; lexical order is chronological order.
    pub date: String,
    pub energy_consumed_kwh: f64,
    pub estimated_co2_kg: f64,
    pub cost_usd: f64,
    pub hours_used: f64,
}

// ---------------------------------------------------------------------------
// Store abstraction
// ---------------------------------------------------------------------------

/// Read-only access to the six source collections.
///
/// The per-user helpers filter without reordering, so "first N" semantics
/// follow the underlying collection order.
pub trait DataStore {
    fn users(&self) -> &[User];
    fn daily_logs(&self) -> &[DailyLogEntry];
    fn user_progress(&self) -> &[UserProgressEntry];
    fn actions_catalog(&self) -> &[ActionCatalogEntry];
    fn home_appliances(&self) -> &[HomeAppliance];
    fn energy_logs(&self) -> &[EnergyLogEntry];

    fn find_user(&self, user_id: &str) -> Option<&User> {
        self.users().iter().find(|u| u.user_id == user_id)
    }

    fn find_action(&self, action_id: &str) -> Option<&ActionCatalogEntry> {
        self.actions_catalog()
            .iter()
            .find(|a| a.action_id == action_id)
    }

    /// Look up an appliance among those owned by `user_id`.
    fn find_appliance(&self, user_id: &str, appliance_id: &str) -> Option<&HomeAppliance> {
        self.home_appliances()
            .iter()
            .find(|a| a.user_id == user_id && a.appliance_id == appliance_id)
    }

    fn daily_logs_for(&self, user_id: &str) -> Vec<&DailyLogEntry> {
        self.daily_logs()
            .iter()
            .filter(|l| l.user_id == user_id)
            .collect()
    }

    fn progress_for(&self, user_id: &str) -> Vec<&UserProgressEntry> {
        self.user_progress()
            .iter()
            .filter(|p| p.user_id == user_id)
            .collect()
    }

    fn appliances_for(&self, user_id: &str) -> Vec<&HomeAppliance> {
        self.home_appliances()
            .iter()
            .filter(|a| a.user_id == user_id)
            .collect()
    }

    fn energy_logs_for(&self, user_id: &str) -> Vec<&EnergyLogEntry> {
        self.energy_logs()
            .iter()
            .filter(|l| l.user_id == user_id)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// In-memory dataset
// ---------------------------------------------------------------------------

/// The full set of source collections held in memory.
///
/// Deserializes from the dataset JSON format (one array per collection) and
/// implements [`DataStore`] directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub daily_logs: Vec<DailyLogEntry>,
    pub user_progress: Vec<UserProgressEntry>,
    pub actions_catalog: Vec<ActionCatalogEntry>,
    pub home_appliances: Vec<HomeAppliance>,
    pub energy_logs: Vec<EnergyLogEntry>,
}

impl Dataset {
    /// Parse a dataset from its JSON text and check entity invariants.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(json).context("failed to parse dataset JSON")?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Load a dataset JSON file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("invalid dataset file {}", path.display()))
    }

    /// Check the numeric invariants the engines divide by or sum over.
    pub fn validate(&self) -> crate::error::Result<()> {
        for user in &self.users {
            if !(user.baseline_monthly_kg_co2 > 0.0) {
                return Err(AnalyticsError::Dataset(format!(
                    "user {} has non-positive baseline {}",
                    user.user_id, user.baseline_monthly_kg_co2
                )));
            }
        }

        if let Some(log) = self.daily_logs.iter().find(|l| l.estimated_co2_kg < 0.0) {
            return Err(AnalyticsError::Dataset(format!(
                "daily log for {} on {} has negative emissions",
                log.user_id, log.date
            )));
        }

        if let Some(log) = self.energy_logs.iter().find(|l| {
            l.energy_consumed_kwh < 0.0
                || l.estimated_co2_kg < 0.0
                || l.cost_usd < 0.0
                || l.hours_used < 0.0
        }) {
            return Err(AnalyticsError::Dataset(format!(
                "energy log for {}/{} on {} has a negative measurement",
                log.user_id, log.appliance_id, log.date
            )));
        }

        Ok(())
    }
}

impl DataStore for Dataset {
    fn users(&self) -> &[User] {
        &self.users
    }

    fn daily_logs(&self) -> &[DailyLogEntry] {
        &self.daily_logs
    }

    fn user_progress(&self) -> &[UserProgressEntry] {
        &self.user_progress
    }

    fn actions_catalog(&self) -> &[ActionCatalogEntry] {
        &self.actions_catalog
    }

    fn home_appliances(&self) -> &[HomeAppliance] {
        &self.home_appliances
    }

    fn energy_logs(&self) -> &[EnergyLogEntry] {
        &self.energy_logs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
