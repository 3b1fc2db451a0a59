//! Achievement badges earned from a user's analytics.

use serde::{Deserialize, Serialize};

use super::emissions::UserAnalytics;

/// What a badge measures and the threshold to earn it.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Goal {
    ActionsCompleted(usize),
    KgSaved(f64),
}

const BADGES: [(&str, &str, Goal); 5] = [
    ("Seedling", "Complete 5 actions", Goal::ActionsCompleted(5)),
    ("Sprout", "Complete 25 actions", Goal::ActionsCompleted(25)),
    ("Sapling", "Complete 100 actions", Goal::ActionsCompleted(100)),
    ("Tree", "Save 50 kg CO2", Goal::KgSaved(50.0)),
    ("Eco Hero", "Save 200 kg CO2", Goal::KgSaved(200.0)),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub description: String,
    pub earned: bool,
    /// Fraction of the goal reached, clamped to `[0, 1]`.
    pub progress: f64,
}

/// Evaluate every badge against `analytics`.
pub fn badges(analytics: &UserAnalytics) -> Vec<Badge> {
    BADGES
        .iter()
        .map(|(name, description, goal)| {
            let (current, target) = match *goal {
                Goal::ActionsCompleted(n) => (analytics.actions_completed as f64, n as f64),
                Goal::KgSaved(kg) => (analytics.total_saved, kg),
            };
            let progress = (current / target).clamp(0.0, 1.0);
            Badge {
                name: name.to_string(),
                description: description.to_string(),
                earned: current >= target,
                progress,
            }
        })
        .collect()
}
