/// Energy and appliance engine tests over a dataset loaded from JSON.
use carbonlens::analytics::appliances::{appliance_inventory, appliance_usage};
use carbonlens::analytics::rewards::badges;
use carbonlens::analytics::{EnergyAnalytics, compute_energy_analytics, compute_user_analytics};
use carbonlens::data::{DataStore, Dataset, EfficiencyRating};

const FIXTURE: &str = r#"{
  "users": [
    {"user_id": "u1", "first_name": "Ira", "region": "IN", "household_size": 2,
     "baseline_monthly_kgCO2": 150},
    {"user_id": "u2", "first_name": "Noor", "region": "UK", "household_size": 1,
     "baseline_monthly_kgCO2": 90}
  ],
  "home_appliances": [
    {"user_id": "u1", "appliance_id": "A1", "name": "AC", "type": "cooling",
     "power_watts": 1500, "usage_hours_daily": 5, "age_years": 9,
     "efficiency_rating": "3-star", "estimated_monthly_kgCO2": 120},
    {"user_id": "u1", "appliance_id": "A2", "name": "Fridge", "type": "kitchen",
     "power_watts": 150, "usage_hours_daily": 24, "age_years": 2,
     "efficiency_rating": "5-star", "estimated_monthly_kgCO2": 25},
    {"user_id": "u1", "appliance_id": "A3", "name": "Bulbs", "type": "lighting",
     "power_watts": 60, "usage_hours_daily": 6, "age_years": 1,
     "efficiency_rating": "2-star", "estimated_monthly_kgCO2": 8},
    {"user_id": "u1", "appliance_id": "A4", "name": "Washer", "type": "laundry",
     "power_watts": 500, "usage_hours_daily": 1, "age_years": 3,
     "efficiency_rating": "4-star", "estimated_monthly_kgCO2": 12},
    {"user_id": "u1", "appliance_id": "A5", "name": "Heater", "type": "heating",
     "power_watts": 2000, "usage_hours_daily": 2, "age_years": 4,
     "efficiency_rating": "1-star", "estimated_monthly_kgCO2": 60},
    {"user_id": "u1", "appliance_id": "A6", "name": "TV", "type": "entertainment",
     "power_watts": 100, "usage_hours_daily": 3, "age_years": 2,
     "efficiency_rating": "3-star", "estimated_monthly_kgCO2": 6},
    {"user_id": "u2", "appliance_id": "B1", "name": "Kettle", "type": "kitchen",
     "power_watts": 1800, "usage_hours_daily": 0.2, "age_years": 1,
     "efficiency_rating": "5-star", "estimated_monthly_kgCO2": 3}
  ],
  "energy_logs": [
    {"user_id": "u1", "appliance_id": "A1", "date": "2025-03-02",
     "energy_consumed_kwh": 10, "estimated_co2_kg": 8, "cost_usd": 1, "hours_used": 5},
    {"user_id": "u1", "appliance_id": "A2", "date": "2025-03-02",
     "energy_consumed_kwh": 2, "estimated_co2_kg": 1.6, "cost_usd": 0.2, "hours_used": 24},
    {"user_id": "u1", "appliance_id": "A3", "date": "2025-03-02",
     "energy_consumed_kwh": 1, "estimated_co2_kg": 0.8, "cost_usd": 0.1, "hours_used": 6},
    {"user_id": "u1", "appliance_id": "A4", "date": "2025-03-02",
     "energy_consumed_kwh": 3, "estimated_co2_kg": 2.4, "cost_usd": 0.3, "hours_used": 1},
    {"user_id": "u1", "appliance_id": "A5", "date": "2025-03-02",
     "energy_consumed_kwh": 4, "estimated_co2_kg": 3.2, "cost_usd": 0.4, "hours_used": 2},
    {"user_id": "u1", "appliance_id": "A6", "date": "2025-03-02",
     "energy_consumed_kwh": 0.5, "estimated_co2_kg": 0.4, "cost_usd": 0.05, "hours_used": 3},
    {"user_id": "u1", "appliance_id": "A1", "date": "2025-03-01",
     "energy_consumed_kwh": 10, "estimated_co2_kg": 8, "cost_usd": 1, "hours_used": 5},
    {"user_id": "u1", "appliance_id": "X9", "date": "2025-03-01",
     "energy_consumed_kwh": 5, "estimated_co2_kg": 4, "cost_usd": 0.5, "hours_used": 1}
  ]
}"#;

fn fixture() -> Dataset {
    Dataset::from_json_str(FIXTURE).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[test]
fn totals_include_rows_of_unknown_appliances() {
    let e = compute_energy_analytics(&fixture(), "u1");

    assert!(approx(e.total_energy_kwh, 35.5));
    assert!(approx(e.total_co2_kg, 28.4));
    assert!(approx(e.total_cost_usd, 3.55));
}

#[test]
fn daily_averages_divide_by_distinct_dates_and_round_half_up() {
    let e = compute_energy_analytics(&fixture(), "u1");

    // 35.5 / 2 = 17.75 rounds up to 17.8.
    assert!(approx(e.daily_average_kwh, 17.8));
    assert!(approx(e.daily_average_co2, 14.2));
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

#[test]
fn top_consumers_capped_at_five_and_sorted() {
    let e = compute_energy_analytics(&fixture(), "u1");

    let ids: Vec<&str> = e.top_consumers.iter().map(|a| a.appliance_id.as_str()).collect();
    assert_eq!(ids, vec!["A1", "A5", "A4", "A2", "A3"]);
    assert!(
        e.top_consumers
            .windows(2)
            .all(|w| w[0].total_co2_kg >= w[1].total_co2_kg)
    );

    let ac = &e.top_consumers[0];
    assert!(approx(ac.total_co2_kg, 16.0));
    assert!(approx(ac.avg_daily_hours, 5.0));
}

#[test]
fn type_percentages_use_total_including_unknown_rows() {
    let e = compute_energy_analytics(&fixture(), "u1");

    assert_eq!(e.energy_by_type.len(), 6);
    assert_eq!(e.energy_by_type[0].type_label, "Cooling");
    // 16 / 28.4 = 56.3%.
    assert_eq!(e.energy_by_type[0].percentage, 56);

    let sum: i64 = e.energy_by_type.iter().map(|t| t.percentage).sum();
    assert!(sum <= 100);
}

#[test]
fn daily_trend_is_sorted_by_date() {
    let e = compute_energy_analytics(&fixture(), "u1");

    let dates: Vec<&str> = e.daily_trend.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-03-01", "2025-03-02"]);
    assert!(approx(e.daily_trend[0].kwh, 15.0));
    assert!(approx(e.daily_trend[1].kwh, 20.5));
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

#[test]
fn suggestions_skip_five_star_and_follow_top_order() {
    let e = compute_energy_analytics(&fixture(), "u1");

    let names: Vec<&str> = e
        .optimization_suggestions
        .iter()
        .map(|s| s.appliance.as_str())
        .collect();
    assert_eq!(names, vec!["AC", "Heater", "Washer", "Bulbs"]);

    let ac = &e.optimization_suggestions[0];
    assert!(approx(ac.potential_savings_kg, 4.8));
    assert!(approx(ac.potential_savings_usd, 0.6));
    assert_eq!(ac.action, "Upgrade AC to a 5-star model - save ~5kg CO2");

    let washer = &e.optimization_suggestions[2];
    assert!(approx(washer.potential_savings_kg, 0.36));
    assert!(washer.action.starts_with("Consider eco-friendly usage of Washer"));
}

#[test]
fn low_tier_suggestions_claim_no_numeric_savings() {
    let e = compute_energy_analytics(&fixture(), "u1");

    let heater = &e.optimization_suggestions[1];
    assert_eq!(heater.potential_savings_kg, 0.0);
    assert_eq!(heater.potential_savings_usd, 0.0);
    assert_eq!(
        heater.action,
        "Consider eco-friendly usage of Heater - save ~0kg CO2"
    );
}

// ---------------------------------------------------------------------------
// Empty results
// ---------------------------------------------------------------------------

#[test]
fn user_without_logs_gets_empty_result() {
    let ds = fixture();
    for user in ["u2", "nobody"] {
        let e = compute_energy_analytics(&ds, user);
        assert_eq!(e, EnergyAnalytics::empty(user));
        assert_eq!(e.total_energy_kwh, 0.0);
        assert!(e.top_consumers.is_empty());
        assert!(e.daily_trend.is_empty());
    }
}

#[test]
fn energy_analytics_json_round_trip() {
    let e = compute_energy_analytics(&fixture(), "u1");
    let json = serde_json::to_string(&e).unwrap();
    assert!(json.contains("\"type\":\"Cooling\""));

    let back: EnergyAnalytics = serde_json::from_str(&json).unwrap();
    assert_eq!(back, e);
}

// ---------------------------------------------------------------------------
// Appliances and badges
// ---------------------------------------------------------------------------

#[test]
fn inventory_lists_owned_appliances_in_store_order() {
    let ds = fixture();
    let inventory = appliance_inventory(&ds, "u1");

    assert_eq!(inventory.len(), 6);
    assert_eq!(inventory[0].appliance.appliance_id, "A1");
    assert!(approx(inventory[0].totals.co2, 16.0));
    // 3-star, older than 7 years and cooling above 4 hours.
    assert_eq!(inventory[0].tips.len(), 3);
    assert_eq!(
        inventory[1].tips,
        vec!["Try to reduce daily usage hours to save energy".to_string()]
    );
    assert_eq!(
        inventory[3].tips,
        vec!["This appliance is already optimized for energy efficiency".to_string()]
    );
    assert_eq!(
        inventory[0].appliance.efficiency_rating,
        EfficiencyRating::ThreeStar
    );
}

#[test]
fn usage_history_is_date_sorted() {
    let points = appliance_usage(&fixture(), "u1", "A1");
    let dates: Vec<&str> = points.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-03-01", "2025-03-02"]);
}

#[test]
fn user_with_no_actions_has_no_badges() {
    let ds = fixture();
    assert!(ds.progress_for("u1").is_empty());

    let analytics = compute_user_analytics(&ds, "u1").unwrap();
    let earned = badges(&analytics).into_iter().filter(|b| b.earned).count();
    assert_eq!(earned, 0);
}

// ---------------------------------------------------------------------------
// Dataset loading
// ---------------------------------------------------------------------------

#[test]
fn loads_dataset_file_from_disk() {
    let path = std::env::temp_dir().join(format!(
        "carbonlens-dataset-{}.json",
        std::process::id()
    ));
    std::fs::write(&path, FIXTURE).unwrap();

    let ds = Dataset::load(&path).unwrap();
    assert_eq!(ds.users().len(), 2);
    assert_eq!(ds.energy_logs_for("u1").len(), 8);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn rejects_negative_energy_rows() {
    let json = FIXTURE.replace("\"cost_usd\": 0.5", "\"cost_usd\": -0.5");
    let err = Dataset::from_json_str(&json).unwrap_err();
    assert!(format!("{err:#}").contains("negative measurement"));
}
