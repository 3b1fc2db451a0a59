//! Built-in demo dataset used when no dataset file is configured.
//!
//! Rows for different users are interleaved on purpose so per-user filtering
//! is exercised, and `demo_alexa` carries one energy log whose appliance is
//! missing from the inventory.

use super::{
    ActionCatalogEntry, ApplianceType, DailyLogEntry, Dataset, EfficiencyRating, EnergyLogEntry,
    EventCategory, HomeAppliance, User, UserProgressEntry,
};

/// Build the demo dataset.
pub fn dataset() -> Dataset {
    Dataset {
        users: users(),
        daily_logs: daily_logs(),
        user_progress: user_progress(),
        actions_catalog: actions_catalog(),
        home_appliances: home_appliances(),
        energy_logs: energy_logs(),
    }
}

fn users() -> Vec<User> {
    [
        ("demo_alexa", "Alexa", "Rao", "IN", 3, 120.0),
        ("demo_ben", "Ben", "Carter", "UK", 2, 180.0),
        ("demo_chen", "Mei", "Chen", "US", 4, 260.0),
    ]
    .into_iter()
    .map(|(id, first, last, region, household, baseline)| User {
        user_id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        region: region.to_string(),
        household_size: household,
        baseline_monthly_kg_co2: baseline,
    })
    .collect()
}

fn daily_logs() -> Vec<DailyLogEntry> {
    use EventCategory::*;

    [
        ("demo_alexa", "2025-01-06", Commute, 2.4),
        ("demo_alexa", "2025-01-06", Diet, 3.1),
        ("demo_ben", "2025-01-06", Commute, 6.5),
        ("demo_alexa", "2025-01-07", Energy, 4.2),
        ("demo_alexa", "2025-01-07", Commute, 1.8),
        ("demo_ben", "2025-01-06", Energy, 5.0),
        ("demo_alexa", "2025-01-08", Diet, 2.7),
        ("demo_chen", "2025-01-08", Diet, 7.5),
        ("demo_alexa", "2025-01-09", Energy, 3.9),
        ("demo_alexa", "2025-01-10", Device, 0.6),
        ("demo_ben", "2025-01-07", Shopping, 3.2),
        ("demo_alexa", "2025-01-11", Commute, 2.2),
        ("demo_chen", "2025-01-08", Energy, 9.25),
        ("demo_alexa", "2025-01-12", Diet, 3.4),
    ]
    .into_iter()
    .map(|(user, date, event_type, co2)| DailyLogEntry {
        user_id: user.to_string(),
        date: date.to_string(),
        event_type,
        estimated_co2_kg: co2,
    })
    .collect()
}

fn user_progress() -> Vec<UserProgressEntry> {
    [
        ("demo_alexa", "A002", true, 30),
        ("demo_alexa", "A003", true, 10),
        ("demo_ben", "A006", true, 25),
        ("demo_alexa", "A006", false, 0),
        ("demo_alexa", "A001", true, 15),
        ("demo_ben", "A004", true, 5),
        ("demo_alexa", "A005", false, 5),
        ("demo_chen", "A002", false, 0),
        // Not in the catalog: completed, but saves nothing.
        ("demo_ben", "A999", true, 10),
    ]
    .into_iter()
    .map(|(user, action, completed, points)| UserProgressEntry {
        user_id: user.to_string(),
        action_id: action.to_string(),
        completed,
        points_earned: points,
    })
    .collect()
}

fn actions_catalog() -> Vec<ActionCatalogEntry> {
    use EventCategory::*;

    [
        ("A001", "Walk or cycle for short commutes", Commute, 0.9),
        ("A002", "Switch one meat meal to plant-based", Diet, 3.3),
        ("A003", "Delay AC by 1° and use fan", Energy, 0.4),
        ("A004", "Turn off lights and use LED bulbs", Energy, 0.15),
        ("A005", "Unplug devices when not in use", Device, 0.08),
        ("A006", "Take public transport 2x per week", Commute, 2.1),
    ]
    .into_iter()
    .map(|(id, title, category, saved)| ActionCatalogEntry {
        action_id: id.to_string(),
        title: title.to_string(),
        category,
        est_saved_kg: saved,
    })
    .collect()
}

fn home_appliances() -> Vec<HomeAppliance> {
    use ApplianceType::*;
    use EfficiencyRating::*;

    [
        ("demo_alexa", "APP001", "Split AC", Cooling, 1500.0, 6.0, 8.0, ThreeStar, 160.0),
        ("demo_alexa", "APP002", "Refrigerator", Kitchen, 150.0, 24.0, 5.0, FourStar, 65.0),
        ("demo_alexa", "APP003", "Water Heater", Heating, 2000.0, 1.0, 10.0, ThreeStar, 50.0),
        ("demo_alexa", "APP004", "Washing Machine", Laundry, 500.0, 1.0, 3.0, FiveStar, 12.0),
        ("demo_alexa", "APP005", "LED Lighting", Lighting, 60.0, 6.0, 2.0, FiveStar, 9.0),
        ("demo_alexa", "APP006", "Television", Entertainment, 120.0, 4.0, 6.0, FourStar, 12.0),
        ("demo_alexa", "APP007", "Ceiling Fan", Cooling, 75.0, 10.0, 12.0, TwoStar, 18.0),
        ("demo_ben", "APP101", "Electric Heater", Heating, 2000.0, 5.0, 9.0, ThreeStar, 75.0),
        ("demo_chen", "APP201", "Dishwasher", Cleaning, 1200.0, 1.0, 2.0, FiveStar, 20.0),
    ]
    .into_iter()
    .map(
        |(user, id, name, appliance_type, watts, hours, age, rating, monthly)| HomeAppliance {
            user_id: user.to_string(),
            appliance_id: id.to_string(),
            name: name.to_string(),
            appliance_type,
            power_watts: watts,
            usage_hours_daily: hours,
            age_years: age,
            efficiency_rating: rating,
            estimated_monthly_kg_co2: monthly,
        },
    )
    .collect()
}

fn energy_logs() -> Vec<EnergyLogEntry> {
    const WEEK: [&str; 5] = [
        "2025-01-06",
        "2025-01-07",
        "2025-01-08",
        "2025-01-09",
        "2025-01-10",
    ];

    let mut rows: Vec<(&str, &str, &str, f64, f64, f64, f64)> = vec![
        ("demo_alexa", "APP001", "2025-01-06", 9.0, 7.2, 0.9, 6.0),
        ("demo_alexa", "APP001", "2025-01-07", 7.5, 6.0, 0.75, 5.0),
        ("demo_alexa", "APP001", "2025-01-08", 10.5, 8.4, 1.05, 7.0),
        ("demo_alexa", "APP001", "2025-01-09", 6.0, 4.8, 0.6, 4.0),
        ("demo_alexa", "APP001", "2025-01-10", 9.0, 7.2, 0.9, 6.0),
        ("demo_alexa", "APP003", "2025-01-06", 2.0, 1.6, 0.2, 1.0),
        ("demo_alexa", "APP003", "2025-01-08", 2.0, 1.6, 0.2, 1.0),
        ("demo_alexa", "APP003", "2025-01-10", 2.5, 2.0, 0.25, 1.25),
        ("demo_alexa", "APP004", "2025-01-07", 0.5, 0.4, 0.05, 1.0),
        ("demo_alexa", "APP004", "2025-01-09", 0.5, 0.4, 0.05, 1.0),
        ("demo_ben", "APP101", "2025-01-06", 10.0, 2.3, 3.0, 5.0),
        ("demo_ben", "APP101", "2025-01-07", 8.0, 1.84, 2.4, 4.0),
        // Appliance missing from the inventory.
        ("demo_alexa", "APP999", "2025-01-11", 1.2, 0.96, 0.12, 2.0),
    ];

    for date in WEEK {
        rows.push(("demo_alexa", "APP002", date, 3.6, 2.88, 0.36, 24.0));
        rows.push(("demo_alexa", "APP005", date, 0.36, 0.288, 0.036, 6.0));
        rows.push(("demo_alexa", "APP006", date, 0.48, 0.384, 0.048, 4.0));
        rows.push(("demo_alexa", "APP007", date, 0.8, 0.64, 0.08, 10.0));
    }

    rows.into_iter()
        .map(|(user, appliance, date, kwh, co2, cost, hours)| EnergyLogEntry {
            user_id: user.to_string(),
            appliance_id: appliance.to_string(),
            date: date.to_string(),
            energy_consumed_kwh: kwh,
            estimated_co2_kg: co2,
            cost_usd: cost,
            hours_used: hours,
        })
        .collect()
}
