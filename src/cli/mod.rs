//! CLI command implementations for carbonlens.
//!
//! Provides subcommand handlers for:
//! - `carbonlens user` - per-user emissions summary, breakdown, trend, forecast
//! - `carbonlens compare` - cross-user comparison
//! - `carbonlens energy` - appliance energy analytics and suggestions
//! - `carbonlens appliances` - appliance inventory, tips, usage history
//! - `carbonlens badges` - achievement badges
//! - `carbonlens actions` - micro-action catalog
//! - `carbonlens health` - config, dataset and log status
//! - `carbonlens config show|init|set|reset` - configuration management

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::analytics::actions;
use crate::analytics::appliances::{self, ApplianceInsight, UsagePoint};
use crate::analytics::comparison::ComparisonAnalytics;
use crate::analytics::energy::EnergyAnalytics;
use crate::analytics::rewards::{self, Badge};
use crate::analytics::{
    UserAnalytics, compute_comparison, compute_energy_analytics, compute_user_analytics,
};
use crate::config::{self, CarbonConfig, OutputFormat};
use crate::data::{ActionCatalogEntry, DataStore, EventCategory};

// ---------------------------------------------------------------------------
// carbonlens user
// ---------------------------------------------------------------------------

/// Show emissions analytics for one user.
pub fn run_user(store: &dyn DataStore, user_id: &str, format: OutputFormat) -> Result<()> {
    let analytics = compute_user_analytics(store, user_id)?;

    match format {
        OutputFormat::Json => print_json(&analytics)?,
        OutputFormat::Csv => print_user_csv(&analytics),
        OutputFormat::Table => print_user_table(store, &analytics),
    }

    Ok(())
}

fn print_user_table(store: &dyn DataStore, a: &UserAnalytics) {
    let name = store
        .find_user(&a.user_id)
        .map(|u| format!("{} {}", u.first_name, u.last_name))
        .unwrap_or_else(|| a.user_id.clone());

    println!("{}", format!("Carbon Footprint - {}", name.trim()).bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    println!("  {} {} kg", "Current emissions:".bold(), a.current_month_emissions);
    println!("  {} {} kg", "Monthly baseline: ".bold(), a.baseline_monthly);
    println!("  {} {} kg", "Total saved:      ".bold(), a.total_saved);
    println!("  {} {}", "Actions completed:".bold(), a.actions_completed);
    println!("  {} {}", "Green points:     ".bold(), a.total_points);
    println!();

    if !a.category_breakdown.is_empty() {
        println!("{}", "Category Breakdown".bold().cyan());
        println!("  {:<14} {:>10} {:>8}", "Category", "kg CO2", "Share");
        println!("  {}", "-".repeat(34));
        for cat in &a.category_breakdown {
            println!("  {:<14} {:>10} {:>7}%", cat.name, cat.value, cat.percentage);
        }
        println!();
    }

    println!("{}", "Weekly Trend".bold().cyan());
    println!("  {:<6} {:>10} {:>8}", "Day", "kg CO2", "Actions");
    println!("  {}", "-".repeat(26));
    for point in &a.weekly_trend {
        println!("  {:<6} {:>10} {:>8}", point.day, point.emissions, point.actions);
    }
    println!();

    println!("{}", "30-Day Forecast".bold().cyan());
    println!(
        "  Projected reduction: {}%   Estimated emissions: {} kg",
        a.forecast_30_days.reduction, a.forecast_30_days.estimated_emissions
    );
}

fn print_user_csv(a: &UserAnalytics) {
    println!("metric,value");
    println!("user_id,{}", a.user_id);
    println!("current_month_emissions_kg,{}", a.current_month_emissions);
    println!("baseline_monthly_kg,{}", a.baseline_monthly);
    println!("percentage_change,{}", a.percentage_change);
    println!("total_saved_kg,{}", a.total_saved);
    println!("actions_completed,{}", a.actions_completed);
    println!("total_points,{}", a.total_points);
    println!("forecast_reduction_pct,{}", a.forecast_30_days.reduction);
    println!(
        "forecast_estimated_emissions_kg,{}",
        a.forecast_30_days.estimated_emissions
    );
    println!();
    println!("category,value_kg,percentage");
    for cat in &a.category_breakdown {
        println!("{},{},{}", cat.name, cat.value, cat.percentage);
    }
}

// ---------------------------------------------------------------------------
// carbonlens compare
// ---------------------------------------------------------------------------

/// Show the cross-user comparison.
pub fn run_compare(store: &dyn DataStore, format: OutputFormat) -> Result<()> {
    let comparison = compute_comparison(store)?;

    if format == OutputFormat::Json {
        return print_json(&comparison);
    }

    if comparison.user_count == 0 {
        println!("{}", "No users in the dataset.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Csv => print_compare_csv(&comparison),
        _ => print_compare_table(&comparison),
    }

    Ok(())
}

fn print_compare_table(c: &ComparisonAnalytics) {
    println!("{}", "Carbon Comparison - All Users".bold().cyan());
    println!("{}", "=".repeat(66));
    println!();
    println!("  {} {}", "Users:                ".bold(), c.user_count);
    println!("  {} {} kg", "Avg baseline:         ".bold(), c.avg_baseline);
    println!("  {} {} kg", "Avg current emissions:".bold(), c.avg_current_emissions);
    println!("  {} {} kg", "Total saved:          ".bold(), c.total_saved_across_users);
    println!("  {} {}%", "Avg reduction:        ".bold(), c.avg_reduction_percentage);
    println!();

    println!("{}", "Ranked by CO2 Saved".bold().cyan());
    println!(
        "  {:<14} {:>10} {:>10} {:>8} {:>8} {:>7}",
        "User", "Baseline", "Current", "Saved", "Actions", "Points"
    );
    println!("  {}", "-".repeat(62));

    for (i, user) in c.ranked_by_saved().into_iter().enumerate() {
        let line = format!(
            "  {:<14} {:>10} {:>10} {:>8} {:>8} {:>7}",
            truncate(&user.name, 14),
            user.baseline,
            user.analytics.current_month_emissions,
            user.analytics.total_saved,
            user.analytics.actions_completed,
            user.analytics.total_points,
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_compare_csv(c: &ComparisonAnalytics) {
    println!("user,current_emissions_kg,baseline_kg,total_saved_kg,actions_completed,points");
    for u in &c.users {
        println!(
            "{},{},{},{},{},{}",
            csv_field(&u.name),
            u.analytics.current_month_emissions,
            u.analytics.baseline_monthly,
            u.analytics.total_saved,
            u.analytics.actions_completed,
            u.analytics.total_points,
        );
    }
}

// ---------------------------------------------------------------------------
// carbonlens energy
// ---------------------------------------------------------------------------

/// Show appliance energy analytics for one user.
pub fn run_energy(store: &dyn DataStore, user_id: &str, format: OutputFormat) -> Result<()> {
    let analytics = compute_energy_analytics(store, user_id);

    if format == OutputFormat::Json {
        return print_json(&analytics);
    }

    if analytics.daily_trend.is_empty() {
        println!("{}", format!("No energy logs for {user_id}.").yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Csv => print_energy_csv(&analytics),
        _ => print_energy_table(&analytics),
    }

    Ok(())
}

fn print_energy_table(e: &EnergyAnalytics) {
    println!("{}", format!("Energy Report - {}", e.user_id).bold().cyan());
    println!("{}", "=".repeat(60));
    println!();
    println!(
        "  {} {} kWh   {} kg CO2   ${}",
        "Total:        ".bold(),
        e.total_energy_kwh,
        e.total_co2_kg,
        e.total_cost_usd
    );
    println!(
        "  {} {} kWh   {} kg CO2   ${}",
        "Daily average:".bold(),
        e.daily_average_kwh,
        e.daily_average_co2,
        e.daily_average_cost
    );
    println!();

    println!("{}", "Top Consumers".bold().cyan());
    println!(
        "  {:<18} {:>9} {:>9} {:>8} {:>6} Rating",
        "Appliance", "kWh", "kg CO2", "Cost", "Share"
    );
    println!("  {}", "-".repeat(62));
    for app in &e.top_consumers {
        println!(
            "  {:<18} {:>9.1} {:>9.2} {:>8.2} {:>5.0}% {}",
            truncate(&app.name, 18),
            app.total_energy_kwh,
            app.total_co2_kg,
            app.total_cost_usd,
            app.co2_percentage,
            app.efficiency_rating,
        );
    }
    println!();

    println!("{}", "Energy by Type".bold().cyan());
    for t in &e.energy_by_type {
        println!(
            "  {:<16} {:>8} kWh {:>8} kg {:>4}%",
            t.type_label, t.kwh, t.co2, t.percentage
        );
    }
    println!();

    println!("{}", "Daily Trend".bold().cyan());
    for day in &e.daily_trend {
        println!(
            "  {:<12} {:>8} kWh {:>8} kg  ${}",
            day.date, day.kwh, day.co2, day.cost
        );
    }

    if !e.optimization_suggestions.is_empty() {
        println!();
        println!("{}", "Recommendations".bold().cyan());
        for s in &e.optimization_suggestions {
            println!("  • {}", s.action);
            println!(
                "    {}",
                format!(
                    "Potential savings: {} kg CO2 (${})",
                    s.potential_savings_kg, s.potential_savings_usd
                )
                .dimmed()
            );
        }
    }
}

fn print_energy_csv(e: &EnergyAnalytics) {
    println!("appliance,type,energy_kwh,co2_kg,cost_usd,efficiency");
    for app in &e.top_consumers {
        println!(
            "{},{},{},{},{},{}",
            csv_field(&app.name),
            app.appliance_type,
            app.total_energy_kwh,
            app.total_co2_kg,
            app.total_cost_usd,
            app.efficiency_rating,
        );
    }
}

// ---------------------------------------------------------------------------
// carbonlens appliances
// ---------------------------------------------------------------------------

/// List a user's appliances with tips, or one appliance's usage history.
pub fn run_appliances(
    store: &dyn DataStore,
    user_id: &str,
    appliance_id: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    if let Some(appliance_id) = appliance_id {
        if store.find_appliance(user_id, appliance_id).is_none() {
            anyhow::bail!("appliance {appliance_id} not found for user {user_id}");
        }
        let usage = appliances::appliance_usage(store, user_id, appliance_id);
        return match format {
            OutputFormat::Json => print_json(&usage),
            OutputFormat::Csv => {
                print_usage_csv(&usage);
                Ok(())
            }
            OutputFormat::Table => {
                print_usage_table(appliance_id, &usage);
                Ok(())
            }
        };
    }

    let inventory = appliances::appliance_inventory(store, user_id);
    if format == OutputFormat::Json {
        return print_json(&inventory);
    }

    if inventory.is_empty() {
        println!("{}", format!("No appliances for {user_id}.").yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Csv => print_inventory_csv(&inventory),
        _ => print_inventory_table(&inventory),
    }

    Ok(())
}

fn print_inventory_table(inventory: &[ApplianceInsight]) {
    println!("{}", "Home Appliances".bold().cyan());
    println!("{}", "=".repeat(60));
    for item in inventory {
        let a = &item.appliance;
        println!();
        println!(
            "  {} {}",
            a.name.bold(),
            format!("({}, {} years, {})", a.appliance_type, a.age_years, a.efficiency_rating)
                .dimmed()
        );
        println!(
            "    {}W · {}h/day · {} kg CO2/month est. · logged {:.1} kWh",
            a.power_watts, a.usage_hours_daily, a.estimated_monthly_kg_co2, item.totals.kwh
        );
        for tip in &item.tips {
            println!("    {} {}", "→".green(), tip);
        }
    }
}

fn print_inventory_csv(inventory: &[ApplianceInsight]) {
    println!("appliance_id,name,type,power_watts,usage_hours_daily,age_years,efficiency,logged_kwh,logged_co2_kg,logged_cost_usd");
    for item in inventory {
        let a = &item.appliance;
        println!(
            "{},{},{},{},{},{},{},{:.2},{:.2},{:.2}",
            csv_field(&a.appliance_id),
            csv_field(&a.name),
            a.appliance_type,
            a.power_watts,
            a.usage_hours_daily,
            a.age_years,
            a.efficiency_rating,
            item.totals.kwh,
            item.totals.co2,
            item.totals.cost,
        );
    }
}

fn print_usage_table(appliance_id: &str, usage: &[UsagePoint]) {
    println!("{}", format!("Usage History - {appliance_id}").bold().cyan());
    println!("  {:<12} {:>8} {:>8} {:>8}", "Date", "kWh", "kg CO2", "Cost");
    println!("  {}", "-".repeat(40));
    for p in usage {
        println!(
            "  {:<12} {:>8.2} {:>8.2} {:>8.2}",
            p.date, p.kwh, p.co2, p.cost
        );
    }
}

fn print_usage_csv(usage: &[UsagePoint]) {
    println!("date,kwh,co2_kg,cost_usd");
    for p in usage {
        println!("{},{},{},{}", p.date, p.kwh, p.co2, p.cost);
    }
}

// ---------------------------------------------------------------------------
// carbonlens badges
// ---------------------------------------------------------------------------

/// Show achievement badges for one user.
pub fn run_badges(store: &dyn DataStore, user_id: &str, format: OutputFormat) -> Result<()> {
    let analytics = compute_user_analytics(store, user_id)?;
    let badges = rewards::badges(&analytics);

    match format {
        OutputFormat::Json => print_json(&badges)?,
        OutputFormat::Csv => print_badges_csv(&badges),
        OutputFormat::Table => print_badges_table(&badges),
    }

    Ok(())
}

fn print_badges_table(badges: &[Badge]) {
    println!("{}", "Achievements".bold().cyan());
    println!("{}", "=".repeat(50));
    for badge in badges {
        let mark = if badge.earned {
            "✓".green().bold()
        } else {
            "·".dimmed()
        };
        println!(
            "  {} {:<10} {:<22} {}",
            mark,
            badge.name,
            badge.description,
            progress_bar(badge.progress, 10)
        );
    }
}

fn print_badges_csv(badges: &[Badge]) {
    println!("badge,description,earned,progress");
    for b in badges {
        println!(
            "{},{},{},{:.2}",
            csv_field(&b.name),
            csv_field(&b.description),
            b.earned,
            b.progress
        );
    }
}

// ---------------------------------------------------------------------------
// carbonlens actions
// ---------------------------------------------------------------------------

/// Browse the micro-action catalog, optionally filtered by category.
pub fn run_actions(
    store: &dyn DataStore,
    category: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let category = category
        .map(|raw| {
            EventCategory::parse(raw).with_context(|| format!("unknown action category '{raw}'"))
        })
        .transpose()?;
    let catalog = actions::action_catalog(store, category);

    if format == OutputFormat::Json {
        return print_json(&catalog);
    }

    if catalog.is_empty() {
        println!("{}", "No actions match.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Csv => print_actions_csv(&catalog),
        _ => print_actions_table(&catalog),
    }

    Ok(())
}

fn print_actions_table(catalog: &[ActionCatalogEntry]) {
    println!("{}", "Actions Library".bold().cyan());
    println!("  {:<6} {:<40} {:<10} {:>12}", "ID", "Action", "Category", "kg CO2/day");
    println!("  {}", "-".repeat(71));
    for a in catalog {
        println!(
            "  {:<6} {:<40} {:<10} {:>12}",
            a.action_id,
            truncate(&a.title, 40),
            a.category.label(),
            a.est_saved_kg
        );
    }
}

fn print_actions_csv(catalog: &[ActionCatalogEntry]) {
    println!("action_id,title,category,est_saved_kg");
    for a in catalog {
        println!(
            "{},{},{},{}",
            csv_field(&a.action_id),
            csv_field(&a.title),
            a.category,
            a.est_saved_kg
        );
    }
}

// ---------------------------------------------------------------------------
// carbonlens health
// ---------------------------------------------------------------------------

/// Check config files, dataset and event log.
pub fn run_health(cfg: &CarbonConfig) -> Result<()> {
    println!("{}", "carbonlens Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.carbonlens/config.toml found"
        } else {
            "not found (run `carbonlens config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".carbonlens.toml found"
        } else {
            "none (optional)"
        },
    );

    match config::open_dataset(cfg) {
        Ok(dataset) => {
            let source = if cfg.data.path.is_empty() {
                "built-in demo".to_string()
            } else {
                cfg.data.path.clone()
            };
            print_health_item(
                "Dataset",
                true,
                &format!(
                    "{source}: {} users, {} daily logs, {} energy logs",
                    dataset.users().len(),
                    dataset.daily_logs().len(),
                    dataset.energy_logs().len()
                ),
            );
            let default_ok = dataset.find_user(&cfg.general.default_user).is_some();
            print_health_item(
                "Default user",
                default_ok,
                &cfg.general.default_user,
            );
        }
        Err(e) => print_health_item("Dataset", false, &format!("{e:#}")),
    }

    let log_path = config::expand_path(&cfg.logging.path);
    let log_exists = log_path.as_ref().is_some_and(|p| p.exists());
    print_health_item(
        "Event log",
        cfg.logging.enabled,
        &match (cfg.logging.enabled, log_exists) {
            (false, _) => "disabled".to_string(),
            (true, true) => cfg.logging.path.clone(),
            (true, false) => "no log file yet".to_string(),
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<16} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// carbonlens config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective carbonlens Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    for (label, path) in [
        ("~/.carbonlens/config.toml", config::global_config_file()),
        (".carbonlens.toml", config::project_config_file()),
    ] {
        if path.is_some_and(|p| p.exists()) {
            println!("  {} {}", "✓".green(), label.dimmed());
        } else {
            println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
        }
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "CARBONLENS_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.carbonlens/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Quote a CSV field when it holds a delimiter, quote or line break.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

/// Render a `[0, 1]` fraction as a fixed-width bar.
fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        fraction * 100.0
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::demo;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[----]   0%");
        assert_eq!(progress_bar(0.5, 4), "[##--]  50%");
        assert_eq!(progress_bar(1.0, 4), "[####] 100%");
    }

    #[test]
    fn test_csv_field() {
        assert_eq!(csv_field("Split AC"), "Split AC");
        assert_eq!(csv_field("AC, bedroom"), "\"AC, bedroom\"");
        assert_eq!(csv_field("12\" TV"), "\"12\"\" TV\"");
    }

    #[test]
    fn run_actions_rejects_unknown_category() {
        let ds = demo::dataset();
        let err = run_actions(&ds, Some("travel"), OutputFormat::Csv).unwrap_err();
        assert!(err.to_string().contains("unknown action category"));
        assert!(run_actions(&ds, Some("Diet"), OutputFormat::Csv).is_ok());
    }

    #[test]
    fn run_compare_handles_empty_store_in_every_format() {
        let empty = crate::data::Dataset::default();
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv] {
            assert!(run_compare(&empty, format).is_ok());
            assert!(run_appliances(&empty, "demo_alexa", None, format).is_ok());
        }
    }

    #[test]
    fn run_user_surfaces_unknown_user() {
        let ds = demo::dataset();
        let err = run_user(&ds, "nobody", OutputFormat::Csv).unwrap_err();
        assert!(err.to_string().contains("user not found"));
    }

    #[test]
    fn run_appliances_rejects_foreign_appliance() {
        let ds = demo::dataset();
        assert!(run_appliances(&ds, "demo_ben", Some("APP001"), OutputFormat::Csv).is_err());
    }

    #[test]
    fn handlers_succeed_on_demo_data() {
        let ds = demo::dataset();
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv] {
            assert!(run_user(&ds, "demo_alexa", format).is_ok());
            assert!(run_compare(&ds, format).is_ok());
            assert!(run_energy(&ds, "demo_alexa", format).is_ok());
            assert!(run_energy(&ds, "demo_chen", format).is_ok());
            assert!(run_appliances(&ds, "demo_alexa", None, format).is_ok());
            assert!(run_appliances(&ds, "demo_alexa", Some("APP001"), format).is_ok());
            assert!(run_badges(&ds, "demo_alexa", format).is_ok());
            assert!(run_actions(&ds, None, format).is_ok());
        }
    }
}
