use anyhow::Result;
use clap::{Parser, Subcommand};

use carbonlens::analytics::events;
use carbonlens::cli;
use carbonlens::config::{self, CarbonConfig, OutputFormat};

#[derive(Debug, Parser)]
#[command(name = "carbonlens")]
#[command(about = "Carbon footprint analytics for household activity and appliance logs")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show emissions analytics for a user
    User {
        /// User id (default: general.default_user)
        #[arg(long)]
        user: Option<String>,
        /// Output format: table, json, csv (default: general.format)
        #[arg(long)]
        format: Option<String>,
    },
    /// Compare emissions analytics across all users
    Compare {
        /// Output format: table, json, csv (default: general.format)
        #[arg(long)]
        format: Option<String>,
    },
    /// Show appliance energy analytics and optimization suggestions
    Energy {
        /// User id (default: general.default_user)
        #[arg(long)]
        user: Option<String>,
        /// Output format: table, json, csv (default: general.format)
        #[arg(long)]
        format: Option<String>,
    },
    /// List appliances with tips, or one appliance's usage history
    Appliances {
        /// User id (default: general.default_user)
        #[arg(long)]
        user: Option<String>,
        /// Show the usage history of this appliance
        #[arg(long)]
        appliance: Option<String>,
        /// Output format: table, json, csv (default: general.format)
        #[arg(long)]
        format: Option<String>,
    },
    /// Show achievement badges for a user
    Badges {
        /// User id (default: general.default_user)
        #[arg(long)]
        user: Option<String>,
        /// Output format: table, json, csv (default: general.format)
        #[arg(long)]
        format: Option<String>,
    },
    /// Browse the micro-action catalog
    Actions {
        /// Only show actions in this category (commute, diet, energy, ...)
        #[arg(long)]
        category: Option<String>,
        /// Output format: table, json, csv (default: general.format)
        #[arg(long)]
        format: Option<String>,
    },
    /// Check config, dataset and event log status
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the default config to ~/.carbonlens/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `general.format json`
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();

    match app.command {
        Commands::User { user, format } => {
            let user = resolve_user(&cfg, user);
            let fmt = resolve_format(&cfg, format.as_deref());
            logged(&cfg, "user", Some(&user), |store| {
                cli::run_user(store, &user, fmt)
            })
        }
        Commands::Compare { format } => {
            let fmt = resolve_format(&cfg, format.as_deref());
            logged(&cfg, "compare", None, |store| cli::run_compare(store, fmt))
        }
        Commands::Energy { user, format } => {
            let user = resolve_user(&cfg, user);
            let fmt = resolve_format(&cfg, format.as_deref());
            logged(&cfg, "energy", Some(&user), |store| {
                cli::run_energy(store, &user, fmt)
            })
        }
        Commands::Appliances {
            user,
            appliance,
            format,
        } => {
            let user = resolve_user(&cfg, user);
            let fmt = resolve_format(&cfg, format.as_deref());
            logged(&cfg, "appliances", Some(&user), |store| {
                cli::run_appliances(store, &user, appliance.as_deref(), fmt)
            })
        }
        Commands::Badges { user, format } => {
            let user = resolve_user(&cfg, user);
            let fmt = resolve_format(&cfg, format.as_deref());
            logged(&cfg, "badges", Some(&user), |store| {
                cli::run_badges(store, &user, fmt)
            })
        }
        Commands::Actions { category, format } => {
            let fmt = resolve_format(&cfg, format.as_deref());
            logged(&cfg, "actions", None, |store| {
                cli::run_actions(store, category.as_deref(), fmt)
            })
        }
        Commands::Health => cli::run_health(&cfg),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}

/// Open the configured dataset, run an analytics command against it and
/// record the outcome in the event log.
fn logged<F>(cfg: &CarbonConfig, command: &str, user: Option<&str>, run: F) -> Result<()>
where
    F: FnOnce(&dyn carbonlens::data::DataStore) -> Result<()>,
{
    let result = config::open_dataset(cfg).and_then(|store| run(&store));
    events::log_outcome(&cfg.logging, command, user, &result);
    result
}

fn resolve_user(cfg: &CarbonConfig, user: Option<String>) -> String {
    user.unwrap_or_else(|| cfg.general.default_user.clone())
}

fn resolve_format(cfg: &CarbonConfig, format: Option<&str>) -> OutputFormat {
    format
        .and_then(OutputFormat::parse)
        .unwrap_or(cfg.general.format)
}
