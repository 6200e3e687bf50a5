use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use spotpanel::{cli, config, web};

#[derive(Debug, Parser)]
#[command(name = "spotpanel")]
#[command(about = "Admin spot detail panel for the parking backend")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a spot's details and print the rendered panel
    Show {
        /// Spot identifier
        spot_id: String,
    },
    /// Print the empty panel placeholder
    Clear,
    /// Delete a spot (asks for confirmation)
    Delete {
        /// Spot identifier
        spot_id: String,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Serve the panel to a browser
    Serve {
        /// Listen address (default from config: 127.0.0.1:9747)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Show recent panel events
    Log {
        /// Number of events to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check backend reachability, config, and event log
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
    /// Write the default config to ~/.spotpanel/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Show { spot_id } => cli::run_show(&spot_id),
        Commands::Clear => cli::run_clear(),
        Commands::Delete { spot_id, yes } => cli::run_delete(&spot_id, yes),
        Commands::Serve { addr } => {
            let cfg = config::load();
            let addr = addr.unwrap_or_else(|| cfg.web.addr.clone());
            web::serve(&addr, Arc::new(web::Pages::from_config(&cfg)))
        }
        Commands::Log { limit, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_log(limit, fmt)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
        },
    }
}
