//! CLI command implementations for spotpanel.
//!
//! Provides subcommand handlers for:
//! - `spotpanel show <id>` — fetch and print the rendered details panel
//! - `spotpanel clear` — print the placeholder panel
//! - `spotpanel delete <id>` — confirm on the terminal, then delete
//! - `spotpanel log` — recent panel events
//! - `spotpanel health` — backend reachability, config, event log
//! - `spotpanel config show|init` — configuration management

use std::io::{self, BufRead, Write};

use anyhow::Result;
use colored::Colorize;

use crate::analytics::{EventLog, PanelEvent};
use crate::api::{HttpSpotApi, SpotId};
use crate::config;
use crate::panel::{DeleteOutcome, PageHost, ShowOutcome, SpotDetailPanel};

/// Output format for the event log listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal page host
// ---------------------------------------------------------------------------

/// [`PageHost`] for an interactive terminal.
///
/// Confirmation reads a `y`/`yes` answer from stdin unless `assume_yes` is
/// set; notifications go to stderr.
pub struct TerminalHost {
    assume_yes: bool,
}

impl TerminalHost {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl PageHost for TerminalHost {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        print!("{} [y/N] ", message.bold());
        let _ = io::stdout().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }

    fn notify(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    fn reload(&self) {
        println!("{}", "Spot deleted. Refresh the spot list to see the change.".green());
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ---------------------------------------------------------------------------
// spotpanel show / clear / delete
// ---------------------------------------------------------------------------

/// Fetch a spot's details and print the panel markup.
pub fn run_show(spot_id: &str) -> Result<()> {
    let spot_id = SpotId::parse(spot_id)?;
    let panel = SpotDetailPanel::from_config(&config::load());

    let outcome = panel.show_details(&spot_id);
    println!("{}", panel.markup());

    if let ShowOutcome::Failed(err) = outcome {
        eprintln!("{} {}", "error:".red().bold(), err);
    }
    Ok(())
}

/// Print the placeholder panel.
pub fn run_clear() -> Result<()> {
    let panel = SpotDetailPanel::from_config(&config::load());
    panel.clear_details();
    println!("{}", panel.markup());
    Ok(())
}

/// Delete a spot after confirmation.
pub fn run_delete(spot_id: &str, assume_yes: bool) -> Result<()> {
    let spot_id = SpotId::parse(spot_id)?;
    let panel = SpotDetailPanel::from_config(&config::load());

    match panel.delete_spot(&spot_id, &TerminalHost::new(assume_yes)) {
        DeleteOutcome::Declined => println!("{}", "Cancelled.".yellow()),
        DeleteOutcome::Deleted | DeleteOutcome::Failed(_) => {}
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// spotpanel log
// ---------------------------------------------------------------------------

/// Show the most recent panel events.
pub fn run_log(limit: usize, format: OutputFormat) -> Result<()> {
    let log = EventLog::from_config(&config::load().logging);
    let events = log.read_recent(limit);

    if events.is_empty() {
        println!("{}", "No panel events logged yet.".yellow());
        return Ok(());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
        OutputFormat::Table => print_events_table(&events),
    }
    Ok(())
}

fn print_events_table(events: &[PanelEvent]) {
    println!("{}", "Recent Panel Events".bold().cyan());
    println!("{}", "=".repeat(72));
    println!(
        "  {:<20} {:<14} {:>6} {:<11} {:>8} Message",
        "Time", "Operation", "Spot", "Outcome", "ms"
    );
    println!("  {}", "-".repeat(70));

    for event in events {
        let time = chrono::DateTime::parse_from_rfc3339(&event.timestamp)
            .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|_| event.timestamp.clone());
        let line = format!(
            "  {:<20} {:<14} {:>6} {:<11} {:>8} {}",
            time,
            event.operation,
            event.spot_id.as_deref().unwrap_or("-"),
            event.outcome,
            event.latency_ms.map(|ms| ms.to_string()).unwrap_or_default(),
            event.message.as_deref().unwrap_or(""),
        );

        if event.outcome == "failed" {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
}

// ---------------------------------------------------------------------------
// spotpanel health
// ---------------------------------------------------------------------------

/// Check backend reachability, config files, and the event log.
pub fn run_health() -> Result<()> {
    println!("{}", "spotpanel Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let cfg = config::load();
    let client = HttpSpotApi::from_config(&cfg.api);

    let reachable = client.is_reachable();
    print_check("Backend", reachable, client.base_url());

    match config::global_config_file() {
        Some(path) => print_check("Config file", path.exists(), &path.display().to_string()),
        None => print_check("Config file", false, "home directory unknown"),
    }

    let log = EventLog::from_config(&cfg.logging);
    match log.path() {
        Some(path) => print_check("Event log", path.exists(), &path.display().to_string()),
        None => println!("  {} {}", "Event log:".bold(), "disabled".dimmed()),
    }

    Ok(())
}

fn print_check(label: &str, ok: bool, detail: &str) {
    let mark = if ok { "ok".green() } else { "missing".yellow() };
    println!("  {:<14} {} {}", format!("{label}:").bold(), mark, detail.dimmed());
}

// ---------------------------------------------------------------------------
// spotpanel config
// ---------------------------------------------------------------------------

/// Print the effective configuration.
pub fn run_config_show() -> Result<()> {
    println!("{}", config::show_effective_config()?);
    Ok(())
}

/// Write the default config file.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}
