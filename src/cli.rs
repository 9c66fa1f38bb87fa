use crate::config::DashboardConfig;
use crate::dashboard::{Dashboard, DEFAULT_LICENSE_TYPE};
use crate::data::history::load_history;
use crate::data::loader::{load_registry, REGISTRY_SOURCE_COLUMNS};
use crate::data::normalize::{validate_mapping, COLUMN_LABELS, LICENSE_STATUS};
use crate::server;

const USAGE: &str = "usage: dispensary-dashboard <serve|lookup|counts|equity|history|validate>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Lookup,
    Counts,
    Equity,
    History,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("lookup") => Some(Command::Lookup),
        Some("counts") => Some(Command::Counts),
        Some("equity") => Some(Command::Equity),
        Some("history") => Some(Command::History),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let Some(command) = parse_command(args) else {
        eprintln!("{USAGE}");
        return 2;
    };

    let config = match DashboardConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return 1;
        }
    };

    match command {
        Command::Serve => handle_serve(&config),
        Command::Lookup => handle_lookup(&config, args),
        Command::Counts => handle_counts(&config, args),
        Command::Equity => handle_equity(&config),
        Command::History => handle_history(&config),
        Command::Validate => handle_validate(&config),
    }
}

fn handle_serve(config: &DashboardConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn load_dashboard(config: &DashboardConfig) -> Option<Dashboard> {
    match Dashboard::load(config) {
        Ok(dashboard) => Some(dashboard),
        Err(err) => {
            eprintln!("failed to load registry: {err}");
            None
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize result: {err}");
            1
        }
    }
}

/// `lookup [license_type] <zip>`; a single argument is the zip and the type defaults to Retail.
fn handle_lookup(config: &DashboardConfig, args: &[String]) -> i32 {
    let (license_type, zip_code) = match (args.get(2), args.get(3)) {
        (Some(license_type), Some(zip)) => (license_type.as_str(), zip.as_str()),
        (Some(zip), None) => (DEFAULT_LICENSE_TYPE, zip.as_str()),
        _ => {
            eprintln!("usage: dispensary-dashboard lookup [license_type] <zip>");
            return 2;
        }
    };

    let Some(dashboard) = load_dashboard(config) else {
        return 1;
    };
    match dashboard.lookup(license_type, zip_code) {
        Ok(view) => print_json(&view),
        Err(err) => {
            eprintln!("lookup failed: {err}");
            1
        }
    }
}

fn handle_counts(config: &DashboardConfig, args: &[String]) -> i32 {
    let column = args.get(2).map_or(LICENSE_STATUS, String::as_str);
    let Some(dashboard) = load_dashboard(config) else {
        return 1;
    };
    match crate::query::value_counts(dashboard.registry(), column) {
        Ok(counts) => print_json(&counts),
        Err(err) => {
            eprintln!("counts failed: {err}");
            1
        }
    }
}

fn handle_equity(config: &DashboardConfig) -> i32 {
    let Some(dashboard) = load_dashboard(config) else {
        return 1;
    };
    match dashboard.equity_view() {
        Ok(view) => print_json(&view),
        Err(err) => {
            eprintln!("equity failed: {err}");
            1
        }
    }
}

fn handle_history(config: &DashboardConfig) -> i32 {
    match load_history(&config.history_path) {
        Ok(history) => print_json(&history),
        Err(err) => {
            eprintln!("failed to read history: {err}");
            1
        }
    }
}

/// Check the column mapping against the expected source schema, then against the real file.
fn handle_validate(config: &DashboardConfig) -> i32 {
    let mut issues = Vec::new();
    if let Err(err) = validate_mapping(&COLUMN_LABELS, &REGISTRY_SOURCE_COLUMNS) {
        issues.push(err.to_string());
    }

    match load_registry(&config.registry_path) {
        Ok(table) => {
            let schema: Vec<&str> = table.columns().iter().map(String::as_str).collect();
            if let Err(err) = validate_mapping(&COLUMN_LABELS, &schema) {
                issues.push(err.to_string());
            }
        }
        Err(err) => issues.push(err.to_string()),
    }

    if issues.is_empty() {
        println!("validation passed: {}", config.registry_path.display());
        0
    } else {
        eprintln!("validation failed: {} issue(s)", issues.len());
        for issue in issues {
            eprintln!("- {issue}");
        }
        1
    }
}
