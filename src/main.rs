// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! pdnsbridge command-line entry points
//!
//! One binary, one subcommand per plugin entry point:
//!
//! - `test-connection` / `sync-zones` - operator commands with
//!   human-readable status lines
//! - `list-zones` / `fetch-zone` - hook scripts whose stdout is parsed
//!   by cPanel's DNS-admin integration (logs go to stderr, never
//!   stdout)
//! - `fix-config` - repair utility for legacy configuration files
//!
//! Every entry point except `fix-config` refuses to run while the
//! plugin is disabled or incompletely configured.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use pdnsbridge::config::{self, ConfigSource, PluginConfig};
use pdnsbridge::pdns::PdnsClient;
use pdnsbridge::records;
use pdnsbridge::sync::{self, ZoneOutcome, ZoneSource};
use pdnsbridge::whmapi::WhmApi;

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    /// Path to the plugin configuration file
    #[arg(long, value_name = "PATH", default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Probe the configured PowerDNS API
    TestConnection,
    /// Copy every PowerDNS zone into cPanel's local DNS
    SyncZones,
    /// Print one zone name per line (DNS-admin hook)
    ListZones,
    /// Print a zone's records, tab-separated (DNS-admin hook)
    FetchZone {
        /// Zone to fetch, dot optional
        zone: String,
    },
    /// Repair a legacy configuration file
    FixConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Cmd::TestConnection => test_connection(&cli.config).await,
        Cmd::SyncZones => sync_zones(&cli.config).await,
        Cmd::ListZones => list_zones(&cli.config).await,
        Cmd::FetchZone { zone } => fetch_zone(&cli.config, &zone).await,
        Cmd::FixConfig => fix_config(&cli.config),
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration, returning it only when the plugin may run
fn load_enabled(path: &Path) -> Option<PluginConfig> {
    let (config, source) = PluginConfig::load(path);
    if source == ConfigSource::ParseError {
        warn!("Configuration fell back to defaults due to a parse error");
    }

    config.is_enabled().then_some(config)
}

async fn test_connection(config_path: &Path) -> ExitCode {
    let Some(config) = load_enabled(config_path) else {
        error!("Plugin is not enabled");
        println!("ERROR: Plugin is not enabled or configuration is incomplete");
        return ExitCode::FAILURE;
    };

    println!("Testing connection to PowerDNS API: {}", config.api_url);
    info!("Testing PowerDNS API connection");

    let client = match PdnsClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Could not build API client: {}", e);
            println!("ERROR: Failed to connect to PowerDNS API. Please check your settings.");
            return ExitCode::FAILURE;
        }
    };

    if client.test_connection().await {
        println!("SUCCESS: Connection to PowerDNS API successful");
        info!("PowerDNS API connection test successful");
        ExitCode::SUCCESS
    } else {
        println!("ERROR: Failed to connect to PowerDNS API. Please check your settings.");
        error!("PowerDNS API connection test failed");
        ExitCode::FAILURE
    }
}

async fn sync_zones(config_path: &Path) -> ExitCode {
    let Some(config) = load_enabled(config_path) else {
        error!("Plugin is not enabled");
        println!("ERROR: Plugin is not enabled. Please enable it in WHM plugin settings.");
        return ExitCode::FAILURE;
    };

    info!("Starting zone sync from PowerDNS to cPanel");

    let client = match PdnsClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Could not build API client: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let whm = WhmApi::new(None);

    let zone_names = client.zone_names().await;
    if zone_names.is_empty() {
        warn!("No zones found in PowerDNS");
        println!("No zones found in PowerDNS");
        return ExitCode::SUCCESS;
    }

    println!("Found {} zones in PowerDNS", zone_names.len());
    info!("Found {} zones in PowerDNS", zone_names.len());

    let report = sync::sync_batch(&client, &whm, &zone_names, |outcome| match outcome {
        ZoneOutcome::Synced(zone) => println!("  ✓ Synced {}", zone),
        ZoneOutcome::Failed(zone) => println!("  ✗ Failed to sync {}", zone),
    })
    .await;

    println!(
        "\nSync complete: {} synced, {} failed",
        report.synced, report.failed
    );

    // Per-zone failures are reported above; the batch itself ran
    ExitCode::SUCCESS
}

async fn list_zones(config_path: &Path) -> ExitCode {
    let Some(config) = load_enabled(config_path) else {
        return ExitCode::FAILURE;
    };

    let Ok(client) = PdnsClient::from_config(&config) else {
        return ExitCode::FAILURE;
    };

    for zone_name in client.zone_names().await {
        let zone_name = records::strip_fqdn(&zone_name);
        if !zone_name.is_empty() {
            println!("{}", zone_name);
        }
    }

    ExitCode::SUCCESS
}

async fn fetch_zone(config_path: &Path, zone: &str) -> ExitCode {
    let Some(config) = load_enabled(config_path) else {
        return ExitCode::FAILURE;
    };

    let Ok(client) = PdnsClient::from_config(&config) else {
        return ExitCode::FAILURE;
    };

    for record in client.get_records(zone).await {
        println!(
            "{}\t{}\tIN\t{}\t{}",
            records::display_name(&record.name, zone),
            record.ttl,
            record.rtype,
            record.rdata()
        );
    }

    ExitCode::SUCCESS
}

fn fix_config(config_path: &Path) -> ExitCode {
    if !config_path.exists() {
        println!("ERROR: Config file not found: {}", config_path.display());
        return ExitCode::FAILURE;
    }

    match config::repair(config_path) {
        Ok(outcome) => {
            if outcome.changed {
                println!("Config file updated!");
            } else {
                println!("Config file is already correct.");
            }

            match serde_json::to_string_pretty(&outcome.config) {
                Ok(body) => println!("\nFinal config:\n{}", body),
                Err(e) => warn!("Could not render final config: {}", e),
            }

            println!("\nPlugin enabled check: {}", outcome.config.is_enabled());
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}
