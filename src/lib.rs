// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! pdnsbridge - PowerDNS to cPanel DNS bridge
//!
//! A cPanel/WHM plugin library that reads zones and records from a
//! PowerDNS authoritative server over its v4 REST API and pushes them
//! into cPanel's local DNS store via the `whmapi1` command-line tool.
//!
//! # Features
//!
//! - PowerDNS v4 API client: zone and record CRUD, connectivity probe
//! - RRSet normalization between PowerDNS's grouped model and cPanel's
//!   flat records, including MX/SRV priority handling
//! - Zone reconciliation with per-zone failure isolation
//! - Zone template parsing and application
//! - User capability queries backed by whmapi1
//! - JSON configuration file with repair support for legacy formats
//!
//! # Usage
//!
//! ## Syncing zones
//!
//! ```rust,no_run
//! use pdnsbridge::{sync, PdnsClient, WhmApi};
//! use pdnsbridge::sync::ZoneSource;
//!
//! #[tokio::main]
//! async fn main() -> pdnsbridge::Result<()> {
//!     let client = PdnsClient::new("https://127.0.0.1:8081", "secret")?;
//!     let whm = WhmApi::new(None);
//!
//!     let zones = client.zone_names().await;
//!     let report = sync::sync_batch(&client, &whm, &zones, |_| {}).await;
//!     println!("{} synced, {} failed", report.synced, report.failed);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Working with records
//!
//! ```rust
//! use pdnsbridge::records::{to_rrset, DnsRecord};
//!
//! let record = DnsRecord {
//!     name: "www".to_string(),
//!     rtype: "A".to_string(),
//!     ttl: 3600,
//!     content: "192.0.2.1".to_string(),
//!     priority: None,
//!     disabled: false,
//! };
//!
//! let rrset = to_rrset(&record, "example.com.");
//! assert_eq!(rrset.name, "www.example.com.");
//! ```

// Re-export public modules
pub mod config;
pub mod pdns;
pub mod pdns_types;
pub mod permissions;
pub mod records;
pub mod sync;
pub mod template;
pub mod types;
pub mod whmapi;

// Re-export commonly used types

// PowerDNS client
pub use pdns::PdnsClient;

// whmapi1 executor
pub use whmapi::WhmApi;

// Error types
pub use types::{Error, Result};

// Configuration
pub use config::{ConfigSource, PluginConfig};

// Flat record model
pub use records::DnsRecord;

#[cfg(test)]
mod pdns_test;
#[cfg(test)]
mod records_test;
#[cfg(test)]
mod whmapi_test;
