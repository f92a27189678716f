// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone reconciliation into cPanel's local DNS
//!
//! Given the authoritative zone set in PowerDNS, make cPanel's local
//! store match: create missing zones, then push each record through the
//! external zone-management tool. Authority records (NS/SOA) are owned
//! by cPanel and never overwritten.
//!
//! Failure isolation is deliberate and asymmetric:
//! - a zone-level failure (lookup/create) fails that zone only, never
//!   the batch
//! - a record-level failure is logged and skipped; it does not fail the
//!   zone

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::records::{self, DnsRecord};
use crate::types::Result;

/// Record types owned by cPanel's own zone management
const AUTHORITY_TYPES: &[&str] = &["NS", "SOA"];

/// Upstream view of the authoritative zone set
///
/// Implemented by the PowerDNS client; tests substitute an in-memory
/// fake.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Names of every zone to reconcile, in server order
    async fn zone_names(&self) -> Vec<String>;

    /// Flat records of one zone, `None` when the zone cannot be fetched
    async fn zone_records(&self, zone_name: &str) -> Option<Vec<DnsRecord>>;
}

/// Downstream zone store, i.e. cPanel's local DNS
///
/// Implemented over whmapi1; tests substitute an in-memory fake.
#[async_trait]
pub trait LocalDns: Send + Sync {
    /// Whether a zone already exists locally
    async fn has_zone(&self, domain: &str) -> Result<bool>;

    /// Create a zone owned by root
    async fn create_zone(&self, domain: &str) -> Result<()>;

    /// Add one record to an existing zone
    async fn add_record(
        &self,
        domain: &str,
        name: &str,
        rtype: &str,
        address: &str,
        ttl: u32,
        priority: Option<u16>,
    ) -> Result<()>;
}

/// Tally of a full synchronization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
}

/// Outcome stream for per-zone progress reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneOutcome {
    Synced(String),
    Failed(String),
}

/// Reconcile one zone into the local store
///
/// Returns `true` once the zone-level step succeeded, irrespective of
/// individual record failures.
pub async fn sync_zone(local: &dyn LocalDns, zone_name: &str, zone_records: &[DnsRecord]) -> bool {
    let domain = records::strip_fqdn(zone_name);

    let exists = match local.has_zone(domain).await {
        Ok(exists) => exists,
        Err(e) => {
            error!("Error syncing zone {}: {}", domain, e);
            return false;
        }
    };

    if !exists {
        info!("Creating zone {} in cPanel local DNS", domain);
        if let Err(e) = local.create_zone(domain).await {
            error!("Failed to create zone {} in cPanel: {}", domain, e);
            return false;
        }
    }

    for record in zone_records {
        if AUTHORITY_TYPES.contains(&record.rtype.as_str()) {
            continue;
        }

        let name = records::strip_fqdn(&record.name);
        // Only MX carries its priority through to addzonerecord
        let priority = if record.rtype == "MX" {
            Some(record.priority.unwrap_or(0))
        } else {
            None
        };

        match local
            .add_record(
                domain,
                name,
                &record.rtype,
                &record.content,
                record.ttl,
                priority,
            )
            .await
        {
            Ok(()) => debug!("Added record {} {} to cPanel", name, record.rtype),
            Err(e) => warn!("Failed to add record {} {}: {}", name, record.rtype, e),
        }
    }

    true
}

/// Reconcile the given upstream zones, never stopping early
///
/// `zone_names` is what the upstream listing returned; a zone whose
/// records cannot be fetched counts as failed, and an empty list is a
/// successful no-op. `progress` receives one outcome per zone as it
/// completes.
pub async fn sync_batch<F>(
    source: &dyn ZoneSource,
    local: &dyn LocalDns,
    zone_names: &[String],
    mut progress: F,
) -> SyncReport
where
    F: FnMut(&ZoneOutcome),
{
    let mut report = SyncReport::default();

    for zone_name in zone_names.iter().cloned() {
        let outcome = match source.zone_records(&zone_name).await {
            Some(zone_records) => {
                if sync_zone(local, &zone_name, &zone_records).await {
                    report.synced += 1;
                    ZoneOutcome::Synced(zone_name)
                } else {
                    report.failed += 1;
                    ZoneOutcome::Failed(zone_name)
                }
            }
            None => {
                warn!("Could not get details for zone {}", zone_name);
                report.failed += 1;
                ZoneOutcome::Failed(zone_name)
            }
        };
        progress(&outcome);
    }

    info!(
        "Zone sync complete: {} synced, {} failed",
        report.synced, report.failed
    );
    report
}
