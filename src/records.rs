// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Flat record model and rrset normalization
//!
//! PowerDNS groups records into rrsets keyed by (name, type, ttl);
//! cPanel and the hook scripts work with flat records. This module owns
//! the conversion between the two shapes and the naming rules that go
//! with it:
//!
//! - names cross the PowerDNS boundary as dot-terminated FQDNs under
//!   the owning zone
//! - MX/SRV priorities live in a separate field on the flat side and
//!   are spliced into content as `"<priority> <rest>"` on the wire
//! - apex records display as `@` with trailing dots stripped

use serde::{Deserialize, Serialize};

use crate::pdns_types::{ChangeType, RecordEntry, Rrset, RrsetChange};

/// Record types whose content carries a leading priority on the wire
const PRIORITY_TYPES: &[&str] = &["MX", "SRV"];

pub(crate) fn default_ttl() -> u32 {
    3600
}

/// A single DNS record in flat form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Owner name - unqualified ("www"), FQDN, or the zone itself
    pub name: String,

    /// Record type (e.g., "A", "AAAA", "CNAME", "MX", "TXT")
    #[serde(rename = "type")]
    pub rtype: String,

    /// TTL in seconds (default: 3600)
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Type-specific payload, without any leading priority
    pub content: String,

    /// Priority for MX and SRV records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,

    /// Whether the record is disabled in PowerDNS
    #[serde(default)]
    pub disabled: bool,
}

impl DnsRecord {
    /// The wire-form payload: content with the priority re-joined for
    /// types that carry one
    pub fn rdata(&self) -> String {
        match self.priority {
            Some(priority) if has_priority(&self.rtype) => {
                format!("{} {}", priority, self.content)
            }
            _ => self.content.clone(),
        }
    }
}

/// Whether `rtype` encodes a priority in its content
pub fn has_priority(rtype: &str) -> bool {
    PRIORITY_TYPES.contains(&rtype)
}

/// Append the trailing dot PowerDNS requires, if missing
///
/// Idempotent: an already-qualified name is returned unchanged.
pub fn ensure_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_string()
    } else {
        format!("{}.", name)
    }
}

/// Strip trailing dots for the cPanel side of the boundary
pub fn strip_fqdn(name: &str) -> &str {
    name.trim_end_matches('.')
}

/// Qualify a record name under its zone
///
/// The result always ends with the zone FQDN on a label boundary; apex
/// records come back as the zone name itself.
pub fn qualify_name(name: &str, zone_fqdn: &str) -> String {
    let fqdn = ensure_fqdn(name);
    if fqdn == zone_fqdn || fqdn.ends_with(&format!(".{}", zone_fqdn)) {
        fqdn
    } else {
        // fqdn already ends with a dot, so plain concatenation joins
        // the labels cleanly
        format!("{}{}", fqdn, zone_fqdn)
    }
}

/// Display form of a record name: dot stripped, apex rewritten to `@`
pub fn display_name(name: &str, zone_name: &str) -> String {
    let name = strip_fqdn(name);
    if name == strip_fqdn(zone_name) {
        "@".to_string()
    } else {
        name.to_string()
    }
}

/// Build the REPLACE rrset for upserting a record into `zone_fqdn`
///
/// The record name is qualified under the zone and an MX/SRV priority
/// is spliced into the content. REPLACE semantics make the resulting
/// patch an idempotent upsert.
pub fn to_rrset(record: &DnsRecord, zone_fqdn: &str) -> RrsetChange {
    let content = record.rdata();

    RrsetChange {
        name: qualify_name(&record.name, zone_fqdn),
        rtype: record.rtype.clone(),
        ttl: Some(record.ttl),
        changetype: ChangeType::Replace,
        records: Some(vec![RecordEntry {
            content,
            disabled: false,
        }]),
    }
}

/// Build the DELETE rrset for removing `(name, rtype)` from `zone_fqdn`
///
/// A DELETE change must not carry a records array; PowerDNS drops the
/// whole rrset.
pub fn delete_rrset(name: &str, rtype: &str, zone_fqdn: &str) -> RrsetChange {
    RrsetChange {
        name: qualify_name(name, zone_fqdn),
        rtype: rtype.to_string(),
        ttl: None,
        changetype: ChangeType::Delete,
        records: None,
    }
}

/// Flatten one PowerDNS rrset into records
///
/// MX/SRV priorities are split back out of the content. Content without
/// an embedded space, or whose first token is not all digits, is
/// treated as having no priority.
pub fn from_rrset(rrset: &Rrset) -> Vec<DnsRecord> {
    rrset
        .records
        .iter()
        .map(|entry| {
            let (priority, content) = split_priority(&rrset.rtype, &entry.content);
            DnsRecord {
                name: rrset.name.clone(),
                rtype: rrset.rtype.clone(),
                ttl: rrset.ttl,
                content,
                priority,
                disabled: entry.disabled,
            }
        })
        .collect()
}

/// Split a leading priority off wire-form content, for types that have one
pub fn split_priority(rtype: &str, content: &str) -> (Option<u16>, String) {
    if !has_priority(rtype) {
        return (None, content.to_string());
    }

    match content.split_once(' ') {
        Some((head, rest)) => match head.parse::<u16>() {
            Ok(priority) => (Some(priority), rest.to_string()),
            Err(_) => (None, content.to_string()),
        },
        None => (None, content.to_string()),
    }
}
