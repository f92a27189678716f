// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Typed representations of PowerDNS v4 API payloads
//!
//! Read-side structs mirror what the API returns; write-side structs
//! carry the RFC 2136-shaped change operations sent in PATCH bodies.
//! Field sets are trimmed to what the bridge consumes - serde ignores
//! the rest.

use serde::{Deserialize, Serialize};

use crate::records::default_ttl;

/// One entry of a zone listing (`GET /zones`)
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneSummary {
    /// Zone FQDN with trailing dot (e.g., "example.com.")
    pub name: String,

    /// Zone kind ("Native", "Master", "Slave")
    #[serde(default)]
    pub kind: Option<String>,

    /// SOA serial as PowerDNS last saw it
    #[serde(default)]
    pub serial: Option<u64>,
}

/// Zone detail (`GET /zones/{name}`)
#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    /// Zone FQDN with trailing dot
    pub name: String,

    /// Zone kind ("Native", "Master", "Slave")
    #[serde(default)]
    pub kind: Option<String>,

    /// All rrsets of the zone
    #[serde(default)]
    pub rrsets: Vec<Rrset>,
}

/// A group of records sharing (name, type, ttl)
#[derive(Debug, Clone, Deserialize)]
pub struct Rrset {
    /// Owner FQDN with trailing dot (e.g., "www.example.com.")
    pub name: String,

    /// Record type ("A", "NS", ...)
    #[serde(rename = "type")]
    pub rtype: String,

    /// TTL in seconds (default: 3600)
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// The records of the set
    #[serde(default)]
    pub records: Vec<RecordEntry>,
}

/// A single record inside an rrset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordEntry {
    /// Wire-form content ("192.0.2.1", "10 mail.example.com.", ...)
    pub content: String,

    #[serde(default)]
    pub disabled: bool,
}

/// Change operation applied to an rrset in a PATCH body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// Upsert: the rrset's records become exactly the ones supplied
    Replace,
    /// Drop the whole rrset; no records array accompanies it
    Delete,
}

/// One rrset change inside a `PATCH /zones/{name}` body
#[derive(Debug, Clone, Serialize)]
pub struct RrsetChange {
    /// Owner FQDN with trailing dot
    pub name: String,

    /// Record type
    #[serde(rename = "type")]
    pub rtype: String,

    /// TTL, omitted on DELETE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,

    pub changetype: ChangeType,

    /// Records to install; omitted on DELETE
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<RecordEntry>>,
}

/// Body of a `PATCH /zones/{name}` request
#[derive(Debug, Clone, Serialize)]
pub struct RrsetPatch {
    pub rrsets: Vec<RrsetChange>,
}

/// Body of a `POST /zones` request
#[derive(Debug, Clone, Serialize)]
pub struct ZoneCreate {
    /// Zone FQDN with trailing dot
    pub name: String,

    /// Zone kind (default: "Native")
    pub kind: String,

    /// Authoritative nameservers, each a dot-terminated FQDN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nameservers: Option<Vec<String>>,
}
