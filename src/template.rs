// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone template parsing and application
//!
//! cPanel keeps baseline zone skeletons as line-oriented template files
//! where each record line has the form:
//!
//! ```text
//! name ttl class type content...
//! ```
//!
//! Blank lines, `;` comments, and `$` directives are skipped, as is any
//! line with fewer than five fields. Applying a template substitutes
//! the apex marker `@` with the real zone name and upserts every record
//! upstream; unlike the reconciler, application is strict - one failed
//! record fails the whole operation.

use std::path::Path;

use async_trait::async_trait;
use nom::{
    bytes::complete::take_while1,
    character::complete::space1,
    combinator::rest,
    IResult,
};
use tracing::{error, info, warn};

use crate::records::{self, DnsRecord};

/// Default location of cPanel DNS template files
pub const TEMPLATE_DIR: &str = "/var/cpanel/dns_templates";

/// Destination for template records
///
/// Implemented by the PowerDNS client; tests substitute a fake that
/// records or rejects writes.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    /// Upsert one record into `zone_name`, reporting success
    async fn write_record(&self, zone_name: &str, record: &DnsRecord) -> bool;
}

// ========== Line parser ==========

/// One whitespace-delimited field
fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// Parse a single `name ttl class type content...` line
///
/// The class field is accepted and ignored. A non-numeric ttl field
/// falls back to the 3600 default rather than failing the line.
pub(crate) fn template_line(input: &str) -> IResult<&str, DnsRecord> {
    let (input, name) = token(input)?;
    let (input, _) = space1(input)?;
    let (input, ttl_field) = token(input)?;
    let (input, _) = space1(input)?;
    let (input, _class) = token(input)?;
    let (input, _) = space1(input)?;
    let (input, rtype) = token(input)?;
    let (input, _) = space1(input)?;
    let (input, content) = rest(input)?;

    let content = content.trim();
    if content.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::NonEmpty,
        )));
    }

    Ok((
        "",
        DnsRecord {
            name: name.to_string(),
            rtype: rtype.to_string(),
            ttl: ttl_field.parse().unwrap_or(3600),
            content: content.to_string(),
            priority: None,
            disabled: false,
        },
    ))
}

/// Parse a whole template file body into records
pub fn parse_template(input: &str) -> Vec<DnsRecord> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(';') && !line.starts_with('$'))
        .filter_map(|line| template_line(line).ok().map(|(_, record)| record))
        .collect()
}

/// Baseline records used when no template file is available
pub fn default_records() -> Vec<DnsRecord> {
    let record = |name: &str, rtype: &str, content: &str| DnsRecord {
        name: name.to_string(),
        rtype: rtype.to_string(),
        ttl: 3600,
        content: content.to_string(),
        priority: None,
        disabled: false,
    };

    vec![
        record("@", "NS", "ns1.example.com."),
        record("@", "NS", "ns2.example.com."),
        record("@", "A", "0.0.0.0"),
        record("www", "A", "0.0.0.0"),
    ]
}

/// Load `<dir>/<name>.db`, falling back to the built-in defaults
pub fn load_template(dir: &Path, name: &str) -> Vec<DnsRecord> {
    let path = dir.join(format!("{}.db", name));

    if !path.exists() {
        warn!("DNS template {} not found, using default", name);
        return default_records();
    }

    match std::fs::read_to_string(&path) {
        Ok(body) => parse_template(&body),
        Err(e) => {
            error!("Error reading DNS template {}: {}", name, e);
            default_records()
        }
    }
}

/// Apply template records to a zone
///
/// `@` names become the zone name and embedded MX/SRV priorities are
/// split out before each upsert. Returns `true` only if every record
/// applied.
pub async fn apply_template(
    writer: &dyn RecordWriter,
    zone_name: &str,
    template_records: &[DnsRecord],
) -> bool {
    let mut applied = 0;

    for record in template_records {
        let name = if record.name == "@" {
            records::strip_fqdn(zone_name).to_string()
        } else {
            record.name.clone()
        };

        let (priority, content) = records::split_priority(&record.rtype, &record.content);
        let resolved = DnsRecord {
            name,
            rtype: record.rtype.clone(),
            ttl: record.ttl,
            content,
            priority,
            disabled: false,
        };

        if writer.write_record(zone_name, &resolved).await {
            applied += 1;
        } else {
            warn!(
                "Failed to apply record {} {} to zone {}",
                resolved.name, resolved.rtype, zone_name
            );
        }
    }

    info!(
        "Applied {}/{} template records to zone {}",
        applied,
        template_records.len(),
        zone_name
    );
    applied == template_records.len()
}
