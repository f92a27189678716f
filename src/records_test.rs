// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for record normalization

use crate::pdns_types::{ChangeType, RecordEntry, Rrset};
use crate::records::*;

fn record(name: &str, rtype: &str, content: &str, priority: Option<u16>) -> DnsRecord {
    DnsRecord {
        name: name.to_string(),
        rtype: rtype.to_string(),
        ttl: 3600,
        content: content.to_string(),
        priority,
        disabled: false,
    }
}

#[test]
fn test_to_rrset_qualifies_name() {
    let rrset = to_rrset(&record("www", "A", "192.168.1.1", None), "example.com.");

    assert_eq!(rrset.name, "www.example.com.");
    assert_eq!(rrset.rtype, "A");
    assert_eq!(rrset.ttl, Some(3600));
    assert_eq!(rrset.changetype, ChangeType::Replace);

    let records = rrset.records.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content, "192.168.1.1");
    assert!(!records[0].disabled);
}

#[test]
fn test_to_rrset_leaves_qualified_name_alone() {
    let rrset = to_rrset(&record("www.example.com.", "A", "192.0.2.1", None), "example.com.");
    assert_eq!(rrset.name, "www.example.com.");
}

#[test]
fn test_to_rrset_apex_uses_zone_name() {
    let rrset = to_rrset(&record("example.com", "A", "192.0.2.1", None), "example.com.");
    assert_eq!(rrset.name, "example.com.");
}

#[test]
fn test_to_rrset_qualification_respects_label_boundary() {
    // "badexample.com." is not inside "example.com." even though the
    // raw string ends with it
    let rrset = to_rrset(&record("badexample.com.", "A", "192.0.2.1", None), "example.com.");
    assert_eq!(rrset.name, "badexample.com.example.com.");
}

#[test]
fn test_to_rrset_splices_mx_priority() {
    let rrset = to_rrset(
        &record("@", "MX", "mail.example.com.", Some(10)),
        "example.com.",
    );

    let records = rrset.records.unwrap();
    assert_eq!(records[0].content, "10 mail.example.com.");
}

#[test]
fn test_to_rrset_never_rewrites_content_for_other_types() {
    let txt = to_rrset(
        &record("@", "TXT", "v=spf1 include:example.com ~all", Some(10)),
        "example.com.",
    );
    assert_eq!(
        txt.records.unwrap()[0].content,
        "v=spf1 include:example.com ~all"
    );

    let a = to_rrset(&record("www", "A", "192.0.2.1", Some(10)), "example.com.");
    assert_eq!(a.records.unwrap()[0].content, "192.0.2.1");
}

#[test]
fn test_delete_rrset_carries_no_records() {
    let rrset = delete_rrset("www", "A", "example.com.");

    assert_eq!(rrset.name, "www.example.com.");
    assert_eq!(rrset.changetype, ChangeType::Delete);
    assert!(rrset.ttl.is_none());
    assert!(rrset.records.is_none());
}

#[test]
fn test_mx_priority_round_trip() {
    let original = record("mail", "MX", "mx1.example.com.", Some(20));
    let change = to_rrset(&original, "example.com.");

    let rrset = Rrset {
        name: change.name.clone(),
        rtype: change.rtype.clone(),
        ttl: change.ttl.unwrap(),
        records: change.records.unwrap(),
    };

    let back = from_rrset(&rrset);
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].priority, Some(20));
    assert_eq!(back[0].content, "mx1.example.com.");
}

#[test]
fn test_from_rrset_defaults_and_flattening() {
    let rrset = Rrset {
        name: "www.example.com.".to_string(),
        rtype: "A".to_string(),
        ttl: 300,
        records: vec![
            RecordEntry {
                content: "192.0.2.1".to_string(),
                disabled: false,
            },
            RecordEntry {
                content: "192.0.2.2".to_string(),
                disabled: true,
            },
        ],
    };

    let flat = from_rrset(&rrset);
    assert_eq!(flat.len(), 2);
    assert_eq!(flat[0].name, "www.example.com.");
    assert_eq!(flat[0].ttl, 300);
    assert_eq!(flat[1].content, "192.0.2.2");
    assert!(flat[1].disabled);
}

#[test]
fn test_from_rrset_mx_without_space_is_not_split() {
    let rrset = Rrset {
        name: "example.com.".to_string(),
        rtype: "MX".to_string(),
        ttl: 3600,
        records: vec![RecordEntry {
            content: "mailhost".to_string(),
            disabled: false,
        }],
    };

    let flat = from_rrset(&rrset);
    assert_eq!(flat[0].priority, None);
    assert_eq!(flat[0].content, "mailhost");
}

#[test]
fn test_from_rrset_mx_with_non_numeric_head_is_not_split() {
    let rrset = Rrset {
        name: "example.com.".to_string(),
        rtype: "MX".to_string(),
        ttl: 3600,
        records: vec![RecordEntry {
            content: "ten mail.example.com.".to_string(),
            disabled: false,
        }],
    };

    let flat = from_rrset(&rrset);
    assert_eq!(flat[0].priority, None);
    assert_eq!(flat[0].content, "ten mail.example.com.");
}

#[test]
fn test_rdata_rejoins_priority() {
    let mx = record("@", "MX", "mail.example.com.", Some(10));
    assert_eq!(mx.rdata(), "10 mail.example.com.");

    let a = record("www", "A", "192.0.2.1", None);
    assert_eq!(a.rdata(), "192.0.2.1");
}

#[test]
fn test_ensure_fqdn_is_idempotent() {
    assert_eq!(ensure_fqdn("example.com"), "example.com.");
    assert_eq!(ensure_fqdn("example.com."), "example.com.");
    assert_eq!(ensure_fqdn(&ensure_fqdn("example.com")), "example.com.");
}

#[test]
fn test_strip_fqdn_is_idempotent() {
    assert_eq!(strip_fqdn("example.com."), "example.com");
    assert_eq!(strip_fqdn("example.com"), "example.com");
    assert_eq!(strip_fqdn(strip_fqdn("example.com.")), "example.com");
}

#[test]
fn test_display_name_rewrites_apex() {
    assert_eq!(display_name("example.com.", "example.com"), "@");
    assert_eq!(display_name("www.example.com.", "example.com"), "www.example.com");
    assert_eq!(display_name("example.com.", "example.com."), "@");
}
