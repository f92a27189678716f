// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the PowerDNS client

use crate::config::PluginConfig;
use crate::pdns::PdnsClient;

#[test]
fn test_endpoint_building() {
    let client = PdnsClient::new("https://127.0.0.1:8081", "secret").unwrap();

    assert_eq!(
        client.endpoint("/zones"),
        "https://127.0.0.1:8081/api/v1/servers/localhost/zones"
    );
    assert_eq!(
        client.endpoint("/zones/example.com."),
        "https://127.0.0.1:8081/api/v1/servers/localhost/zones/example.com."
    );
}

#[test]
fn test_endpoint_strips_trailing_slash_from_base_url() {
    let client = PdnsClient::new("https://127.0.0.1:8081/", "secret").unwrap();

    assert_eq!(
        client.endpoint("/zones"),
        "https://127.0.0.1:8081/api/v1/servers/localhost/zones"
    );
}

#[test]
fn test_server_probe_endpoint() {
    let client = PdnsClient::new("https://127.0.0.1:8081", "secret").unwrap();

    assert_eq!(
        client.endpoint(""),
        "https://127.0.0.1:8081/api/v1/servers/localhost"
    );
}

#[test]
fn test_client_from_config() {
    let config = PluginConfig {
        api_url: "https://pdns.example.net:8081/".to_string(),
        api_key: "secret".to_string(),
        enabled: true,
    };

    let client = PdnsClient::from_config(&config).unwrap();
    assert_eq!(
        client.endpoint("/zones"),
        "https://pdns.example.net:8081/api/v1/servers/localhost/zones"
    );
}

// Note: operations against the API require a running PowerDNS server
// with its webserver enabled and are exercised by integration tooling,
// not unit tests. The payloads they send are covered in
// records_test.rs and pdns_types_test.rs.
