// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! PowerDNS v4 API client
//!
//! A thin HTTP client bound to one (api_url, api_key) pair, speaking to
//! `/api/v1/servers/localhost` with the X-API-Key header on every
//! request and a fixed 30-second per-request timeout.
//!
//! Transport failures never escape the public operations: reads come
//! back empty/absent and writes come back `false`, with the underlying
//! error (including the response body when one was parseable) logged
//! here. There is no retry - a timeout or non-2xx is terminal for that
//! operation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, error, info};

use crate::config::PluginConfig;
use crate::pdns_types::{Rrset, RrsetPatch, Zone, ZoneCreate, ZoneSummary};
use crate::records::{self, DnsRecord};
use crate::sync::ZoneSource;
use crate::template::RecordWriter;
use crate::types::{Error, Result};

/// Per-request timeout for every API call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the PowerDNS v4 API
#[derive(Debug, Clone)]
pub struct PdnsClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl PdnsClient {
    /// Create a client bound to one API endpoint
    ///
    /// # Arguments
    /// * `api_url` - base URL of the PowerDNS webserver (a trailing
    ///   slash is tolerated and stripped)
    /// * `api_key` - value for the X-API-Key header
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Transport(format!("build http client: {}", e)))?;

        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Create a client from the persisted plugin configuration
    pub fn from_config(config: &PluginConfig) -> Result<Self> {
        Self::new(&config.api_url, &config.api_key)
    }

    /// Full URL for an endpoint under the default server
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/servers/localhost{}", self.api_url, path)
    }

    /// Issue one API request, enforcing the status check
    async fn send<B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint(path);
        debug!("PowerDNS API {} request: {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header("X-API-Key", &self.api_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            match serde_json::from_str::<serde_json::Value>(&detail) {
                Ok(parsed) => error!("PowerDNS error details: {}", parsed),
                Err(_) if !detail.is_empty() => error!("PowerDNS error response: {}", detail),
                Err(_) => {}
            }
            return Err(Error::Transport(format!("{} returned {}", url, status)));
        }

        Ok(response)
    }

    /// List all zones known to the server
    ///
    /// Returns an empty list on any transport failure.
    pub async fn list_zones(&self) -> Vec<ZoneSummary> {
        let response = match self.send(Method::GET, "/zones", None::<&()>).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to list zones: {}", e);
                return Vec::new();
            }
        };

        match response.json::<Vec<ZoneSummary>>().await {
            Ok(zones) => zones,
            Err(e) => {
                error!("Failed to decode zone list: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch one zone with its rrsets
    ///
    /// The name may be given with or without the trailing dot. Returns
    /// `None` when the zone is absent or the request failed.
    pub async fn get_zone(&self, zone_name: &str) -> Option<Zone> {
        let zone_name = records::ensure_fqdn(zone_name);
        let path = format!("/zones/{}", zone_name);

        let response = match self.send(Method::GET, &path, None::<&()>).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to get zone {}: {}", zone_name, e);
                return None;
            }
        };

        match response.json::<Zone>().await {
            Ok(zone) => Some(zone),
            Err(e) => {
                error!("Failed to decode zone {}: {}", zone_name, e);
                None
            }
        }
    }

    /// Create a new zone
    ///
    /// # Arguments
    /// * `zone_name` - zone FQDN, dot optional
    /// * `kind` - zone kind, defaulting to "Native" when `None`
    /// * `nameservers` - authoritative NS names for the new zone
    pub async fn create_zone(
        &self,
        zone_name: &str,
        kind: Option<&str>,
        nameservers: Option<Vec<String>>,
    ) -> bool {
        let zone_name = records::ensure_fqdn(zone_name);
        let body = ZoneCreate {
            name: zone_name.clone(),
            kind: kind.unwrap_or("Native").to_string(),
            nameservers,
        };

        match self.send(Method::POST, "/zones", Some(&body)).await {
            Ok(_) => {
                info!("Zone created: {}", zone_name);
                true
            }
            Err(e) => {
                error!("Failed to create zone {}: {}", zone_name, e);
                false
            }
        }
    }

    /// Delete a zone and everything in it
    pub async fn delete_zone(&self, zone_name: &str) -> bool {
        let zone_name = records::ensure_fqdn(zone_name);
        let path = format!("/zones/{}", zone_name);

        match self.send(Method::DELETE, &path, None::<&()>).await {
            Ok(_) => {
                info!("Zone deleted: {}", zone_name);
                true
            }
            Err(e) => {
                error!("Failed to delete zone {}: {}", zone_name, e);
                false
            }
        }
    }

    /// Upsert a record via a REPLACE rrset
    ///
    /// REPLACE semantics make this idempotent; `update_record` is the
    /// same operation under its other name.
    pub async fn add_record(
        &self,
        zone_name: &str,
        name: &str,
        rtype: &str,
        content: &str,
        ttl: u32,
        priority: Option<u16>,
    ) -> bool {
        let zone_name = records::ensure_fqdn(zone_name);
        let record = DnsRecord {
            name: name.to_string(),
            rtype: rtype.to_string(),
            ttl,
            content: content.to_string(),
            priority,
            disabled: false,
        };
        let rrset = records::to_rrset(&record, &zone_name);
        let record_name = rrset.name.clone();
        let patch = RrsetPatch {
            rrsets: vec![rrset],
        };
        let path = format!("/zones/{}", zone_name);

        match self.send(Method::PATCH, &path, Some(&patch)).await {
            Ok(_) => {
                info!(
                    "Record added: {} {} {} in {}",
                    record_name, rtype, content, zone_name
                );
                true
            }
            Err(e) => {
                error!("Failed to add record {} {}: {}", record_name, rtype, e);
                false
            }
        }
    }

    /// Upsert a record (alias of [`add_record`](Self::add_record))
    pub async fn update_record(
        &self,
        zone_name: &str,
        name: &str,
        rtype: &str,
        content: &str,
        ttl: u32,
        priority: Option<u16>,
    ) -> bool {
        self.add_record(zone_name, name, rtype, content, ttl, priority)
            .await
    }

    /// Remove an rrset via a DELETE change
    pub async fn delete_record(&self, zone_name: &str, name: &str, rtype: &str) -> bool {
        let zone_name = records::ensure_fqdn(zone_name);
        let rrset = records::delete_rrset(name, rtype, &zone_name);
        let record_name = rrset.name.clone();
        let patch = RrsetPatch {
            rrsets: vec![rrset],
        };
        let path = format!("/zones/{}", zone_name);

        match self.send(Method::PATCH, &path, Some(&patch)).await {
            Ok(_) => {
                info!(
                    "Record deleted: {} {} from {}",
                    record_name, rtype, zone_name
                );
                true
            }
            Err(e) => {
                error!("Failed to delete record {} {}: {}", record_name, rtype, e);
                false
            }
        }
    }

    /// Fetch every record of a zone in flat form
    ///
    /// Returns an empty list when the zone is absent or unreachable.
    pub async fn get_records(&self, zone_name: &str) -> Vec<DnsRecord> {
        match self.get_zone(zone_name).await {
            Some(zone) => flatten_zone(&zone.rrsets),
            None => Vec::new(),
        }
    }

    /// Probe the API with a lightweight server-info request
    ///
    /// Every failure mode becomes `false`; nothing propagates.
    pub async fn test_connection(&self) -> bool {
        self.send(Method::GET, "", None::<&()>).await.is_ok()
    }
}

/// Flatten a zone's rrsets into records
fn flatten_zone(rrsets: &[Rrset]) -> Vec<DnsRecord> {
    rrsets.iter().flat_map(records::from_rrset).collect()
}

#[async_trait]
impl ZoneSource for PdnsClient {
    async fn zone_names(&self) -> Vec<String> {
        self.list_zones()
            .await
            .into_iter()
            .map(|zone| zone.name)
            .filter(|name| !name.is_empty())
            .collect()
    }

    async fn zone_records(&self, zone_name: &str) -> Option<Vec<DnsRecord>> {
        self.get_zone(zone_name)
            .await
            .map(|zone| flatten_zone(&zone.rrsets))
    }
}

#[async_trait]
impl RecordWriter for PdnsClient {
    async fn write_record(&self, zone_name: &str, record: &DnsRecord) -> bool {
        self.add_record(
            zone_name,
            &record.name,
            &record.rtype,
            &record.content,
            record.ttl,
            record.priority,
        )
        .await
    }
}
