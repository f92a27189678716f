// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! whmapi1 command executor
//!
//! cPanel's local DNS store has no stable library interface; the
//! supported surface is the `whmapi1` command-line tool. This module
//! wraps it the same way for every call: `whmapi1 --output=json
//! <function> key=value ...`, a bounded wait, then a check of the JSON
//! result envelope. Exit code 0 with `metadata.result == 1` is success;
//! anything else is an error carrying stderr or the metadata reason.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, error};

use crate::sync::LocalDns;
use crate::types::{Error, Result};

/// Default location of the whmapi1 binary
pub const DEFAULT_WHMAPI_PATH: &str = "/usr/local/cpanel/bin/whmapi1";

/// Per-invocation timeout; a hung tool is a terminal failure
const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

/// whmapi1 command executor
#[derive(Debug, Clone)]
pub struct WhmApi {
    pub(crate) binary: String,
}

/// Result envelope wrapped around every whmapi1 response
#[derive(Debug, Deserialize)]
pub struct WhmApiResponse {
    pub metadata: WhmApiMetadata,

    #[serde(default)]
    pub data: serde_json::Value,
}

/// The `metadata` object of a whmapi1 response
#[derive(Debug, Deserialize)]
pub struct WhmApiMetadata {
    /// 1 on success, 0 on failure
    #[serde(default)]
    pub result: i64,

    /// Human-readable outcome ("OK" or the failure reason)
    #[serde(default)]
    pub reason: String,

    /// Echo of the invoked function name
    #[serde(default)]
    pub command: String,
}

impl WhmApiResponse {
    pub fn succeeded(&self) -> bool {
        self.metadata.result == 1
    }
}

/// One zone entry of a `listzones` response
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneEntry {
    pub domain: String,
}

/// One account entry of a `listaccts` response
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub user: String,
    pub domain: String,
}

impl WhmApi {
    /// Create an executor
    ///
    /// # Arguments
    /// * `binary` - path to whmapi1 (default: "/usr/local/cpanel/bin/whmapi1")
    pub fn new(binary: Option<String>) -> Self {
        Self {
            binary: binary.unwrap_or_else(|| DEFAULT_WHMAPI_PATH.to_string()),
        }
    }

    /// Arguments for one invocation, in the order the tool expects
    pub(crate) fn build_args(function: &str, params: &[(&str, String)]) -> Vec<String> {
        let mut args = vec!["--output=json".to_string(), function.to_string()];
        args.extend(params.iter().map(|(key, value)| format!("{}={}", key, value)));
        args
    }

    /// Invoke one whmapi1 function and check its envelope
    async fn call(&self, function: &str, params: &[(&str, String)]) -> Result<WhmApiResponse> {
        let args = Self::build_args(function, params);
        debug!("Executing whmapi1 command: {} {:?}", self.binary, args);

        let output = tokio::time::timeout(
            COMMAND_TIMEOUT,
            Command::new(&self.binary).args(&args).output(),
        )
        .await
        .map_err(|_| Error::ExternalTool(format!("{} timed out", function)))?
        .map_err(|e| Error::ExternalTool(format!("spawn {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("whmapi1 {} failed: {}", function, stderr.trim());
            return Err(Error::ExternalTool(format!(
                "{} exited with {}: {}",
                function,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let response: WhmApiResponse = serde_json::from_str(&stdout).map_err(|e| {
            Error::ExternalTool(format!("{} returned unparseable output: {}", function, e))
        })?;

        if !response.succeeded() {
            error!(
                "whmapi1 {} rejected: {}",
                function, response.metadata.reason
            );
            return Err(Error::ExternalTool(format!(
                "{}: {}",
                function, response.metadata.reason
            )));
        }

        Ok(response)
    }

    /// List local zones, optionally filtered to one domain
    pub async fn list_zones(&self, domain: Option<&str>) -> Result<Vec<String>> {
        let params = match domain {
            Some(domain) => vec![("domain", domain.to_string())],
            None => Vec::new(),
        };
        let response = self.call("listzones", &params).await?;

        let zones: Vec<ZoneEntry> = parse_data(&response, "zone")?;
        Ok(zones.into_iter().map(|zone| zone.domain).collect())
    }

    /// Create a zone owned by root
    pub async fn create_zone(&self, domain: &str) -> Result<()> {
        self.call(
            "createzone",
            &[
                ("domain", domain.to_string()),
                ("username", "root".to_string()),
            ],
        )
        .await
        .map(|_| ())
    }

    /// Add one record to a local zone
    ///
    /// The priority parameter is only passed through when supplied -
    /// whmapi1 rejects it for types that do not take one.
    pub async fn add_zone_record(
        &self,
        domain: &str,
        name: &str,
        rtype: &str,
        address: &str,
        ttl: u32,
        priority: Option<u16>,
    ) -> Result<()> {
        let mut params = vec![
            ("domain", domain.to_string()),
            ("name", name.to_string()),
            ("type", rtype.to_string()),
            ("address", address.to_string()),
            ("ttl", ttl.to_string()),
        ];
        if let Some(priority) = priority {
            params.push(("priority", priority.to_string()));
        }

        self.call("addzonerecord", &params).await.map(|_| ())
    }

    /// List accounts, optionally narrowed by a search expression
    pub async fn list_accounts(
        &self,
        search: Option<&str>,
        searchtype: Option<&str>,
    ) -> Result<Vec<Account>> {
        let mut params = Vec::new();
        if let Some(search) = search {
            params.push(("search", search.to_string()));
        }
        if let Some(searchtype) = searchtype {
            params.push(("searchtype", searchtype.to_string()));
        }

        let response = self.call("listaccts", &params).await?;
        parse_data(&response, "acct")
    }

    /// Usernames of every reseller on the server
    pub async fn list_resellers(&self) -> Result<Vec<String>> {
        let response = self.call("listresellers", &[]).await?;
        parse_data(&response, "reseller")
    }
}

/// Pull a typed array out of a response's `data` object
///
/// whmapi1 omits the key entirely when the result set is empty.
pub(crate) fn parse_data<T: serde::de::DeserializeOwned>(
    response: &WhmApiResponse,
    key: &str,
) -> Result<Vec<T>> {
    match response.data.get(key) {
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            Error::ExternalTool(format!(
                "{} data has unexpected shape: {}",
                response.metadata.command, e
            ))
        }),
        None => Ok(Vec::new()),
    }
}

#[async_trait]
impl LocalDns for WhmApi {
    async fn has_zone(&self, domain: &str) -> Result<bool> {
        let zones = self.list_zones(Some(domain)).await?;
        Ok(zones.iter().any(|zone| zone == domain))
    }

    async fn create_zone(&self, domain: &str) -> Result<()> {
        WhmApi::create_zone(self, domain).await
    }

    async fn add_record(
        &self,
        domain: &str,
        name: &str,
        rtype: &str,
        address: &str,
        ttl: u32,
        priority: Option<u16>,
    ) -> Result<()> {
        self.add_zone_record(domain, name, rtype, address, ttl, priority)
            .await
    }
}
