// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! User capability queries
//!
//! Zone visibility in WHM depends on who is asking: root sees
//! everything, resellers see the zones of the accounts they own, and
//! ordinary users see their own domains. The query surface is a trait
//! so callers are not tied to cPanel - the shipped implementation asks
//! whmapi1 and maps every tool failure to the least-privileged answer.

use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::error;

use crate::records;
use crate::whmapi::WhmApi;

/// Subprocess timeout for the identity check
const WHOAMI_TIMEOUT: Duration = Duration::from_secs(5);

/// Privilege class of a WHM user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    Root,
    Reseller,
    User,
    /// Lookup failed or the user does not exist; grants nothing
    Unknown,
}

/// Source of user privilege and domain-ownership answers
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Privilege class of `username`
    async fn user_type(&self, username: &str) -> UserType;

    /// Domains `username` owns, without trailing dots
    async fn user_domains(&self, username: &str) -> Vec<String>;
}

/// Whether `username` may manage `zone_name`
///
/// Root manages everything. Resellers and users manage exactly the
/// zones in their domain list - a reseller's list covers the accounts
/// it owns. Unknown users manage nothing.
pub async fn can_manage_zone(
    directory: &dyn UserDirectory,
    username: &str,
    zone_name: &str,
) -> bool {
    let domain = records::strip_fqdn(zone_name);

    match directory.user_type(username).await {
        UserType::Root => true,
        UserType::Reseller | UserType::User => directory
            .user_domains(username)
            .await
            .iter()
            .any(|owned| owned == domain),
        UserType::Unknown => false,
    }
}

/// whmapi1-backed user directory
#[derive(Debug, Clone)]
pub struct WhmUserDirectory {
    whm: WhmApi,
}

impl WhmUserDirectory {
    pub fn new(whm: WhmApi) -> Self {
        Self { whm }
    }

    /// Whether this process itself runs as root
    async fn running_as_root() -> bool {
        let output = tokio::time::timeout(WHOAMI_TIMEOUT, Command::new("whoami").output()).await;

        match output {
            Ok(Ok(output)) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim() == "root"
            }
            _ => false,
        }
    }
}

#[async_trait]
impl UserDirectory for WhmUserDirectory {
    async fn user_type(&self, username: &str) -> UserType {
        if username == "root" {
            return if Self::running_as_root().await {
                UserType::Root
            } else {
                UserType::Unknown
            };
        }

        match self.whm.list_resellers().await {
            Ok(resellers) => {
                if resellers.iter().any(|reseller| reseller == username) {
                    return UserType::Reseller;
                }
            }
            Err(e) => {
                error!("Error checking user type for {}: {}", username, e);
                return UserType::Unknown;
            }
        }

        match self.whm.list_accounts(Some(username), Some("user")).await {
            Ok(accounts) => {
                if accounts.iter().any(|account| account.user == username) {
                    UserType::User
                } else {
                    UserType::Unknown
                }
            }
            Err(e) => {
                error!("Error checking user type for {}: {}", username, e);
                UserType::Unknown
            }
        }
    }

    async fn user_domains(&self, username: &str) -> Vec<String> {
        let lookup = match self.user_type(username).await {
            UserType::Root => self.whm.list_accounts(None, None).await,
            UserType::Reseller => self.whm.list_accounts(Some(username), Some("owner")).await,
            UserType::User => self.whm.list_accounts(Some(username), Some("user")).await,
            UserType::Unknown => return Vec::new(),
        };

        match lookup {
            Ok(accounts) => accounts
                .into_iter()
                .map(|account| account.domain)
                .filter(|domain| !domain.is_empty())
                .collect(),
            Err(e) => {
                error!("Error getting domains for {}: {}", username, e);
                Vec::new()
            }
        }
    }
}
