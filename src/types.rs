// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common types and errors used throughout the pdnsbridge library

/// Library error type
///
/// Three classes of failure cross the library boundary:
/// - `Transport` - network error, timeout, or non-2xx response from the
///   PowerDNS API
/// - `ExternalTool` - non-zero exit, timeout, or failed result envelope
///   from a cPanel command-line tool
/// - `Config` - unwritable configuration path or serialization failure
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("PowerDNS API error: {0}")]
    Transport(String),

    #[error("External tool failed: {0}")]
    ExternalTool(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
