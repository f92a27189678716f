// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the whmapi1 executor

#[cfg(test)]
mod tests {
    use crate::whmapi::{parse_data, Account, WhmApi, WhmApiResponse, ZoneEntry, DEFAULT_WHMAPI_PATH};

    #[test]
    fn test_executor_creation() {
        let executor = WhmApi::new(None);
        assert_eq!(executor.binary, DEFAULT_WHMAPI_PATH);

        let custom = WhmApi::new(Some("/custom/path/whmapi1".to_string()));
        assert_eq!(custom.binary, "/custom/path/whmapi1");
    }

    #[test]
    fn test_build_args_listzones() {
        let args = WhmApi::build_args("listzones", &[("domain", "example.com".to_string())]);
        assert_eq!(args, vec!["--output=json", "listzones", "domain=example.com"]);
    }

    #[test]
    fn test_build_args_createzone() {
        let args = WhmApi::build_args(
            "createzone",
            &[
                ("domain", "example.com".to_string()),
                ("username", "root".to_string()),
            ],
        );
        assert_eq!(
            args,
            vec![
                "--output=json",
                "createzone",
                "domain=example.com",
                "username=root"
            ]
        );
    }

    #[test]
    fn test_build_args_addzonerecord_with_priority() {
        let args = WhmApi::build_args(
            "addzonerecord",
            &[
                ("domain", "example.com".to_string()),
                ("name", "mail".to_string()),
                ("type", "MX".to_string()),
                ("address", "mx1.example.com.".to_string()),
                ("ttl", "3600".to_string()),
                ("priority", "10".to_string()),
            ],
        );
        assert_eq!(
            args,
            vec![
                "--output=json",
                "addzonerecord",
                "domain=example.com",
                "name=mail",
                "type=MX",
                "address=mx1.example.com.",
                "ttl=3600",
                "priority=10"
            ]
        );
    }

    #[test]
    fn test_success_envelope() {
        let json = r#"{
            "data": {"zone": [{"domain": "example.com", "zonefile": "example.com.db"}]},
            "metadata": {"command": "listzones", "reason": "OK", "result": 1, "version": 1}
        }"#;

        let response: WhmApiResponse = serde_json::from_str(json).unwrap();
        assert!(response.succeeded());
        assert_eq!(response.metadata.reason, "OK");

        let zones: Vec<ZoneEntry> = parse_data(&response, "zone").unwrap();
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].domain, "example.com");
    }

    #[test]
    fn test_failure_envelope() {
        let json = r#"{
            "metadata": {"command": "createzone", "reason": "Zone already exists", "result": 0, "version": 1}
        }"#;

        let response: WhmApiResponse = serde_json::from_str(json).unwrap();
        assert!(!response.succeeded());
        assert_eq!(response.metadata.reason, "Zone already exists");
    }

    #[test]
    fn test_missing_data_key_is_empty() {
        // whmapi1 omits the array key entirely for empty result sets
        let json = r#"{
            "data": {},
            "metadata": {"command": "listzones", "reason": "OK", "result": 1, "version": 1}
        }"#;

        let response: WhmApiResponse = serde_json::from_str(json).unwrap();
        let zones: Vec<ZoneEntry> = parse_data(&response, "zone").unwrap();
        assert!(zones.is_empty());
    }

    #[test]
    fn test_account_entries_parse() {
        let json = r#"{
            "data": {"acct": [
                {"user": "alice", "domain": "alice.example", "owner": "root"},
                {"user": "bob", "domain": "bob.example", "owner": "reseller1"}
            ]},
            "metadata": {"command": "listaccts", "reason": "OK", "result": 1, "version": 1}
        }"#;

        let response: WhmApiResponse = serde_json::from_str(json).unwrap();
        let accounts: Vec<Account> = parse_data(&response, "acct").unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].user, "alice");
        assert_eq!(accounts[1].domain, "bob.example");
    }

    // Note: invoking the real binary requires a cPanel server; command
    // execution is covered by integration tooling. These tests validate
    // argument construction and envelope handling.
}
