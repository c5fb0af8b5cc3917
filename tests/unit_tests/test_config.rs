// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::time::Duration;

use iscsi_conformance_rs::cfg::{
    cli::{Args, resolve_config_path},
    config::{Config, ReportFormat},
    enums::SessionType,
};

fn load_test_config() -> Config {
    resolve_config_path("tests/config.yaml")
        .and_then(Config::load_from_file)
        .expect("failed to resolve or load config")
}

#[test]
fn test_load_config() {
    let cfg = load_test_config();

    assert_eq!(cfg.target.portal, "127.0.0.1:3260");
    assert_eq!(cfg.target.target_name, "iqn.2024-12.com.test:target");
    assert_eq!(cfg.target.initiator_name, "iqn.2024-12.com.test:initiator");
    assert_eq!(cfg.target.session_type, SessionType::Normal);
    assert_eq!(cfg.runtime.timeout_connection, Duration::from_secs(5));
    assert_eq!(cfg.runtime.timeout_io, Duration::from_secs(5));
    assert_eq!(cfg.report.verbosity, 1);
    assert!(!cfg.report.stop_on_fail);
    assert!(!cfg.report.generate_report);
    assert_eq!(cfg.report.format, ReportFormat::Text);
}

#[test]
fn test_portal_host_port() {
    let mut cfg = load_test_config();
    assert_eq!(
        cfg.portal_host_port().expect("host:port"),
        ("127.0.0.1".to_string(), 3260)
    );

    cfg.target.portal = "storage.example.com".to_string();
    assert_eq!(
        cfg.portal_host_port().expect("bare host"),
        ("storage.example.com".to_string(), 3260)
    );

    cfg.target.portal = "storage.example.com:3261".to_string();
    assert_eq!(
        cfg.portal_host_port().expect("explicit port"),
        ("storage.example.com".to_string(), 3261)
    );

    cfg.target.portal = "storage.example.com:99999".to_string();
    assert!(cfg.portal_host_port().is_err(), "port out of range");

    cfg.target.portal = ":3260".to_string();
    assert!(cfg.portal_host_port().is_err(), "missing host");
}

#[test]
fn test_validation_rejects_empty_portal() {
    let err = resolve_config_path("tests/unit_tests/fixtures/config_bad.yaml")
        .and_then(Config::load_from_file)
        .expect_err("empty portal must not validate");
    assert!(format!("{err:#}").contains("Portal"));
}

#[test]
fn test_validation_requires_target_name_for_normal_session() {
    let mut cfg = load_test_config();
    cfg.target.target_name.clear();
    assert!(cfg.validate_and_normalize().is_err());

    // Discovery sessions do not need a TargetName.
    cfg.target.session_type = SessionType::Discovery;
    assert!(cfg.validate_and_normalize().is_ok());
}

#[test]
fn test_validation_clamps_verbosity() {
    let mut cfg = load_test_config();
    cfg.report.verbosity = 9;
    cfg.validate_and_normalize().expect("still valid");
    assert_eq!(cfg.report.verbosity, 2);
}

#[test]
fn test_args_parsing() {
    let parse = |items: &[&str]| {
        Args::parse(items.iter().map(|s| s.to_string()))
    };

    let args = parse(&["-v", "-f", "probe.yaml"]).expect("parse");
    assert_eq!(args.config, "probe.yaml");
    assert_eq!(args.verbosity, Some(2));
    assert!(args.fail_fast);
    assert_eq!(args.category, None);

    let args = parse(&["--quiet", "--category", "login", "probe.yaml"]).expect("parse");
    assert_eq!(args.verbosity, Some(0));
    assert_eq!(args.category.as_deref(), Some("login"));

    let args = parse(&["--logger", "logger.yaml", "probe.yaml"]).expect("parse");
    assert_eq!(args.logger_config.as_deref(), Some("logger.yaml"));

    let args = parse(&["-h"]).expect("help needs no config");
    assert!(args.help);

    assert!(parse(&[]).is_err(), "config file is required");
    assert!(parse(&["--bogus", "probe.yaml"]).is_err(), "unknown flag");
    assert!(parse(&["a.yaml", "b.yaml"]).is_err(), "extra positional");
    assert!(parse(&["--category"]).is_err(), "missing flag argument");
}
