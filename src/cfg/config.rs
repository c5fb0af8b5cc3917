// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::cfg::enums::SessionType;

/// Conventional iSCSI portal port, used when the configured portal carries
/// no explicit port.
pub const DEFAULT_ISCSI_PORT: u16 = 3260;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// The target under test.
    pub target: TargetConfig,
    /// Runtime parameters that never travel on the wire.
    pub runtime: RuntimeConfig,
    /// Output and reporting options.
    pub report: ReportConfig,
}

/// Identity of the target portal and the names the probe presents.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TargetConfig {
    #[serde(rename = "Portal")]
    /// Portal address, `host:port` or bare `host` (port defaults to 3260).
    pub portal: String,

    #[serde(default, rename = "TargetName")]
    /// Target IQN; required for Normal sessions.
    pub target_name: String,

    #[serde(rename = "InitiatorName")]
    /// Initiator IQN presented in every scenario (mandatory).
    pub initiator_name: String,

    #[serde(default = "default_session_type", rename = "SessionType")]
    /// Requested session type; the scenarios assume Normal.
    pub session_type: SessionType,
}

fn default_session_type() -> SessionType {
    SessionType::Normal
}

#[derive(Deserialize, Serialize, Debug, Clone)]
/// Timeouts applied through the transport contract.
pub struct RuntimeConfig {
    #[serde(rename = "TimeoutConnection", with = "serde_secs")]
    /// Bound on establishing the TCP connection.
    pub timeout_connection: Duration,

    #[serde(rename = "TimeoutIo", with = "serde_secs")]
    /// Bound on each blocking send/receive.
    pub timeout_io: Duration,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
/// How results are printed and persisted.
pub struct ReportConfig {
    #[serde(default = "default_verbosity", rename = "Verbosity")]
    /// 0 = failures only, 1 = normal, 2 = verbose.
    pub verbosity: u8,

    #[serde(default, rename = "StopOnFail")]
    /// Halt the run at the first failing test.
    pub stop_on_fail: bool,

    #[serde(default, rename = "GenerateReport")]
    /// Write a timestamped report file after the run.
    pub generate_report: bool,

    #[serde(default = "default_report_dir", rename = "ReportDir")]
    /// Directory receiving report files.
    pub report_dir: String,

    #[serde(default, rename = "Format")]
    /// Report file format.
    pub format: ReportFormat,
}

fn default_verbosity() -> u8 {
    1
}

fn default_report_dir() -> String {
    "reports".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(&path).with_context(|| {
            format!("failed to read config file {:?}", path.as_ref())
        })?;
        let mut cfg: Config = serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants and normalizes derived fields.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(
            !self.target.portal.trim().is_empty(),
            "Portal must not be empty"
        );
        ensure!(
            !self.target.initiator_name.is_empty(),
            "InitiatorName must not be empty"
        );
        if self.target.session_type.is_normal() {
            ensure!(
                !self.target.target_name.is_empty(),
                "TargetName is required for Normal session"
            );
        }

        // A zero timeout would disable the socket bound entirely.
        ensure!(
            !self.runtime.timeout_connection.is_zero(),
            "TimeoutConnection must be >= 1 second"
        );
        ensure!(
            !self.runtime.timeout_io.is_zero(),
            "TimeoutIo must be >= 1 second"
        );

        if self.report.verbosity > 2 {
            self.report.verbosity = 2;
        }

        Ok(())
    }

    /// Split the configured portal into `(host, port)`, defaulting the port
    /// to 3260 when absent.
    pub fn portal_host_port(&self) -> Result<(String, u16)> {
        let portal = self.target.portal.trim();
        match portal.rsplit_once(':') {
            Some((host, port)) => {
                let port: u16 = port
                    .parse()
                    .with_context(|| format!("invalid portal port {port:?}"))?;
                ensure!(port != 0, "portal port must not be 0");
                if host.is_empty() {
                    bail!("portal {portal:?} has no host part");
                }
                Ok((host.to_string(), port))
            },
            None => Ok((portal.to_string(), DEFAULT_ISCSI_PORT)),
        }
    }
}

// SessionType helpers
impl SessionType {
    pub fn is_discovery(&self) -> bool {
        matches!(self, SessionType::Discovery)
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, SessionType::Normal)
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}
