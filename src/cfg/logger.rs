// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

// Config logger
#[derive(Debug, Deserialize, Clone)]
struct LoggerConfig {
    logger: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct LogConfig {
    level: String,
    output: String,
    #[serde(default)]
    format: LogFormat,
    #[serde(default)]
    is_show_line: bool,
    #[serde(default)]
    is_show_target: bool,
    file: Option<LogFileConfig>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
enum LogFormat {
    #[default]
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
}

#[derive(Debug, Deserialize, Clone)]
struct LogFileConfig {
    path: String,
    rotation_frequency: Option<String>,
}

/// Install the global tracing subscriber described by a YAML logger config.
/// The returned guard must stay alive for the duration of the run, or
/// buffered log lines are lost.
pub fn init_logger(config_path: &str) -> Result<WorkerGuard> {
    let config_content = fs::read_to_string(config_path)
        .context(format!("Failed to read config file: {config_path}"))?;
    let config: LoggerConfig = serde_yaml::from_str(&config_content)
        .context(format!("Failed to parse config file: {config_path}"))?;
    let log = &config.logger;

    let (writer, guard) = match log.output.as_str() {
        "stdout" => tracing_appender::non_blocking(std::io::stdout()),
        "stderr" => tracing_appender::non_blocking(std::io::stderr()),
        "file" => {
            let file_cfg = log
                .file
                .as_ref()
                .context("output is \"file\" but no file section is present")?;

            let path = Path::new(&file_cfg.path);
            let directory = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .context("log file path has no file name")?;

            let rotation = match file_cfg.rotation_frequency.as_deref() {
                Some("minutely") => Rotation::MINUTELY,
                Some("hourly") => Rotation::HOURLY,
                Some("daily") => Rotation::DAILY,
                _ => Rotation::NEVER,
            };
            tracing_appender::non_blocking(RollingFileAppender::new(
                rotation, directory, file_name,
            ))
        },
        other => bail!("invalid log output specified: {other:?}"),
    };

    let env_filter =
        EnvFilter::try_new(&log.level).context("Failed to parse log level from config")?;
    let registry = tracing_subscriber::registry().with(env_filter);

    match log.format {
        LogFormat::Text => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(log.output != "file")
                .with_target(log.is_show_target)
                .with_line_number(log.is_show_line);
            tracing::subscriber::set_global_default(registry.with(layer))
                .context("Failed to set global default subscriber")?;
        },
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(log.is_show_target)
                .with_line_number(log.is_show_line);
            tracing::subscriber::set_global_default(registry.with(layer))
                .context("Failed to set global default subscriber")?;
        },
    }

    Ok(guard)
}

/// Plain stderr subscriber for runs without a logger config. Level comes
/// from `RUST_LOG`, defaulting to `info`.
pub fn init_default_logger() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to install default subscriber: {e}"))
}
