// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::{
    cfg::config::{Config, ReportFormat},
    suite::{TestReport, TestStats},
};

#[derive(Serialize)]
struct ReportDocument<'a> {
    generated_at: String,
    portal: &'a str,
    target_name: &'a str,
    results: &'a [TestReport],
    summary: &'a TestStats,
}

/// Persist the run into a timestamped file under the configured directory.
/// Returns the path written.
pub fn write_report(
    cfg: &Config,
    reports: &[TestReport],
    stats: &TestStats,
) -> Result<PathBuf> {
    let dir = Path::new(&cfg.report.report_dir);
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create report directory {dir:?}"))?;

    let now = Local::now();
    let stamp = now.format("%Y%m%d_%H%M%S");

    let (path, content) = match cfg.report.format {
        ReportFormat::Text => (
            dir.join(format!("test_report_{stamp}.txt")),
            render_text(cfg, reports, stats, &now.format("%Y-%m-%d %H:%M:%S").to_string()),
        ),
        ReportFormat::Json => {
            let doc = ReportDocument {
                generated_at: now.to_rfc3339(),
                portal: &cfg.target.portal,
                target_name: &cfg.target.target_name,
                results: reports,
                summary: stats,
            };
            (
                dir.join(format!("test_report_{stamp}.json")),
                serde_json::to_string_pretty(&doc).context("failed to serialize report")?,
            )
        },
    };

    fs::write(&path, content)
        .with_context(|| format!("failed to write report file {path:?}"))?;
    Ok(path)
}

fn render_text(
    cfg: &Config,
    reports: &[TestReport],
    stats: &TestStats,
    date: &str,
) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail; discard the fmt plumbing result.
    let _ = writeln!(out, "iSCSI Target Conformance Suite - Detailed Report");
    let _ = writeln!(out, "=================================================");
    let _ = writeln!(out, "Date: {date}");
    let _ = writeln!(out, "Target: {}", cfg.target.portal);
    if !cfg.target.target_name.is_empty() {
        let _ = writeln!(out, "IQN: {}", cfg.target.target_name);
    }
    let _ = writeln!(out, "\nTest Results:");
    let _ = writeln!(out, "-------------");

    let mut current_category: Option<&str> = None;
    for report in reports {
        if current_category != Some(report.category.as_str()) {
            current_category = Some(report.category.as_str());
            let _ = writeln!(out, "\n[{}]", report.category);
        }
        let _ = writeln!(
            out,
            "  {}: {} - {} ({:.3}s)",
            report.id,
            report.name,
            report.outcome.as_str(),
            report.duration_ms / 1000.0
        );
        if let Some(message) = &report.message {
            let _ = writeln!(out, "    Message: {message}");
        }
    }

    let _ = writeln!(out, "\n\nSummary:");
    let _ = writeln!(out, "--------");
    let _ = writeln!(out, "Total:   {}", stats.total);
    let _ = writeln!(out, "Passed:  {}", stats.passed);
    let _ = writeln!(out, "Failed:  {}", stats.failed);
    let _ = writeln!(out, "Skipped: {}", stats.skipped);
    let _ = writeln!(out, "Errors:  {}", stats.errors);
    let _ = writeln!(out, "Duration: {:.1} seconds", stats.total_duration_ms / 1000.0);

    out
}
