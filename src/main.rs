// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use iscsi_conformance_rs::{
    cfg::{
        cli::{Args, resolve_config_path},
        config::Config,
        logger::{init_default_logger, init_logger},
    },
    suite::{Registry, cases::register_login_cases, report, runner},
};
use tracing::info;

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {e}\n");
            eprint!("{}", Args::usage());
            return ExitCode::from(2);
        },
    };

    if args.help {
        print!("{}", Args::usage());
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        },
    }
}

fn run(args: Args) -> Result<bool> {
    // The appender guard must outlive the run or buffered lines are dropped.
    let _guard = match &args.logger_config {
        Some(path) => Some(init_logger(path)?),
        None => {
            init_default_logger()?;
            None
        },
    };

    let mut config = resolve_config_path(&args.config)
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    // Command line overrides on top of the file.
    if let Some(verbosity) = args.verbosity {
        config.report.verbosity = verbosity;
    }
    if args.fail_fast {
        config.report.stop_on_fail = true;
    }

    let category = args.category.as_deref().unwrap_or("all");
    let mut registry = Registry::new();
    if matches!(category, "all" | "login") {
        register_login_cases(&mut registry);
    }
    ensure!(!registry.is_empty(), "unknown test category: {category}");

    info!(
        cases = registry.len(),
        portal = %config.target.portal,
        "starting conformance run"
    );

    let (reports, stats) = runner::run_all(&registry, &config);

    if config.report.generate_report {
        let path = report::write_report(&config, &reports, &stats)?;
        println!("\nDetailed report saved to: {}", path.display());
    }

    Ok(!stats.has_failures())
}
