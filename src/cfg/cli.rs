// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Turn a possibly-relative config path into a canonical absolute one.
pub fn resolve_config_path(rel: &str) -> Result<PathBuf> {
    let p = Path::new(rel);

    let abs = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()
            .context("cannot get current working dir")?
            .join(p)
    };

    let canon = abs
        .canonicalize()
        .with_context(|| format!("failed to canonicalize path {abs:?}"))?;

    Ok(canon)
}

/// Parsed command line.
///
/// Option overrides are applied on top of the config file after it loads,
/// mirroring the flag set the tool has always exposed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Args {
    /// Path to the YAML run configuration (positional, required).
    pub config: String,
    /// Optional logger YAML; default is a plain stderr subscriber.
    pub logger_config: Option<String>,
    /// Restrict the run to one test category.
    pub category: Option<String>,
    /// `Some(2)` for `--verbose`, `Some(0)` for `--quiet`.
    pub verbosity: Option<u8>,
    /// Stop at the first failing test.
    pub fail_fast: bool,
    /// `--help` was requested; nothing else matters.
    pub help: bool,
}

impl Args {
    pub fn usage() -> &'static str {
        concat!(
            "Usage: iscsi-conformance-rs [options] <config_file>\n",
            "\n",
            "Options:\n",
            "  -v, --verbose       Verbose output\n",
            "  -q, --quiet         Quiet mode (only show failures)\n",
            "  -f, --fail-fast     Stop on first failure\n",
            "  -c, --category CAT  Run specific test category\n",
            "  -l, --logger PATH   Logger YAML config (default: stderr)\n",
            "  -h, --help          Show this help message\n",
            "\n",
            "Available categories:\n",
            "  login               Login negotiation tests\n",
            "  all                 All tests (default)\n",
        )
    }

    /// Parse everything after the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where I: IntoIterator<Item = String> {
        let mut out = Args::default();
        let mut it = args.into_iter();

        while let Some(arg) = it.next() {
            match arg.as_str() {
                "-v" | "--verbose" => out.verbosity = Some(2),
                "-q" | "--quiet" => out.verbosity = Some(0),
                "-f" | "--fail-fast" => out.fail_fast = true,
                "-c" | "--category" => {
                    out.category =
                        Some(it.next().context("--category requires an argument")?);
                },
                "-l" | "--logger" => {
                    out.logger_config =
                        Some(it.next().context("--logger requires an argument")?);
                },
                "-h" | "--help" => {
                    out.help = true;
                    return Ok(out);
                },
                flag if flag.starts_with('-') => bail!("unknown option: {flag}"),
                positional => {
                    if !out.config.is_empty() {
                        bail!("unexpected extra argument: {positional}");
                    }
                    out.config = positional.to_string();
                },
            }
        }

        if out.config.is_empty() {
            bail!("config file required");
        }

        Ok(out)
    }
}
