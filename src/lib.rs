//! Raw-wire conformance probe for iSCSI target login negotiation.
// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

/// Handles configuration, command-line parsing, and logging.
pub mod cfg;
/// Blocking single-shot TCP transport towards a target portal.
pub mod client;
/// Failure taxonomy shared by every stage of the probe.
pub mod error;
/// Defines the wire format of the iSCSI PDUs the probe builds and parses.
pub mod models;
/// Builders for the deliberately malformed login negotiation scenarios.
pub mod scenarios;
/// Test registry, runner, and report generation.
pub mod suite;
