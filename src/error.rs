// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Failure taxonomy shared by every stage of the probe.
//!
//! The four typed channels mirror the NULL/-1 failure paths of the C
//! teacher's `iscsi_pdu_helper.c`: allocation, encoding overflow, transport,
//! and protocol parsing. `anyhow` carries context at the application layer
//! (config, suite, main) on top of these.

use std::collections::TryReserveError;

use thiserror::Error;

/// Typed failures produced by the probe's wire, transport, and codec stages.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A fallible allocation (`try_reserve_exact`) could not be satisfied.
    #[error("allocation failed: {0}")]
    AllocationFailure(#[from] TryReserveError),

    /// Encoding would exceed the available capacity; no partial output written.
    #[error("encoding overflow: needed {needed} bytes, capacity {capacity}")]
    EncodingOverflow { needed: usize, capacity: usize },

    /// A TCP/socket operation failed.
    #[error("transport failure: {0}")]
    TransportFailure(#[from] std::io::Error),

    /// A PDU or text segment could not be parsed or validated.
    #[error("protocol parse failure: {0}")]
    ProtocolParseFailure(String),
}
