// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Tri-state classification of a raw Login Response buffer.
//!
//! The verdict depends on exactly three things: the buffer length, the
//! opcode's low six bits, and the two status bytes at offsets 36/37. It
//! never says *which* negotiation key a target objected to.

use std::fmt;

use crate::models::{
    common::{HEADER_LEN, STATUS_CLASS_OFFSET, STATUS_DETAIL_OFFSET},
    opcode::{OPCODE_MASK, Opcode},
};

/// Outcome of one login probe round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginVerdict {
    /// Status-Class and Status-Detail are both zero.
    Accepted,
    /// Any non-zero status pair; the target refused the login.
    Rejected,
    /// The bytes are too short or are not a Login Response at all. Never
    /// collapsed into `Rejected`: a misbehaving target is not a refusing one.
    ParseError,
}

impl fmt::Display for LoginVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LoginVerdict::Accepted => "accepted",
            LoginVerdict::Rejected => "rejected",
            LoginVerdict::ParseError => "parse error",
        })
    }
}

/// Classify a raw response buffer as received from the wire.
pub fn classify_login_response(buf: &[u8]) -> LoginVerdict {
    if buf.len() < HEADER_LEN {
        return LoginVerdict::ParseError;
    }
    if buf[0] & OPCODE_MASK != Opcode::LoginResp as u8 {
        return LoginVerdict::ParseError;
    }
    if buf[STATUS_CLASS_OFFSET] == 0 && buf[STATUS_DETAIL_OFFSET] == 0 {
        LoginVerdict::Accepted
    } else {
        LoginVerdict::Rejected
    }
}
