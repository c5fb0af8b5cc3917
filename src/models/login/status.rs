// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Login Response status codes, RFC 3720 §11.11.1 and the IANA iSCSI
//! Login Response Status Codes registry.
//!
//! The probe's verdict only cares whether both status bytes are zero; the
//! decoded names exist so reports can say *why* a target refused.

/// The status class byte of a Login Response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Target accepted the request.
    Success,
    /// Initiator must follow the supplied TargetAddress.
    Redirection,
    /// Mistake on the initiator side; do not retry as-is.
    InitiatorError,
    /// Target temporarily cannot fulfil; may retry.
    TargetError,
    /// Outside the registry.
    Unknown(u8),
}

impl From<u8> for StatusClass {
    fn from(b: u8) -> Self {
        match b {
            0 => StatusClass::Success,
            1 => StatusClass::Redirection,
            2 => StatusClass::InitiatorError,
            3 => StatusClass::TargetError,
            other => StatusClass::Unknown(other),
        }
    }
}

impl From<StatusClass> for u8 {
    fn from(class: StatusClass) -> Self {
        match class {
            StatusClass::Success => 0x00,
            StatusClass::Redirection => 0x01,
            StatusClass::InitiatorError => 0x02,
            StatusClass::TargetError => 0x03,
            StatusClass::Unknown(v) => v,
        }
    }
}

impl StatusClass {
    /// Human-readable name for a Status-Detail byte under this class.
    ///
    /// Unassigned or vendor-specific values fall through to a generic label
    /// rather than failing, so diagnostics never mask the verdict.
    pub fn describe_detail(self, detail: u8) -> &'static str {
        match (self, detail) {
            (StatusClass::Success, 0x00) => "login accepted",
            (StatusClass::Redirection, 0x01) => "target moved temporarily",
            (StatusClass::Redirection, 0x02) => "target moved permanently",
            (StatusClass::InitiatorError, 0x00) => "initiator error",
            (StatusClass::InitiatorError, 0x01) => "authentication failure",
            (StatusClass::InitiatorError, 0x02) => "authorization failure",
            (StatusClass::InitiatorError, 0x03) => "not found",
            (StatusClass::InitiatorError, 0x04) => "target removed",
            (StatusClass::InitiatorError, 0x05) => "unsupported version",
            (StatusClass::InitiatorError, 0x06) => "too many connections",
            (StatusClass::InitiatorError, 0x07) => "missing parameter",
            (StatusClass::InitiatorError, 0x08) => "can't include in session",
            (StatusClass::InitiatorError, 0x09) => "session type not supported",
            (StatusClass::InitiatorError, 0x0a) => "session does not exist",
            (StatusClass::InitiatorError, 0x0b) => "invalid during login",
            (StatusClass::TargetError, 0x00) => "target error",
            (StatusClass::TargetError, 0x01) => "service unavailable",
            (StatusClass::TargetError, 0x02) => "out of resources",
            _ => "reserved or vendor-specific status",
        }
    }
}
