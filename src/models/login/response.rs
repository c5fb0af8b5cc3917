// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    error::ProbeError,
    models::{
        common::{HEADER_LEN, STATUS_CLASS_OFFSET, STATUS_DETAIL_OFFSET, get_u24_be},
        login::status::StatusClass,
        opcode::{OPCODE_MASK, Opcode},
    },
};

/// BHS of a Login Response PDU, RFC 3720 §10.13.
///
/// Parsed for diagnostics only; the accept/reject verdict never depends on
/// this decode succeeding (see [`crate::models::login::verdict`]). Flags are
/// kept raw so a target setting reserved bits still yields a header to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub opcode: u8, // 0x23 per RFC; callers have already matched it
    pub flags: u8,
    pub version_max: u8,
    pub version_active: u8,
    pub total_ahs_length: u8,
    pub data_segment_length: [u8; 3],
    pub isid: [u8; 6],
    pub tsih: u16,
    pub initiator_task_tag: u32,
    pub stat_sn: u32,
    pub exp_cmd_sn: u32,
    pub max_cmd_sn: u32,
    pub status_class: StatusClass,
    pub status_detail: u8,
}

impl LoginResponse {
    /// Parse the 48-byte BHS of a Login Response.
    pub fn from_bhs_bytes(buf: &[u8]) -> Result<Self, ProbeError> {
        if buf.len() < HEADER_LEN {
            return Err(ProbeError::ProtocolParseFailure(format!(
                "login response header needs {HEADER_LEN} bytes, got {}",
                buf.len()
            )));
        }
        let code = buf[0] & OPCODE_MASK;
        if code != Opcode::LoginResp as u8 {
            return Err(ProbeError::ProtocolParseFailure(match Opcode::from_u6(code) {
                Some(other) => format!("expected LoginResp opcode, got {other:?}"),
                None => format!("expected LoginResp opcode, got reserved 0x{code:02x}"),
            }));
        }

        let mut data_segment_length = [0u8; 3];
        data_segment_length.copy_from_slice(&buf[5..8]);
        let mut isid = [0u8; 6];
        isid.copy_from_slice(&buf[8..14]);

        Ok(LoginResponse {
            opcode: buf[0],
            flags: buf[1],
            version_max: buf[2],
            version_active: buf[3],
            total_ahs_length: buf[4],
            data_segment_length,
            isid,
            tsih: u16::from_be_bytes([buf[14], buf[15]]),
            initiator_task_tag: u32::from_be_bytes([buf[16], buf[17], buf[18], buf[19]]),
            stat_sn: u32::from_be_bytes([buf[24], buf[25], buf[26], buf[27]]),
            exp_cmd_sn: u32::from_be_bytes([buf[28], buf[29], buf[30], buf[31]]),
            max_cmd_sn: u32::from_be_bytes([buf[32], buf[33], buf[34], buf[35]]),
            status_class: StatusClass::from(buf[STATUS_CLASS_OFFSET]),
            status_detail: buf[STATUS_DETAIL_OFFSET],
        })
    }

    /// Payload bytes announced by the DataSegmentLength field.
    pub fn data_length_bytes(&self) -> usize {
        get_u24_be(&self.data_segment_length) as usize
    }

    /// Human-readable label for the status pair, for reports and logs.
    pub fn status_description(&self) -> &'static str {
        self.status_class.describe_detail(self.status_detail)
    }
}
