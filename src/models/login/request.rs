// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use crate::{
    error::ProbeError,
    models::{
        common::{HEADER_LEN, get_u24_be, pad4, put_u24_be},
        login::common::{LoginFlags, Stage},
        opcode::{BhsOpcode, Opcode},
    },
};

/// BHS of a Login Request PDU, RFC 3720 §10.12.
///
/// Encoding is explicit field-by-field big-endian; the struct is never
/// overlaid onto wire bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub opcode: BhsOpcode,            // byte 0
    pub flags: LoginFlags,            // byte 1
    pub version_max: u8,              // byte 2
    pub version_min: u8,              // byte 3
    pub total_ahs_length: u8,         // byte 4
    pub data_segment_length: [u8; 3], // bytes 5..8
    pub isid: [u8; 6],                // bytes 8..14
    pub tsih: u16,                    // bytes 14..16
    pub initiator_task_tag: u32,      // bytes 16..20
    pub cid: u16,                     // bytes 20..22, then 2 reserved
    pub cmd_sn: u32,                  // bytes 24..28
    pub exp_stat_sn: u32,             // bytes 28..32, then 16 reserved
}

impl LoginRequest {
    /// Serialize the BHS into its 48 wire bytes.
    pub fn to_bhs_bytes(&self) -> [u8; HEADER_LEN] {
        let mut buf = [0u8; HEADER_LEN];
        buf[0] = (&self.opcode).into();
        buf[1] = self.flags.bits();
        buf[2] = self.version_max;
        buf[3] = self.version_min;
        buf[4] = self.total_ahs_length;
        put_u24_be(&mut buf[5..8], get_u24_be(&self.data_segment_length));
        buf[8..14].copy_from_slice(&self.isid);
        buf[14..16].copy_from_slice(&self.tsih.to_be_bytes());
        buf[16..20].copy_from_slice(&self.initiator_task_tag.to_be_bytes());
        buf[20..22].copy_from_slice(&self.cid.to_be_bytes());
        // bytes 22..24 reserved
        buf[24..28].copy_from_slice(&self.cmd_sn.to_be_bytes());
        buf[28..32].copy_from_slice(&self.exp_stat_sn.to_be_bytes());
        // bytes 32..48 reserved
        buf
    }

    /// Parse a 48-byte Login Request BHS.
    pub fn from_bhs_bytes(buf: &[u8]) -> Result<Self, ProbeError> {
        if buf.len() < HEADER_LEN {
            return Err(ProbeError::ProtocolParseFailure(format!(
                "login request header needs {HEADER_LEN} bytes, got {}",
                buf.len()
            )));
        }
        let opcode = BhsOpcode::try_from(buf[0])?;
        if opcode.opcode != Opcode::LoginReq {
            return Err(ProbeError::ProtocolParseFailure(format!(
                "expected LoginReq opcode, got {:?}",
                opcode.opcode
            )));
        }
        let flags = LoginFlags::try_from(buf[1])?;

        let mut data_segment_length = [0u8; 3];
        data_segment_length.copy_from_slice(&buf[5..8]);
        let mut isid = [0u8; 6];
        isid.copy_from_slice(&buf[8..14]);

        Ok(LoginRequest {
            opcode,
            flags,
            version_max: buf[2],
            version_min: buf[3],
            total_ahs_length: buf[4],
            data_segment_length,
            isid,
            tsih: u16::from_be_bytes([buf[14], buf[15]]),
            initiator_task_tag: u32::from_be_bytes([buf[16], buf[17], buf[18], buf[19]]),
            cid: u16::from_be_bytes([buf[20], buf[21]]),
            cmd_sn: u32::from_be_bytes([buf[24], buf[25], buf[26], buf[27]]),
            exp_stat_sn: u32::from_be_bytes([buf[28], buf[29], buf[30], buf[31]]),
        })
    }

    /// Payload bytes announced by the DataSegmentLength field.
    pub fn data_length_bytes(&self) -> usize {
        get_u24_be(&self.data_segment_length) as usize
    }
}

/// Builder for a Login Request PDU.
///
/// Produces a `(header, data)` pair whose DataSegmentLength field always
/// carries the padded segment length, so the total PDU size is
/// `48 + data.len()`.
#[derive(Debug)]
pub struct LoginRequestBuilder {
    pub header: LoginRequest,
    data: Vec<u8>,
}

impl LoginRequestBuilder {
    pub fn new(isid: [u8; 6], tsih: u16) -> Self {
        let header = LoginRequest {
            opcode: BhsOpcode {
                immediate: false,
                opcode: Opcode::LoginReq,
            },
            flags: LoginFlags::empty(),
            version_max: 0x00,
            version_min: 0x00,
            total_ahs_length: 0,
            data_segment_length: [0; 3],
            isid,
            tsih,
            initiator_task_tag: 0,
            cid: 0,
            cmd_sn: 0,
            exp_stat_sn: 0,
        };
        LoginRequestBuilder {
            header,
            data: Vec::new(),
        }
    }

    /// Set Transit (T = bit7).
    pub fn transit(mut self) -> Self {
        self.header.flags.insert(LoginFlags::TRANSIT);
        self
    }

    /// Set Continue (C = bit6).
    pub fn cont(mut self) -> Self {
        self.header.flags.insert(LoginFlags::CONTINUE);
        self
    }

    /// Set CSG (current stage, bits 3-2).
    pub fn csg(mut self, stage: Stage) -> Self {
        let bits = (stage as u8 & 0b11) << 2;
        self.header.flags.remove(LoginFlags::CSG_MASK);
        self.header.flags.insert(LoginFlags::from_bits_truncate(bits));
        self
    }

    /// Set NSG (next stage, bits 1-0).
    pub fn nsg(mut self, stage: Stage) -> Self {
        let bits = stage as u8 & 0b11;
        self.header.flags.remove(LoginFlags::NSG_MASK);
        self.header.flags.insert(LoginFlags::from_bits_truncate(bits));
        self
    }

    /// Minimum and maximum protocol version bytes.
    pub fn versions(mut self, max: u8, min: u8) -> Self {
        self.header.version_max = max;
        self.header.version_min = min;
        self
    }

    /// Sets the initiator task tag, unique per in-flight request.
    pub fn initiator_task_tag(mut self, tag: u32) -> Self {
        self.header.initiator_task_tag = tag;
        self
    }

    /// Sets the connection ID (CID).
    pub fn connection_id(mut self, cid: u16) -> Self {
        self.header.cid = cid;
        self
    }

    /// Sets the command sequence number (CmdSN).
    pub fn cmd_sn(mut self, sn: u32) -> Self {
        self.header.cmd_sn = sn;
        self
    }

    /// Sets the expected status sequence number (ExpStatSN).
    pub fn exp_stat_sn(mut self, sn: u32) -> Self {
        self.header.exp_stat_sn = sn;
        self
    }

    /// Append raw bytes to the data segment.
    pub fn append_data(mut self, more: Vec<u8>) -> Self {
        self.data.extend_from_slice(&more);
        self
    }

    /// Pad the data segment to a 4-byte boundary, stamp the padded length
    /// into the BHS, and return `(header_bytes, data_bytes)`.
    pub fn build(mut self) -> Result<([u8; HEADER_LEN], Vec<u8>), ProbeError> {
        let padded = pad4(self.data.len());
        let extra = padded - self.data.len();
        if extra > 0 {
            self.data.try_reserve_exact(extra)?;
            self.data.resize(padded, 0);
        }
        put_u24_be(&mut self.header.data_segment_length, padded as u32);
        Ok((self.header.to_bhs_bytes(), self.data))
    }
}
