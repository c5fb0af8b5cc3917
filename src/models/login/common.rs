// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt;

use crate::error::ProbeError;

bitflags::bitflags! {
    #[derive(Default, Clone, Copy, PartialEq, Eq)]
    pub struct LoginFlags: u8 {
        /// Transit bit (request to move to the next stage)
        const TRANSIT = 0x80;
        /// Continue bit (more text follows in another PDU)
        const CONTINUE = 0x40;
        /// Current Stage bits (bits 3-2)
        const CSG_MASK = 0b0000_1100;
        /// Next Stage bits (bits 1-0)
        const NSG_MASK = 0b0000_0011;
    }
}

impl TryFrom<u8> for LoginFlags {
    type Error = ProbeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LoginFlags::from_bits(value).ok_or_else(|| {
            ProbeError::ProtocolParseFailure(format!("invalid LoginFlags: {value:#010b}"))
        })
    }
}

impl fmt::Debug for LoginFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if self.contains(LoginFlags::TRANSIT) {
            parts.push("TRANSIT".to_string());
        }
        if self.contains(LoginFlags::CONTINUE) {
            parts.push("CONTINUE".to_string());
        }

        if let Some(csg) = Stage::from_bits((self.bits() & LoginFlags::CSG_MASK.bits()) >> 2) {
            parts.push(format!("CSG={csg:?}"));
        }
        if let Some(nsg) = Stage::from_bits(self.bits() & LoginFlags::NSG_MASK.bits()) {
            parts.push(format!("NSG={nsg:?}"));
        }

        write!(f, "LoginFlags({})", parts.join("|"))
    }
}

/// Login negotiation stages (RFC 3720 §12.3): value 2 is reserved.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Stage {
    #[default]
    Security = 0,
    Operational = 1,
    FullFeature = 3,
}

impl Stage {
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0b11 {
            0 => Some(Stage::Security),
            1 => Some(Stage::Operational),
            3 => Some(Stage::FullFeature),
            _ => None,
        }
    }
}
