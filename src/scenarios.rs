// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Builders for the deliberately malformed Login Request PDUs.
//!
//! Each scenario produces one complete PDU: a 48-byte BHS followed by the
//! padded negotiation text. All three carry the mandatory triple
//! `InitiatorName` / `TargetName` / `SessionType=Normal` and then break one
//! rule of RFC 3720 §12, so a conforming target has to refuse the login.
//!
//! The PDUs are single-use: built once, sent over one connection, and
//! discarded after classification.

use crate::{
    cfg::enums::{Digest, SessionType},
    error::ProbeError,
    models::{
        login::{common::Stage, request::LoginRequestBuilder},
        text::keys::{KeyValuePair, encode_kv_segment},
    },
};

/// Segment capacity shared by every scenario; generous for a handful of keys.
pub const LOGIN_SEGMENT_CAPACITY: usize = 1024;

/// The DataDigest spelling no target recognizes.
pub const BOGUS_DATA_DIGEST: &str = "INVALID_DIGEST";

// Scenario-unique initiator task tags, so concurrently captured traffic can
// be told apart.
const ITT_INVALID_MAX_RECV: u32 = 1;
const ITT_INVALID_MAX_CONNECTIONS: u32 = 2;
const ITT_CONTRADICTORY_DIGESTS: u32 = 3;

/// MaxRecvDataSegmentLength="0"; RFC 3720 requires a declared value of at
/// least 512.
pub fn invalid_max_recv_data_segment_length(
    initiator_name: &str,
    target_name: &str,
) -> Result<Vec<u8>, ProbeError> {
    let mut pairs = mandatory_triple(initiator_name, target_name)?;
    pairs.push(KeyValuePair::new("MaxRecvDataSegmentLength", "0")?);
    build_probe_pdu(&pairs, ITT_INVALID_MAX_RECV)
}

/// MaxConnections="0"; RFC 3720 requires at least 1.
pub fn invalid_max_connections(
    initiator_name: &str,
    target_name: &str,
) -> Result<Vec<u8>, ProbeError> {
    let mut pairs = mandatory_triple(initiator_name, target_name)?;
    pairs.push(KeyValuePair::new("MaxConnections", "0")?);
    build_probe_pdu(&pairs, ITT_INVALID_MAX_CONNECTIONS)
}

/// HeaderDigest="CRC32C" paired with a DataDigest value outside the
/// registry.
pub fn contradictory_digests(
    initiator_name: &str,
    target_name: &str,
) -> Result<Vec<u8>, ProbeError> {
    let mut pairs = mandatory_triple(initiator_name, target_name)?;
    pairs.push(KeyValuePair::new(
        "HeaderDigest",
        Digest::CRC32C.to_string(),
    )?);
    pairs.push(KeyValuePair::new("DataDigest", BOGUS_DATA_DIGEST)?);
    build_probe_pdu(&pairs, ITT_CONTRADICTORY_DIGESTS)
}

fn mandatory_triple(
    initiator_name: &str,
    target_name: &str,
) -> Result<Vec<KeyValuePair>, ProbeError> {
    Ok(vec![
        KeyValuePair::new("InitiatorName", initiator_name)?,
        KeyValuePair::new("TargetName", target_name)?,
        KeyValuePair::new("SessionType", SessionType::Normal.to_string())?,
    ])
}

/// Encode the pairs, fill the BHS, and glue both into one buffer.
///
/// Header: LoginReq, Transit with NSG=Operational (CSG stays Security),
/// version bytes zero, ISID/TSIH/CID zero, CmdSN=0, ExpStatSN=0. The
/// DataSegmentLength field carries the padded segment size, so the total
/// PDU length is `48 + segment`.
fn build_probe_pdu(pairs: &[KeyValuePair], task_tag: u32) -> Result<Vec<u8>, ProbeError> {
    let segment = encode_kv_segment(pairs, LOGIN_SEGMENT_CAPACITY)?;

    let (header, data) = LoginRequestBuilder::new([0u8; 6], 0)
        .transit()
        .csg(Stage::Security)
        .nsg(Stage::Operational)
        .initiator_task_tag(task_tag)
        .cmd_sn(0)
        .exp_stat_sn(0)
        .append_data(segment)
        .build()?;

    let mut pdu = Vec::new();
    pdu.try_reserve_exact(header.len() + data.len())?;
    pdu.extend_from_slice(&header);
    pdu.extend_from_slice(&data);
    Ok(pdu)
}
