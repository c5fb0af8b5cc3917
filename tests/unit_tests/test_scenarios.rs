// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use iscsi_conformance_rs::{
    models::{
        common::{HEADER_LEN, get_u24_be},
        login::{common::LoginFlags, request::LoginRequest},
        text::keys::decode_kv_segment,
    },
    scenarios::{
        contradictory_digests, invalid_max_connections,
        invalid_max_recv_data_segment_length,
    },
};

const INITIATOR: &str = "iqn.2024-12.com.test:initiator";
const TARGET: &str = "iqn.2024-12.com.test:target";

fn segment_pairs(pdu: &[u8]) -> Vec<(String, String)> {
    decode_kv_segment(&pdu[HEADER_LEN..])
        .expect("segment decodes")
        .into_iter()
        .map(|p| (p.key().to_string(), p.value().to_string()))
        .collect()
}

#[test]
fn test_invalid_max_recv_pdu_layout() {
    let pdu = invalid_max_recv_data_segment_length(INITIATOR, TARGET).expect("build");

    // The four pairs concatenate to 130 bytes of "key=value\0", padded to
    // 132; the whole PDU is 48 + 132.
    assert_eq!(pdu.len(), 180);

    // Byte 0: LoginReq, no immediate bit.
    assert_eq!(pdu[0], 0x03);
    // Byte 1: Transit | NSG=Operational, CSG=Security.
    assert_eq!(pdu[1], 0x81);
    // Version bytes zeroed.
    assert_eq!(&pdu[2..4], &[0, 0]);
    // TotalAHSLength zero, DataSegmentLength = padded segment size.
    assert_eq!(pdu[4], 0);
    assert_eq!(get_u24_be(&pdu[5..8]), 132);
    // ISID and TSIH zeroed.
    assert_eq!(&pdu[8..16], &[0u8; 8]);
    // Scenario-unique initiator task tag.
    assert_eq!(&pdu[16..20], &1u32.to_be_bytes());
    // CmdSN and ExpStatSN zeroed.
    assert_eq!(&pdu[24..32], &[0u8; 8]);

    let pairs = segment_pairs(&pdu);
    assert_eq!(pairs, vec![
        ("InitiatorName".to_string(), INITIATOR.to_string()),
        ("TargetName".to_string(), TARGET.to_string()),
        ("SessionType".to_string(), "Normal".to_string()),
        ("MaxRecvDataSegmentLength".to_string(), "0".to_string()),
    ]);
}

#[test]
fn test_invalid_max_connections_pdu() {
    let pdu = invalid_max_connections(INITIATOR, TARGET).expect("build");

    assert_eq!(pdu[0], 0x03);
    assert_eq!(pdu[1], 0x81);
    assert_eq!(&pdu[16..20], &2u32.to_be_bytes());
    assert_eq!(pdu.len(), HEADER_LEN + get_u24_be(&pdu[5..8]) as usize);

    let pairs = segment_pairs(&pdu);
    assert_eq!(pairs.len(), 4);
    assert_eq!(
        pairs[3],
        ("MaxConnections".to_string(), "0".to_string())
    );
}

#[test]
fn test_contradictory_digests_pdu() {
    let pdu = contradictory_digests(INITIATOR, TARGET).expect("build");

    assert_eq!(pdu[0], 0x03);
    assert_eq!(&pdu[16..20], &3u32.to_be_bytes());
    assert_eq!(pdu.len(), HEADER_LEN + get_u24_be(&pdu[5..8]) as usize);
    assert_eq!(pdu.len() % 4, 0);

    let pairs = segment_pairs(&pdu);
    assert_eq!(pairs.len(), 5);
    assert_eq!(
        pairs[3],
        ("HeaderDigest".to_string(), "CRC32C".to_string())
    );
    assert_eq!(
        pairs[4],
        ("DataDigest".to_string(), "INVALID_DIGEST".to_string())
    );
}

#[test]
fn test_scenarios_use_distinct_task_tags() {
    let a = invalid_max_recv_data_segment_length(INITIATOR, TARGET).expect("build");
    let b = invalid_max_connections(INITIATOR, TARGET).expect("build");
    let c = contradictory_digests(INITIATOR, TARGET).expect("build");

    let tag = |pdu: &[u8]| u32::from_be_bytes([pdu[16], pdu[17], pdu[18], pdu[19]]);
    let tags = [tag(&a), tag(&b), tag(&c)];
    assert_eq!(tags, [1, 2, 3]);
}

#[test]
fn test_scenario_header_parses_back() {
    let pdu = invalid_max_recv_data_segment_length(INITIATOR, TARGET).expect("build");

    let header = LoginRequest::from_bhs_bytes(&pdu[..HEADER_LEN]).expect("parse");
    assert!(header.flags.contains(LoginFlags::TRANSIT));
    assert!(!header.flags.contains(LoginFlags::CONTINUE));
    assert_eq!(header.initiator_task_tag, 1);
    assert_eq!(header.data_length_bytes(), 132);
    assert_eq!(header.cmd_sn, 0);
    assert_eq!(header.exp_stat_sn, 0);

    // Re-encoding the parsed header reproduces the original 48 bytes.
    assert_eq!(header.to_bhs_bytes().as_slice(), &pdu[..HEADER_LEN]);
}
