// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use hex_literal::hex;
use iscsi_conformance_rs::{
    error::ProbeError,
    models::login::{
        response::LoginResponse,
        status::StatusClass,
        verdict::{LoginVerdict, classify_login_response},
    },
};

/// A rejection a real target would send: LoginResp, TSIH=1, StatSN=1,
/// Status-Class=0x02 (initiator error), Status-Detail=0x07 (missing
/// parameter).
const REJECT_BHS: [u8; 48] = hex!(
    "23 81 00 00 00 00 00 00"
    "00 00 00 00 00 00 00 01"
    "00 00 00 01 00 00 00 00"
    "00 00 00 01 00 00 00 01"
    "00 00 00 02 02 07 00 00"
    "00 00 00 00 00 00 00 00"
);

#[test]
fn test_short_buffer_is_parse_error() {
    assert_eq!(classify_login_response(&[]), LoginVerdict::ParseError);
    assert_eq!(
        classify_login_response(&[0x23; 47]),
        LoginVerdict::ParseError
    );
}

#[test]
fn test_synthetic_accept() {
    // 50 bytes, LoginResp opcode, zeroed status pair: Accepted even though
    // the buffer is longer than one bare header.
    let mut buf = vec![0u8; 50];
    buf[0] = 0x23;
    assert_eq!(classify_login_response(&buf), LoginVerdict::Accepted);
}

#[test]
fn test_nonzero_status_is_rejected() {
    assert_eq!(classify_login_response(&REJECT_BHS), LoginVerdict::Rejected);

    // Either byte alone being non-zero already rejects.
    let mut buf = [0u8; 48];
    buf[0] = 0x23;
    buf[37] = 0x01;
    assert_eq!(classify_login_response(&buf), LoginVerdict::Rejected);
}

#[test]
fn test_wrong_opcode_never_coerces_to_rejected() {
    // A TextResp with a non-zero status region must stay ParseError: a
    // misbehaving target is not the same thing as a refusing one.
    let mut buf = [0u8; 48];
    buf[0] = 0x24;
    buf[36] = 0x02;
    assert_eq!(classify_login_response(&buf), LoginVerdict::ParseError);
}

#[test]
fn test_immediate_bit_does_not_hide_opcode() {
    // Only the low six bits select the opcode.
    let mut buf = [0u8; 48];
    buf[0] = 0x63; // I bit | 0x23
    assert_eq!(classify_login_response(&buf), LoginVerdict::Accepted);
}

#[test]
fn test_response_header_parse() {
    let header = LoginResponse::from_bhs_bytes(&REJECT_BHS).expect("parse");
    assert_eq!(header.tsih, 1);
    assert_eq!(header.initiator_task_tag, 1);
    assert_eq!(header.stat_sn, 1);
    assert_eq!(header.exp_cmd_sn, 1);
    assert_eq!(header.max_cmd_sn, 2);
    assert_eq!(header.status_class, StatusClass::InitiatorError);
    assert_eq!(header.status_detail, 0x07);
    assert_eq!(header.status_description(), "missing parameter");
    assert_eq!(header.data_length_bytes(), 0);
}

#[test]
fn test_response_parse_failures() {
    let err = LoginResponse::from_bhs_bytes(&REJECT_BHS[..40]).expect_err("short");
    assert!(matches!(err, ProbeError::ProtocolParseFailure(_)));

    let mut buf = REJECT_BHS;
    buf[0] = 0x24; // TextResp
    let err = LoginResponse::from_bhs_bytes(&buf).expect_err("wrong opcode");
    match err {
        ProbeError::ProtocolParseFailure(msg) => {
            assert!(msg.contains("TextResp"), "message names the opcode: {msg}");
        },
        other => panic!("expected ProtocolParseFailure, got {other:?}"),
    }
}
