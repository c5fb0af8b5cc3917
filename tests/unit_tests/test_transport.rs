// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    io::{Read, Write},
    net::TcpListener,
    thread,
    time::{Duration, Instant},
};

use iscsi_conformance_rs::{
    client::connection::PortalClient,
    error::ProbeError,
    models::login::verdict::{LoginVerdict, classify_login_response},
    scenarios::invalid_max_recv_data_segment_length,
};

const INITIATOR: &str = "iqn.2024-12.com.test:initiator";
const TARGET: &str = "iqn.2024-12.com.test:target";

/// A canned accepting Login Response header.
fn accept_response() -> [u8; 48] {
    let mut bhs = [0u8; 48];
    bhs[0] = 0x23;
    bhs
}

#[test]
fn test_closed_port_is_transport_failure() {
    // Bind to grab a free port, then drop the listener so nothing answers.
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let pdu = invalid_max_recv_data_segment_length(INITIATOR, TARGET).expect("build");
    let client = PortalClient::new("127.0.0.1", port)
        .with_connect_timeout(Duration::from_secs(5))
        .with_io_timeout(Duration::from_secs(5));

    let started = Instant::now();
    let err = client.exchange(&pdu).expect_err("nothing listens there");
    assert!(matches!(err, ProbeError::TransportFailure(_)));
    // Loopback refusal is immediate; well inside the configured bound.
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_exchange_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut buf = [0u8; 1024];
        let received = stream.read(&mut buf).expect("read request");
        stream
            .write_all(&accept_response())
            .expect("write response");
        received
    });

    let pdu = invalid_max_recv_data_segment_length(INITIATOR, TARGET).expect("build");
    let client = PortalClient::new("127.0.0.1", port)
        .with_connect_timeout(Duration::from_secs(5))
        .with_io_timeout(Duration::from_secs(5));

    let response = client.exchange(&pdu).expect("exchange");
    assert_eq!(response.len(), 48);
    assert_eq!(classify_login_response(&response), LoginVerdict::Accepted);

    let received = server.join().expect("server thread");
    assert!(received > 0, "server saw the PDU");
}

#[test]
fn test_peer_closing_without_answer_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();

    let server = thread::spawn(move || {
        // Accept and hang up without reading or writing anything.
        let (stream, _) = listener.accept().expect("accept");
        drop(stream);
    });

    let pdu = invalid_max_recv_data_segment_length(INITIATOR, TARGET).expect("build");
    let client = PortalClient::new("127.0.0.1", port)
        .with_connect_timeout(Duration::from_secs(5))
        .with_io_timeout(Duration::from_secs(5));

    let err = client.exchange(&pdu).expect_err("no response possible");
    assert!(matches!(err, ProbeError::TransportFailure(_)));

    server.join().expect("server thread");
}

#[test]
fn test_unresolvable_host_is_transport_failure() {
    let pdu = invalid_max_recv_data_segment_length(INITIATOR, TARGET).expect("build");
    let client = PortalClient::new("host.invalid", 3260)
        .with_connect_timeout(Duration::from_secs(5));

    let err = client.exchange(&pdu).expect_err("RFC 6761 reserves .invalid");
    assert!(matches!(err, ProbeError::TransportFailure(_)));
}
