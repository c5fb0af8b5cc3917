// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! Login negotiation cases: send one malformed Login Request each and judge
//! the target by the verdict on its response.
//!
//! Mapping: Rejected → Pass (the target enforced the RFC), Accepted → Fail,
//! ParseError → Error (the target misbehaved rather than refused), any
//! transport problem → Error.

use tracing::{debug, warn};

use crate::{
    cfg::config::Config,
    client::connection::PortalClient,
    error::ProbeError,
    models::login::{
        response::LoginResponse,
        verdict::{LoginVerdict, classify_login_response},
    },
    scenarios,
    suite::{Registry, TestCase, TestOutcome},
};

type ScenarioFn = fn(&str, &str) -> Result<Vec<u8>, ProbeError>;

struct NegotiationCase {
    id: &'static str,
    name: &'static str,
    build: ScenarioFn,
}

const LOGIN_CATEGORY: &str = "Login Negotiation";

impl TestCase for NegotiationCase {
    fn id(&self) -> &str {
        self.id
    }

    fn name(&self) -> &str {
        self.name
    }

    fn category(&self) -> &str {
        LOGIN_CATEGORY
    }

    fn run(&self, cfg: &Config) -> (TestOutcome, Option<String>) {
        let (host, port) = match cfg.portal_host_port() {
            Ok(pair) => pair,
            Err(e) => return (TestOutcome::Error, Some(format!("bad portal: {e:#}"))),
        };

        let pdu = match (self.build)(&cfg.target.initiator_name, &cfg.target.target_name) {
            Ok(pdu) => pdu,
            Err(e) => {
                return (
                    TestOutcome::Error,
                    Some(format!("failed to build login PDU: {e}")),
                );
            },
        };
        debug!(id = self.id, pdu = %hex::encode(&pdu), "built login PDU");

        let client = PortalClient::new(host, port)
            .with_connect_timeout(cfg.runtime.timeout_connection)
            .with_io_timeout(cfg.runtime.timeout_io);

        let response = match client.exchange(&pdu) {
            Ok(bytes) => bytes,
            Err(e) => {
                return (
                    TestOutcome::Error,
                    Some(format!("no response from target: {e}")),
                );
            },
        };

        match classify_login_response(&response) {
            LoginVerdict::Rejected => {
                let detail = match LoginResponse::from_bhs_bytes(&response) {
                    Ok(header) => {
                        debug!(
                            tsih = header.tsih,
                            status_class = ?header.status_class,
                            status_detail = header.status_detail,
                            "login response header"
                        );
                        format!(
                            " (status 0x{:02x}/0x{:02x}: {})",
                            u8::from(header.status_class),
                            header.status_detail,
                            header.status_description()
                        )
                    },
                    Err(_) => String::new(),
                };
                (
                    TestOutcome::Pass,
                    Some(format!("target rejected the invalid login{detail}")),
                )
            },
            LoginVerdict::Accepted => (
                TestOutcome::Fail,
                Some("target accepted an invalid login parameter".to_string()),
            ),
            LoginVerdict::ParseError => {
                warn!(
                    id = self.id,
                    bytes = response.len(),
                    "response is not a parseable login response"
                );
                (
                    TestOutcome::Error,
                    Some(format!(
                        "target answered {} bytes that are not a login response",
                        response.len()
                    )),
                )
            },
        }
    }
}

/// Register the three malformed-negotiation cases, in fixed order.
pub fn register_login_cases(registry: &mut Registry) {
    registry.register(Box::new(NegotiationCase {
        id: "TL-101",
        name: "Reject MaxRecvDataSegmentLength=0",
        build: scenarios::invalid_max_recv_data_segment_length,
    }));
    registry.register(Box::new(NegotiationCase {
        id: "TL-102",
        name: "Reject MaxConnections=0",
        build: scenarios::invalid_max_connections,
    }));
    registry.register(Box::new(NegotiationCase {
        id: "TL-103",
        name: "Reject contradictory digest pair",
        build: scenarios::contradictory_digests,
    }));
}
