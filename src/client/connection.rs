// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::{
    io::{ErrorKind, Read, Write},
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

use tracing::debug;

use crate::error::ProbeError;

/// Fixed receive buffer, large enough for any login response PDU.
pub const RECV_BUFFER_LEN: usize = 64 * 1024;

/// One-shot blocking exchange with a target portal.
///
/// Each [`PortalClient::exchange`] opens its own TCP connection, writes the
/// whole PDU in one send, performs one read, and closes the socket on every
/// path before returning. Instances share no state, so driving several
/// scenarios concurrently just means constructing several clients.
///
/// Known simplification: exactly one write and one read. A response spanning
/// more than one TCP segment beyond the first read is not reassembled.
#[derive(Debug, Clone)]
pub struct PortalClient {
    host: String,
    port: u16,
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
}

impl PortalClient {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: None,
            io_timeout: None,
        }
    }

    /// Bound the blocking connect. Without this the OS-level timeout applies.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Bound the blocking send and receive. Without this a silent target
    /// stalls the calling thread indefinitely.
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = Some(timeout);
        self
    }

    /// Send `pdu` and return the raw bytes of the first read.
    pub fn exchange(&self, pdu: &[u8]) -> Result<Vec<u8>, ProbeError> {
        let mut stream = self.connect()?;
        stream.set_write_timeout(self.io_timeout)?;
        stream.set_read_timeout(self.io_timeout)?;

        debug!(
            host = %self.host,
            port = self.port,
            bytes = pdu.len(),
            "sending PDU"
        );
        stream.write_all(pdu)?;

        let mut buf = Vec::new();
        buf.try_reserve_exact(RECV_BUFFER_LEN)?;
        buf.resize(RECV_BUFFER_LEN, 0);

        let received = stream.read(&mut buf)?;
        if received == 0 {
            return Err(ProbeError::TransportFailure(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "peer closed the connection before sending a response",
            )));
        }
        buf.truncate(received);
        debug!(bytes = received, "received response");

        Ok(buf)
    }

    fn connect(&self) -> Result<TcpStream, ProbeError> {
        let addrs: Vec<SocketAddr> = (self.host.as_str(), self.port).to_socket_addrs()?.collect();

        let mut last_err: Option<std::io::Error> = None;
        for addr in addrs {
            let attempt = match self.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }

        Err(ProbeError::TransportFailure(last_err.unwrap_or_else(|| {
            std::io::Error::new(
                ErrorKind::NotFound,
                "portal name resolved to no addresses",
            )
        })))
    }
}
