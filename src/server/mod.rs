//! The server: a single serialized receive loop that verifies checksums, drives the
//! per-endpoint receive state machine, dispatches application commands, and emits acks.

mod commands;
mod registry;

use std::net::{SocketAddr, UdpSocket};

use crate::cli::ServerArgs;
use crate::err::Error;
use crate::wire::{Packet, MAX_DATAGRAM_LEN};

pub use registry::{JoinError, Registry};

pub struct Server {
    socket: UdpSocket,
    registry: Registry,
}

impl Server {
    pub fn bind(args: &ServerArgs) -> Result<Self, Error> {
        let socket = UdpSocket::bind((args.address.as_str(), args.port))?;
        log::info!("server listening on {}:{}", args.address, args.port);
        Ok(Server {
            socket,
            registry: Registry::new(),
        })
    }

    /// Runs the single receive loop until the socket errors (e.g. on shutdown).
    pub fn run(&mut self) -> Result<(), Error> {
        // One byte larger than the datagram budget so a genuinely oversized datagram is
        // observable as `n > MAX_DATAGRAM_LEN` instead of being silently truncated to fit
        // (truncation would also fail the checksum, but this makes the rejection explicit;
        // see SPEC_FULL.md §8 invariant 4).
        let mut buf = [0u8; MAX_DATAGRAM_LEN + 1];
        loop {
            let (n, src) = self.socket.recv_from(&mut buf)?;
            if n > MAX_DATAGRAM_LEN {
                log::warn!("dropping oversized datagram from {src} ({n} bytes)");
                continue;
            }
            let Ok(raw) = std::str::from_utf8(&buf[..n]) else {
                log::debug!("discarding non-utf8 datagram from {src}");
                continue;
            };
            self.handle_datagram(raw, src);
        }
    }

    fn send_packet(&self, to: SocketAddr, packet: Packet) {
        if !packet.fits_in_datagram() {
            log::error!("refusing to send oversized packet to {to}");
            return;
        }
        let encoded = packet.encode();
        if let Err(err) = self.socket.send_to(encoded.as_bytes(), to) {
            log::warn!("failed to send to {to}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_picks_an_ephemeral_port_on_loopback() {
        let args = ServerArgs {
            port: 0,
            address: "127.0.0.1".to_string(),
            window: 3,
        };
        let server = Server::bind(&args).unwrap();
        assert!(server.socket.local_addr().unwrap().port() > 0);
    }
}
