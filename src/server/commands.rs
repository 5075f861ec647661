use std::net::SocketAddr;

use super::{JoinError, Server};
use crate::wire::{Kind, Message, Packet};

impl Server {
    pub(super) fn handle_datagram(&mut self, raw: &str, src: SocketAddr) {
        let Some(packet) = Packet::decode(raw) else {
            log::debug!("discarding malformed or corrupt packet from {src}");
            return;
        };

        match packet.kind {
            Kind::Data => self.handle_data(src, packet.seq, &packet.payload),
            Kind::Start => {
                let ack_seq = self.registry.recv_state_mut(src).on_start(packet.seq);
                self.send_ack(src, ack_seq);
            }
            Kind::End => {
                self.registry.forget(&src);
            }
            Kind::Ack => {
                // The server never retransmits (§4.3), so it never expects an ack back.
            }
        }
    }

    fn handle_data(&mut self, src: SocketAddr, seq: u64, payload: &str) {
        let outcome = self.registry.recv_state_mut(src).on_data(seq);

        if outcome.dispatch {
            match Message::parse(payload) {
                Some(message) => self.dispatch(src, message),
                None => self.reply_unknown_message(src),
            }
        }

        self.send_ack(src, outcome.ack_seq);
    }

    fn dispatch(&mut self, src: SocketAddr, message: Message) {
        match message.cmd.as_str() {
            "join" => self.handle_join(src, message.rest),
            "request_users_list" => self.handle_request_users_list(src),
            "send_message" => self.handle_send_message(src, &message.rest),
            "disconnect" => self.handle_disconnect(src, message.rest),
            _ => self.reply_unknown_message(src),
        }
    }

    fn handle_join(&mut self, src: SocketAddr, username: String) {
        match self.registry.join(src, username.clone()) {
            Ok(()) => log::info!("join: {username}"),
            Err(JoinError::ServerFull) => {
                log::info!("join refused for {username}: server full");
                self.send_data(src, Message::new("ERR_SERVER_FULL", 2, ""));
            }
            Err(JoinError::UsernameUnavailable) => {
                log::info!("join refused for {username}: username unavailable");
                self.send_data(src, Message::new("ERR_USERNAME_UNAVAILABLE", 2, ""));
            }
        }
    }

    fn handle_request_users_list(&mut self, src: SocketAddr) {
        let Some(username) = self.registry.username(&src).cloned() else {
            log::warn!("request_users_list from unregistered endpoint {src}");
            return;
        };
        let users = self.registry.sorted_usernames().join(", ");
        self.send_data(src, Message::new("RESPONSE_USERS_LIST", 3, users));
        log::info!("request_users_list: {username}");
    }

    fn handle_send_message(&mut self, src: SocketAddr, rest: &str) {
        let sender = self
            .registry
            .username(&src)
            .cloned()
            .unwrap_or_else(|| "Unknown".to_string());

        let mut tokens = rest.split_whitespace();
        let Some(count) = tokens.next().and_then(|s| s.parse::<usize>().ok()) else {
            return;
        };
        let remaining: Vec<&str> = tokens.collect();
        if remaining.len() < count {
            return;
        }
        let recipients = &remaining[..count];
        let text = remaining[count..].join(" ");
        let forwarded = Message::new("msg", 4, format!("{sender}: {text}"));

        if recipients.len() == 1 && recipients[0] == "all" {
            log::info!("msg: {sender} -> all");
            for addr in self.registry.broadcast_targets(&src) {
                self.send_data(addr, forwarded.clone());
            }
        } else {
            log::info!("msg: {sender} -> {}", recipients.join(", "));
            for &name in recipients {
                let addrs = self.registry.addrs_for_username(name);
                if addrs.is_empty() {
                    log::info!("msg: {sender} to non-existent user {name}");
                } else {
                    for addr in addrs {
                        self.send_data(addr, forwarded.clone());
                    }
                }
            }
        }
    }

    fn handle_disconnect(&mut self, src: SocketAddr, username: String) {
        if self.registry.disconnect(&src).is_some() {
            log::info!("disconnected: {username}");
        } else {
            log::info!("disconnect attempt from unregistered user: {username}");
        }
    }

    fn reply_unknown_message(&mut self, src: SocketAddr) {
        self.send_data(src, Message::new("ERR_UNKNOWN_MESSAGE", 2, ""));
        if self.registry.disconnect(&src).is_some() {
            log::info!("disconnected: server received an unknown message");
        }
    }

    /// Server-originated data packets are always sent with sequence number 0 (§4.3); the
    /// server relies on the client's own retransmission to recover a lost reply.
    fn send_data(&mut self, to: SocketAddr, message: Message) {
        self.send_packet(to, Packet::data(0, message.to_string()));
    }

    fn send_ack(&mut self, to: SocketAddr, ack_seq: u64) {
        self.send_packet(to, Packet::ack(ack_seq));
    }
}
