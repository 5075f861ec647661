//! The client: joins a server and runs three concurrent activities on a shared stop-and-wait
//! sender -- a user command loop, a receive loop, and a retransmission timer (§5).

mod commands;

use std::io::BufRead;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use crate::cli::ClientArgs;
use crate::err::Error;
use crate::reliability::{ReceiveState, SenderState, TickOutcome, RETRY_TIMEOUT};
use crate::wire::{Kind, Message, Packet, MAX_DATAGRAM_LEN};

pub use commands::{Command, HELP_TEXT};

/// Invoked with every user-visible line the client would otherwise print to standard output
/// (§6, "Embedding callback").
pub type MessageCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// The default callback: print to standard output, as a standalone terminal client would.
pub fn stdout_callback() -> MessageCallback {
    Arc::new(|line: &str| println!("{line}"))
}

/// State shared by the three concurrent activities (§5). `sender` and `recv_state` are each
/// guarded by their own mutex since they're touched independently.
struct Shared {
    socket: UdpSocket,
    server_addr: SocketAddr,
    sender: Mutex<SenderState>,
    recv_state: Mutex<ReceiveState>,
    active: AtomicBool,
    on_message: MessageCallback,
}

impl Shared {
    fn show(&self, line: impl AsRef<str>) {
        (self.on_message)(line.as_ref());
    }

    /// Allocates a sequence number, files the encoded packet as pending, and transmits it.
    ///
    /// The size check happens against the *would-be* sequence number, before it is reserved:
    /// a sequence number is only ever consumed for a packet that actually gets sent, since the
    /// protocol's gapless per-endpoint sequencing (§4.2) has no way to skip one back in.
    fn send_reliable(&self, message: Message) {
        let mut sender = self.sender.lock().unwrap();
        let candidate_seq = sender.peek_next_seq();
        let candidate = Packet::data(candidate_seq, message.to_string()).encode();
        if candidate.len() > MAX_DATAGRAM_LEN {
            log::error!("refusing to send oversized packet ({} bytes)", candidate.len());
            return;
        }
        let seq = sender.reserve_seq();
        debug_assert_eq!(seq, candidate_seq);
        sender.file(seq, candidate.clone().into_bytes(), Instant::now());
        drop(sender);
        if let Err(err) = self.socket.send_to(candidate.as_bytes(), self.server_addr) {
            log::warn!("failed to send to server: {err}");
        }
    }

    fn send_ack(&self, ack_seq: u64) {
        let encoded = Packet::ack(ack_seq).encode();
        if let Err(err) = self.socket.send_to(encoded.as_bytes(), self.server_addr) {
            log::warn!("failed to ack server: {err}");
        }
    }
}

/// A joined chat client. Owns the ephemeral UDP endpoint and the state shared by its three
/// concurrent activities.
pub struct Client {
    shared: Arc<Shared>,
    username: String,
}

impl Client {
    /// Binds an ephemeral local endpoint and resolves the server address. Does not join yet;
    /// call `run` to do that.
    pub fn bind(
        args: &ClientArgs,
        username: String,
        on_message: MessageCallback,
    ) -> Result<Self, Error> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        // Bounds how long the receive loop can block, so it can notice `active` cleared
        // (e.g. by a liveness failure in the retransmission loop) and exit instead of
        // waiting forever on a peer that will never send again.
        socket.set_read_timeout(Some(RETRY_TIMEOUT))?;
        let server_addr = (args.address.as_str(), args.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                Error::UnresolvedServerAddress(format!("{}:{}", args.address, args.port))
            })?;

        log::info!(
            "client bound to {}, joining {server_addr} as {username}",
            socket.local_addr()?
        );

        Ok(Client {
            shared: Arc::new(Shared {
                socket,
                server_addr,
                sender: Mutex::new(SenderState::new()),
                recv_state: Mutex::new(ReceiveState::new()),
                active: AtomicBool::new(true),
                on_message,
            }),
            username,
        })
    }

    /// Sends the initial `join`, spawns the receive and retransmission activities, then runs
    /// the command loop on the calling thread until `quit` or a liveness failure.
    pub fn run(self) -> Result<(), Error> {
        self.shared
            .send_reliable(Message::new("join", 1, self.username.clone()));

        let receive_handle = {
            let shared = self.shared.clone();
            thread::spawn(move || receive_loop(shared))
        };
        let retransmission_handle = {
            let shared = self.shared.clone();
            thread::spawn(move || retransmission_loop(shared))
        };

        self.command_loop();

        // `active` is now cleared (by `quit` or a liveness failure). The receive loop's read
        // timeout bounds how long it takes to notice and exit; the retransmission loop wakes
        // on its own schedule and observes the same flag. Once both join, the socket's last
        // `Arc` reference drops here and the endpoint closes.
        drop(self.shared);
        receive_handle.join().ok();
        retransmission_handle.join().ok();
        Ok(())
    }

    fn command_loop(&self) {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            if !self.shared.active.load(Ordering::Acquire) {
                break;
            }
            let Ok(line) = line else { break };

            match Command::parse(&line) {
                Command::Msg { recipients, text } => {
                    let rest = format!("{} {} {}", recipients.len(), recipients.join(" "), text);
                    self.shared
                        .send_reliable(Message::new("send_message", 4, rest));
                }
                Command::List => {
                    self.shared
                        .send_reliable(Message::new("request_users_list", 2, ""));
                }
                Command::Help => self.shared.show(HELP_TEXT),
                Command::Quit => {
                    self.shared.send_reliable(Message::new(
                        "disconnect",
                        1,
                        self.username.clone(),
                    ));
                    self.shared.active.store(false, Ordering::Release);
                    self.shared.show("quitting");
                }
                Command::Unrecognized => self.shared.show("incorrect userinput format"),
            }

            if !self.shared.active.load(Ordering::Acquire) {
                break;
            }
        }
    }
}

fn receive_loop(shared: Arc<Shared>) {
    let mut buf = [0u8; MAX_DATAGRAM_LEN];
    while shared.active.load(Ordering::Acquire) {
        let n = match shared.socket.recv_from(&mut buf) {
            Ok((n, _)) => n,
            Err(err)
                if err.kind() == std::io::ErrorKind::WouldBlock
                    || err.kind() == std::io::ErrorKind::TimedOut =>
            {
                // Read timeout: loop back around to re-check `active`.
                continue;
            }
            Err(err) => {
                log::warn!("receive loop socket error: {err}");
                break;
            }
        };
        let Ok(raw) = std::str::from_utf8(&buf[..n]) else {
            continue;
        };
        let Some(packet) = Packet::decode(raw) else {
            continue;
        };

        match packet.kind {
            Kind::Ack => {
                shared.sender.lock().unwrap().ack(packet.seq);
            }
            Kind::Data => {
                let outcome = shared.recv_state.lock().unwrap().on_data(packet.seq);
                shared.send_ack(outcome.ack_seq);
                if outcome.dispatch {
                    handle_data(&shared, &packet.payload);
                }
            }
            Kind::Start | Kind::End => {}
        }
    }
}

fn handle_data(shared: &Shared, payload: &str) {
    let Some(message) = Message::parse(payload) else {
        shared.show("ERROR: received incorrectly formatted message.");
        return;
    };

    if let Some(reason) = disconnect_reason(&message.cmd) {
        shared.show(format!("disconnected: {reason}"));
        shared.active.store(false, Ordering::Release);
        return;
    }

    if message.cmd == "RESPONSE_USERS_LIST" {
        shared.show(format!("list: {}", message.rest.replace(", ", " ")));
    } else {
        shared.show(format!("msg: {}", message.rest));
    }
}

fn disconnect_reason(cmd: &str) -> Option<&'static str> {
    match cmd {
        "ERR_SERVER_FULL" => Some("server full"),
        "ERR_USERNAME_UNAVAILABLE" => Some("username not available"),
        "ERR_UNKNOWN_MESSAGE" => Some("server received an unknown message"),
        _ => None,
    }
}

fn retransmission_loop(shared: Arc<Shared>) {
    while shared.active.load(Ordering::Acquire) {
        thread::sleep(RETRY_TIMEOUT);
        if !shared.active.load(Ordering::Acquire) {
            break;
        }

        let outcomes = shared.sender.lock().unwrap().tick(Instant::now());
        for outcome in outcomes {
            match outcome {
                TickOutcome::Retransmit { seq, bytes } => {
                    log::debug!("timeout for packet {seq}, retrying");
                    if let Err(err) = shared.socket.send_to(&bytes, shared.server_addr) {
                        log::warn!("retransmit to server failed: {err}");
                    }
                }
                TickOutcome::GaveUp { seq } => {
                    log::warn!("giving up on packet {seq}, peer unresponsive");
                    shared.show("Server not responding. Disconnecting.");
                    shared.active.store(false, Ordering::Release);
                }
            }
        }
    }
}
