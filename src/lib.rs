//! wirechat: a small UDP group-chat system built on a stop-and-wait reliability layer.
//!
//! [`wire`] defines the on-the-wire packet and message framing. [`reliability`] holds the
//! sender- and receiver-half state machines shared by both processes. [`server`] and
//! [`client`] implement the two ends of the protocol. [`cli`] defines the command-line
//! surface for both binaries.

pub mod cli;
pub mod client;
pub mod err;
pub mod reliability;
pub mod server;
pub mod wire;

pub use err::Error;
