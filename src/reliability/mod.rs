//! Constants and per-endpoint state machines shared by the client and server reliability
//! layers. The protocol is strictly stop-and-wait: at most one outstanding unacknowledged
//! data packet per destination (see SPEC_FULL.md §4.2).

mod receiver;
mod sender;

pub use receiver::{ReceiveOutcome, ReceiveState};
pub use sender::{PendingSend, SenderState, TickOutcome};

use std::time::Duration;

/// How often the retransmission activity walks the pending-send map.
pub const RETRY_TIMEOUT: Duration = Duration::from_millis(500);

/// Consecutive unacknowledged retransmissions of the same packet before the sender gives up.
pub const MAX_RETRIES: u32 = 5;

/// Upper bound on simultaneously registered clients on the server.
pub const MAX_NUM_CLIENTS: usize = 10;
