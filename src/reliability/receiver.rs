/// Per-endpoint receive-side sequence state (§3, §4.2). `last_in_order` starts at `-1` so
/// that the first data packet (sequence `0`) is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveState {
    last_in_order: i64,
}

/// The result of feeding one data packet's sequence number through a `ReceiveState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiveOutcome {
    /// Whether the packet was in order and should be dispatched to the command layer.
    pub dispatch: bool,
    /// The sequence number the resulting ack must carry, regardless of `dispatch`.
    pub ack_seq: u64,
}

impl Default for ReceiveState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiveState {
    pub fn new() -> Self {
        ReceiveState { last_in_order: -1 }
    }

    /// Seeds `last_in_order` from a `start` packet's sequence number.
    pub fn seeded(seq: u64) -> Self {
        ReceiveState {
            last_in_order: seq as i64,
        }
    }

    /// Feeds a data packet's sequence number through the state machine. Advances
    /// `last_in_order` iff the packet is in order; always returns the ack sequence to send.
    pub fn on_data(&mut self, seq: u64) -> ReceiveOutcome {
        let expected = self.last_in_order + 1;
        if seq as i64 == expected {
            self.last_in_order = expected;
            ReceiveOutcome {
                dispatch: true,
                ack_seq: (self.last_in_order + 1) as u64,
            }
        } else {
            ReceiveOutcome {
                dispatch: false,
                ack_seq: expected as u64,
            }
        }
    }

    /// Seeds `last_in_order` from a `start` packet, returning the ack sequence to send.
    pub fn on_start(&mut self, seq: u64) -> u64 {
        self.last_in_order = seq as i64;
        (self.last_in_order + 1) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_packet_in_order_dispatches() {
        let mut state = ReceiveState::new();
        let outcome = state.on_data(0);
        assert!(outcome.dispatch);
        assert_eq!(outcome.ack_seq, 1);
    }

    #[test]
    fn out_of_order_packet_is_acked_but_not_dispatched() {
        let mut state = ReceiveState::new();
        let outcome = state.on_data(1);
        assert!(!outcome.dispatch);
        assert_eq!(outcome.ack_seq, 0);
    }

    #[test]
    fn duplicate_of_accepted_packet_is_not_redispatched() {
        let mut state = ReceiveState::new();
        assert!(state.on_data(0).dispatch);
        let outcome = state.on_data(0);
        assert!(!outcome.dispatch);
        assert_eq!(outcome.ack_seq, 1);
    }

    #[test]
    fn in_order_sequence_advances_correctly() {
        let mut state = ReceiveState::new();
        assert!(state.on_data(0).dispatch);
        assert!(state.on_data(1).dispatch);
        let outcome = state.on_data(2);
        assert!(outcome.dispatch);
        assert_eq!(outcome.ack_seq, 3);
    }

    #[test]
    fn start_packet_seeds_last_in_order() {
        let mut state = ReceiveState::new();
        let ack_seq = state.on_start(9);
        assert_eq!(ack_seq, 10);
        assert!(state.on_data(10).dispatch);
    }
}
