use std::collections::HashMap;
use std::time::Instant;

use super::{MAX_RETRIES, RETRY_TIMEOUT};

/// Client-side bookkeeping for one unacknowledged outbound data packet (§3).
#[derive(Debug, Clone)]
pub struct PendingSend {
    pub bytes: Vec<u8>,
    pub sent_at: Instant,
    pub retries: u32,
}

/// What the retransmission activity should do with one pending record after a `tick`.
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// Resend `bytes` verbatim; the sequence number is unchanged.
    Retransmit { seq: u64, bytes: Vec<u8> },
    /// `seq` has exhausted MAX_RETRIES; the peer must be treated as unresponsive.
    GaveUp { seq: u64 },
}

/// The stop-and-wait sender half: a send-sequence counter plus the pending-send map keyed
/// by sequence number. Shared by every activity that sends reliably on the client, guarded
/// by a single mutex (§5).
#[derive(Debug, Default)]
pub struct SenderState {
    next_seq: u64,
    pending: HashMap<u64, PendingSend>,
}

impl SenderState {
    pub fn new() -> Self {
        SenderState {
            next_seq: 0,
            pending: HashMap::new(),
        }
    }

    /// The sequence number `reserve_seq` would hand out next, without consuming it. Lets a
    /// caller size-check a packet before committing to a sequence number.
    pub fn peek_next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Allocates the next sequence number. The caller stamps it into the packet it is about
    /// to transmit and then calls `file` with the serialized bytes.
    pub fn reserve_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Files a pending-send record for a packet already stamped with `seq` (see
    /// `reserve_seq`).
    pub fn file(&mut self, seq: u64, bytes: Vec<u8>, now: Instant) {
        self.pending.insert(
            seq,
            PendingSend {
                bytes,
                sent_at: now,
                retries: 0,
            },
        );
    }

    /// Clears the pending record matching an incoming ack (an ack carrying `ack_seq` accepts
    /// the data packet `ack_seq - 1`). Returns whether a record was actually cleared.
    pub fn ack(&mut self, ack_seq: u64) -> bool {
        ack_seq
            .checked_sub(1)
            .map(|acked| self.pending.remove(&acked).is_some())
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Walks the pending map. Records idle past RETRY_TIMEOUT are either retransmitted
    /// (retry count bumped, timestamp refreshed) or, having exhausted MAX_RETRIES, removed
    /// and reported as given up.
    pub fn tick(&mut self, now: Instant) -> Vec<TickOutcome> {
        let mut outcomes = Vec::new();
        let mut gave_up = Vec::new();

        for (&seq, record) in self.pending.iter_mut() {
            if now.duration_since(record.sent_at) < RETRY_TIMEOUT {
                continue;
            }

            if record.retries >= MAX_RETRIES {
                gave_up.push(seq);
                outcomes.push(TickOutcome::GaveUp { seq });
                continue;
            }

            record.retries += 1;
            record.sent_at = now;
            outcomes.push(TickOutcome::Retransmit {
                seq,
                bytes: record.bytes.clone(),
            });
        }

        for seq in gave_up {
            self.pending.remove(&seq);
        }

        outcomes
    }
}
