//! Wire framing: `KIND|SEQ|PAYLOAD|CHECKSUM`, and the `Message` nested inside a data payload.

mod checksum;
mod message;

pub use message::Message;

/// Datagrams larger than this are never sent, and are never accepted on receipt.
pub const MAX_DATAGRAM_LEN: usize = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Data,
    Ack,
    Start,
    End,
}

impl Kind {
    fn as_str(self) -> &'static str {
        match self {
            Kind::Data => "data",
            Kind::Ack => "ack",
            Kind::Start => "start",
            Kind::End => "end",
        }
    }

    fn parse(s: &str) -> Option<Kind> {
        match s {
            "data" => Some(Kind::Data),
            "ack" => Some(Kind::Ack),
            "start" => Some(Kind::Start),
            "end" => Some(Kind::End),
            _ => None,
        }
    }
}

/// A single framed datagram. Constructed on send, parsed on receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub kind: Kind,
    pub seq: u64,
    pub payload: String,
}

impl Packet {
    pub fn new(kind: Kind, seq: u64, payload: impl Into<String>) -> Self {
        Packet {
            kind,
            seq,
            payload: payload.into(),
        }
    }

    pub fn data(seq: u64, payload: impl Into<String>) -> Self {
        Packet::new(Kind::Data, seq, payload)
    }

    pub fn ack(seq: u64) -> Self {
        Packet::new(Kind::Ack, seq, String::new())
    }

    pub fn start(seq: u64) -> Self {
        Packet::new(Kind::Start, seq, String::new())
    }

    pub fn end(seq: u64) -> Self {
        Packet::new(Kind::End, seq, String::new())
    }

    /// Serializes the packet, appending a checksum over `KIND|SEQ|PAYLOAD|`.
    pub fn encode(&self) -> String {
        let body_with_pipe = format!("{}|{}|{}|", self.kind.as_str(), self.seq, self.payload);
        let digest = checksum::digest(body_with_pipe.as_bytes());
        format!("{body_with_pipe}{digest}")
    }

    /// Parses and verifies a datagram. Returns `None` on any framing error or checksum
    /// mismatch — both are silent-discard conditions at the protocol level (see §7).
    pub fn decode(raw: &str) -> Option<Packet> {
        let (body, received_checksum) = raw.rsplit_once('|')?;
        let body_with_pipe = format!("{body}|");
        let expected_checksum = checksum::digest(body_with_pipe.as_bytes());
        if expected_checksum != received_checksum {
            return None;
        }

        let mut fields = body.splitn(3, '|');
        let kind = Kind::parse(fields.next()?)?;
        let seq: u64 = fields.next()?.parse().ok()?;
        let payload = fields.next().unwrap_or("").to_string();

        Some(Packet { kind, seq, payload })
    }

    /// `true` iff the encoded packet fits within one datagram (§4.5, §8 invariant 4).
    pub fn fits_in_datagram(&self) -> bool {
        self.encode().len() <= MAX_DATAGRAM_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let packet = Packet::data(3, "join 1 alice");
        let encoded = packet.encode();
        let decoded = Packet::decode(&encoded).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn payload_may_contain_pipes() {
        let packet = Packet::data(0, "send_message 4 1 all a|b|c");
        let encoded = packet.encode();
        let decoded = Packet::decode(&encoded).unwrap();
        assert_eq!(decoded.payload, "send_message 4 1 all a|b|c");
    }

    #[test]
    fn checksum_mismatch_is_rejected() {
        let mut encoded = Packet::ack(1).encode();
        encoded.push('x');
        assert!(Packet::decode(&encoded).is_none());
    }

    #[test]
    fn non_integer_sequence_is_rejected() {
        // hand-crafted malformed framing (non-numeric seq)
        let raw = "data|not-a-number|hi|deadbeef";
        assert!(Packet::decode(raw).is_none());
    }

    #[test]
    fn ack_seq_is_unaffected_by_empty_payload() {
        let packet = Packet::ack(42);
        let decoded = Packet::decode(&packet.encode()).unwrap();
        assert_eq!(decoded.kind, Kind::Ack);
        assert_eq!(decoded.seq, 42);
        assert_eq!(decoded.payload, "");
    }

    #[test]
    fn oversized_packet_does_not_fit() {
        let packet = Packet::data(0, "x".repeat(MAX_DATAGRAM_LEN));
        assert!(!packet.fits_in_datagram());
    }
}
