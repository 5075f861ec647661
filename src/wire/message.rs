use std::fmt;

/// The application-level payload carried inside a `data` packet: `CMD VERSION REST`.
///
/// `rest` is free-form and command-specific; it is never itself parsed by this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub cmd: String,
    pub version: u32,
    pub rest: String,
}

impl Message {
    pub fn new(cmd: impl Into<String>, version: u32, rest: impl Into<String>) -> Self {
        Message {
            cmd: cmd.into(),
            version,
            rest: rest.into(),
        }
    }

    /// Parses `"CMD VERSION REST"`; `REST` is optional and defaults to empty.
    pub fn parse(s: &str) -> Option<Message> {
        let mut parts = s.splitn(3, ' ');
        let cmd = parts.next()?.to_string();
        if cmd.is_empty() {
            return None;
        }
        let version: u32 = parts.next()?.parse().ok()?;
        let rest = parts.next().unwrap_or("").to_string();
        Some(Message { cmd, version, rest })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rest.is_empty() {
            write!(f, "{} {}", self.cmd, self.version)
        } else {
            write!(f, "{} {} {}", self.cmd, self.version, self.rest)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_rest() {
        let msg = Message::new("join", 1, "alice");
        let encoded = msg.to_string();
        assert_eq!(encoded, "join 1 alice");
        assert_eq!(Message::parse(&encoded).unwrap(), msg);
    }

    #[test]
    fn round_trips_without_rest() {
        let msg = Message::new("request_users_list", 2, "");
        let encoded = msg.to_string();
        assert_eq!(encoded, "request_users_list 2");
        assert_eq!(Message::parse(&encoded).unwrap(), msg);
    }

    #[test]
    fn rest_may_contain_spaces() {
        let msg = Message::parse("msg 4 alice: Hello Dear Friends!").unwrap();
        assert_eq!(msg.cmd, "msg");
        assert_eq!(msg.version, 4);
        assert_eq!(msg.rest, "alice: Hello Dear Friends!");
    }

    #[test]
    fn rejects_missing_version() {
        assert!(Message::parse("join").is_none());
    }
}
