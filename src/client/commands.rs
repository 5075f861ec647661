//! Parses one line of user input into the command it names (§4.4).

/// A single parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msg { recipients: Vec<String>, text: String },
    List,
    Help,
    Quit,
    /// Anything that doesn't match a recognized form; surfaces as
    /// "incorrect userinput format" (§7, *Application*).
    Unrecognized,
}

pub const HELP_TEXT: &str = "\
Available commands:
  msg <user1,user2,...> <message>  send a message to one or more users ('all' broadcasts)
  list                             list all connected users
  help                             show this message
  quit                             disconnect and exit";

impl Command {
    pub fn parse(line: &str) -> Command {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("list") {
            Command::List
        } else if trimmed.eq_ignore_ascii_case("help") {
            Command::Help
        } else if trimmed.eq_ignore_ascii_case("quit") {
            Command::Quit
        } else if let Some(rest) = trimmed.strip_prefix("msg") {
            Command::parse_msg(rest)
        } else {
            Command::Unrecognized
        }
    }

    fn parse_msg(rest: &str) -> Command {
        let rest = rest.trim_start();
        let Some((user_list, text)) = rest.split_once(' ') else {
            return Command::Unrecognized;
        };
        let text = text.trim();
        if user_list.is_empty() || text.is_empty() {
            return Command::Unrecognized;
        }

        let recipients: Vec<String> = user_list.split(',').map(str::to_string).collect();
        if recipients.iter().any(|r| r.is_empty()) {
            return Command::Unrecognized;
        }

        Command::Msg {
            recipients,
            text: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_msg_with_single_recipient() {
        let cmd = Command::parse("msg alice Hello there");
        assert_eq!(
            cmd,
            Command::Msg {
                recipients: vec!["alice".to_string()],
                text: "Hello there".to_string(),
            }
        );
    }

    #[test]
    fn parses_msg_with_multiple_recipients() {
        let cmd = Command::parse("msg alice,bob,carol Hello Dear Friends!");
        assert_eq!(
            cmd,
            Command::Msg {
                recipients: vec!["alice".to_string(), "bob".to_string(), "carol".to_string()],
                text: "Hello Dear Friends!".to_string(),
            }
        );
    }

    #[test]
    fn parses_broadcast_recipient() {
        let cmd = Command::parse("msg all Hello Dear Friends!");
        assert_eq!(
            cmd,
            Command::Msg {
                recipients: vec!["all".to_string()],
                text: "Hello Dear Friends!".to_string(),
            }
        );
    }

    #[test]
    fn recognizes_list_help_quit_case_insensitively() {
        assert_eq!(Command::parse("LIST"), Command::List);
        assert_eq!(Command::parse("Help"), Command::Help);
        assert_eq!(Command::parse("QUIT"), Command::Quit);
    }

    #[test]
    fn malformed_msg_is_unrecognized() {
        assert_eq!(Command::parse("msg"), Command::Unrecognized);
        assert_eq!(Command::parse("msg alice"), Command::Unrecognized);
        assert_eq!(Command::parse("msg ,bob hello"), Command::Unrecognized);
    }

    #[test]
    fn unknown_command_is_unrecognized() {
        assert_eq!(Command::parse("quitt"), Command::Unrecognized);
        assert_eq!(Command::parse(""), Command::Unrecognized);
    }
}
