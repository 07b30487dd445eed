//! Classification of the single line the server sends back.

use std::fmt;

pub(crate) const HANDSHAKE_GREETING: &str = "HELO";
pub(crate) const END_COMMAND: &str = "END";

/// One response line, already stripped of its line terminator.
///
/// Keywords are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `ACK` – the command was accepted.
    Ack,
    /// `ERR` – the command was refused.
    Err,
    /// `REDY` – handshake accepted. Only meaningful as the `HELO` reply.
    Ready,
    /// Anything else, kept verbatim.
    Other(String),
}

impl Response {
    /// Classify `line`. Only trailing `\r`/`\n` are ignored; any other
    /// whitespace makes the line unrecognized.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.eq_ignore_ascii_case("ACK") {
            Response::Ack
        } else if line.eq_ignore_ascii_case("ERR") {
            Response::Err
        } else if line.eq_ignore_ascii_case("REDY") {
            Response::Ready
        } else {
            Response::Other(line.to_string())
        }
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, Response::Ack)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ack => f.write_str("ACK"),
            Response::Err => f.write_str("ERR"),
            Response::Ready => f.write_str("REDY"),
            Response::Other(line) => f.write_str(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(Response::parse("ACK"), Response::Ack);
        assert_eq!(Response::parse("ack"), Response::Ack);
        assert_eq!(Response::parse("Err"), Response::Err);
        assert_eq!(Response::parse("redy"), Response::Ready);
    }

    #[test]
    fn unknown_lines_are_kept_verbatim() {
        assert_eq!(Response::parse("NOPE"), Response::Other("NOPE".into()));
        assert_eq!(Response::parse(""), Response::Other(String::new()));
        assert_eq!(Response::parse("NOPE").to_string(), "NOPE");
    }

    #[test]
    fn padded_keywords_are_not_recognized() {
        assert_eq!(Response::parse(" REDY "), Response::Other(" REDY ".into()));
        assert_eq!(Response::parse("ACK "), Response::Other("ACK ".into()));
        assert_eq!(Response::parse("ACK\r\n"), Response::Ack);
    }

    #[test]
    fn only_ack_is_success() {
        assert!(Response::Ack.is_ack());
        assert!(!Response::Err.is_ack());
        assert!(!Response::Ready.is_ack());
        assert!(!Response::Other("ACKNOWLEDGED".into()).is_ack());
    }
}
