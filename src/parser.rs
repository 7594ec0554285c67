use core::fmt;

/// Which AT engine a session talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Server,
    Client,
}

impl Mode {
    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "server" => Some(Mode::Server),
            "client" => Some(Mode::Client),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Server => "server",
            Mode::Client => "client",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command line splitter
pub struct CommandParser;

impl CommandParser {
    /// Extract the session mode from an `at <server|client>` line.
    ///
    /// Words after the mode are ignored.
    pub fn parse_mode(input: &str) -> Result<Mode, ParseError> {
        let mut words = input.split_whitespace();
        match words.next() {
            None => return Err(ParseError::EmptyInput),
            Some("at") => {}
            Some(_) => return Err(ParseError::UnknownCommand),
        }
        words
            .next()
            .and_then(Mode::parse)
            .ok_or(ParseError::BadMode)
    }
}

/// Errors that can occur during parsing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParseError {
    EmptyInput,
    UnknownCommand,
    BadMode,
}
