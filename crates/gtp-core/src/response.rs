//! GTP response block framing
//!
//! An engine answers each command with zero or more free-form lines followed by
//! a terminal line whose first character is `=` (success) or `?` (failure).

/// First character of a successful terminal line
pub const SUCCESS_MARKER: char = '=';

/// First character of a failed terminal line
pub const FAILURE_MARKER: char = '?';

/// Outcome carried by the terminal line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    Failure,
}

impl ResponseStatus {
    /// Classify a raw line, `None` if it is not a terminal line
    pub fn of_line(line: &str) -> Option<Self> {
        match line.chars().next() {
            Some(SUCCESS_MARKER) => Some(ResponseStatus::Success),
            Some(FAILURE_MARKER) => Some(ResponseStatus::Failure),
            _ => None,
        }
    }
}

/// All lines returned by the engine for one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBlock {
    lines: Vec<String>,
    status: ResponseStatus,
}

impl ResponseBlock {
    /// Build a block from accumulated lines.
    ///
    /// Returns `None` unless the last line, and only the last line, is terminal.
    pub fn from_lines(lines: Vec<String>) -> Option<Self> {
        let (last, body) = lines.split_last()?;
        let status = ResponseStatus::of_line(last)?;
        if body.iter().any(|l| ResponseStatus::of_line(l).is_some()) {
            return None;
        }
        Some(Self { lines, status })
    }

    pub fn status(&self) -> ResponseStatus {
        self.status
    }

    pub fn is_failure(&self) -> bool {
        self.status == ResponseStatus::Failure
    }

    /// Whether the trimmed block begins with the failure marker.
    ///
    /// This is how callers judge an engine reply. It can disagree with
    /// `is_failure` when the engine prints free-form lines before the
    /// terminal line.
    pub fn is_rejection(&self) -> bool {
        self.text().starts_with(FAILURE_MARKER)
    }

    /// Raw lines, terminal line last
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The terminal line as read (line ending removed)
    pub fn terminal_line(&self) -> &str {
        self.lines
            .last()
            .map(|l| l.trim_end_matches(['\r', '\n']))
            .unwrap_or_default()
    }

    /// Terminal line with its marker and surrounding whitespace stripped
    pub fn payload(&self) -> &str {
        self.terminal_line()
            .trim_start_matches([SUCCESS_MARKER, FAILURE_MARKER])
            .trim()
    }

    /// Full accumulated text with leading/trailing whitespace trimmed
    pub fn text(&self) -> String {
        self.lines.concat().trim().to_string()
    }
}
