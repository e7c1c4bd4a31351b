//! Point messages (user-submitted, not yet bundled)
//!
//! # Format
//!
//! ```text
//! <echo>
//! <to>
//! <subject>
//!
//! [@repto:<id> | first body line]
//! <body...>
//! ```

use std::fmt;

use tracing::{debug, trace};

use super::codec::{decode_escaped_blob, encode_blob};
use super::{Error, ID_LEN, POINT_MESSAGE_MIN_LINES, REPTO_MARKER, Result, ValidationError};

/// Message as submitted by a point (user station)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointMessage {
    /// Target echo conference
    pub echo: String,
    /// Recipient, usually `"All"`
    pub to: String,
    /// Subject
    pub subg: String,
    /// Separator line, must stay empty
    pub empty_line: String,
    /// ID of the message replied to, empty if none
    pub repto: String,
    /// Message text
    pub body: String,
}

impl PointMessage {
    /// Create a new top-level point message
    pub fn new(
        echo: impl Into<String>,
        to: impl Into<String>,
        subg: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            echo: echo.into(),
            to: to.into(),
            subg: subg.into(),
            empty_line: String::new(),
            repto: String::new(),
            body: body.into(),
        }
    }

    /// Turn into a reply to `repto`
    #[must_use]
    pub fn with_repto(mut self, repto: impl Into<String>) -> Self {
        self.repto = repto.into();
        self
    }

    /// Parse a submitted blob
    ///
    /// The blob is URL-unescaped, then base64-decoded.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The blob cannot be unescaped or decoded
    /// - The text has fewer than six lines
    pub fn parse(blob: &str) -> Result<Self> {
        let text = decode_escaped_blob(blob)?;
        Self::from_text(&text)
    }

    /// Parse already decoded message text
    ///
    /// When line 4 contains the `@repto:` marker anywhere it becomes
    /// `repto` (see [`parse_repto_field`]) and never reaches the body;
    /// otherwise it is the first body line. The body keeps the leading
    /// newline the line join produces.
    pub fn from_text(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() < POINT_MESSAGE_MIN_LINES {
            debug!(lines = lines.len(), "rejecting point message: too short");
            return Err(Error::MalformedMessage {
                needed: POINT_MESSAGE_MIN_LINES,
                got: lines.len(),
            });
        }

        let mut body = String::new();
        for line in &lines[5..] {
            body.push('\n');
            body.push_str(line);
        }

        let (repto, body) = if lines[4].contains(REPTO_MARKER) {
            (parse_repto_field(lines[4]).to_owned(), body)
        } else {
            (String::new(), format!("{}\n{body}", lines[4]))
        };

        let message = Self {
            echo: lines[0].trim_matches(' ').to_owned(),
            to: lines[1].to_owned(),
            subg: lines[2].to_owned(),
            empty_line: lines[3].to_owned(),
            repto,
            body,
        };
        trace!(echo = %message.echo, repto = %message.repto, "parsed point message");

        Ok(message)
    }

    /// Check field invariants, reporting the first violation
    ///
    /// Checked in order: echo, to, subject, separator line, repto length,
    /// body.
    pub fn validate(&self) -> Result<()> {
        self.first_violation().map_or(Ok(()), |violation| {
            debug!(echo = %self.echo, %violation, "point message failed validation");
            Err(Error::Validation(violation))
        })
    }

    fn first_violation(&self) -> Option<ValidationError> {
        if self.echo.is_empty() {
            return Some(ValidationError::EmptyEcho);
        }
        if self.to.is_empty() {
            return Some(ValidationError::EmptyTo);
        }
        if self.subg.is_empty() {
            return Some(ValidationError::EmptySubg);
        }
        if !self.empty_line.is_empty() {
            return Some(ValidationError::NonEmptySeparator);
        }
        let repto_len = self.repto.chars().count();
        if repto_len != 0 && repto_len != ID_LEN {
            return Some(ValidationError::ReptoLength {
                expected: ID_LEN,
                got: repto_len,
            });
        }
        if self.body.is_empty() {
            return Some(ValidationError::EmptyBody);
        }
        None
    }

    /// Base64 of the submission text, ready to be posted to a node
    ///
    /// Line 4 is `@repto:<id>` for a reply. A top-level message keeps its
    /// first body line there when the body has the `<first>\n\n<rest>`
    /// shape unmarked messages parse to; otherwise an empty `@repto:`
    /// marker is written. [`PointMessage::parse`] reads the blob back
    /// unchanged for every body it can produce itself. Any other body
    /// comes back with a leading newline.
    #[must_use]
    pub fn encode(&self) -> String {
        encode_blob(&self.submission_text())
    }

    fn submission_text(&self) -> String {
        let head = format!("{}\n{}\n{}\n", self.echo, self.to, self.subg);

        if self.repto.is_empty() {
            if let Some((first, after)) = self.body.split_once('\n') {
                if let Some(rest) = after.strip_prefix('\n') {
                    if !first.contains(REPTO_MARKER) {
                        return format!("{head}\n{first}\n{rest}");
                    }
                }
            }
        }

        let rest = self.body.strip_prefix('\n').unwrap_or(&self.body);
        format!("{head}\n{REPTO_MARKER}{}\n{rest}", self.repto)
    }
}

/// Strip the `@repto:` marker from a raw line 4
///
/// Only the exact marker prefix is removed, so IDs starting with any of
/// its characters survive intact. A line with text before the marker is
/// returned whole (trimmed) and fails [`PointMessage::validate`] unless it
/// happens to be [`ID_LEN`] characters long.
#[must_use]
pub fn parse_repto_field(field: &str) -> &str {
    let field = field.trim();
    field.strip_prefix(REPTO_MARKER).unwrap_or(field)
}

impl fmt::Display for PointMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}\n{}\n\n{}\n{}",
            self.echo, self.to, self.subg, self.repto, self.body
        )
    }
}
