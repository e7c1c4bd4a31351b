//! Node index responses
//!
//! Before fetching messages the transport asks a node which IDs an echo
//! holds (`u/e/<echo>...`) and then fetches them in bulk
//! (`u/m/<id>/<id>...`). Both answers are plain text:
//!
//! ```text
//! u/e:  <echo>            u/m:  <id>:<base64 blob>
//!       <id>                    <id>:<base64 blob>
//!       <id>                    ...
//!       <echo>
//!       <id>
//! ```

use tracing::{debug, trace};

use super::codec::decode_blob;
use super::{Error, Message, MsgId, Result, make_msg_id};

/// Message ID listed under an echo
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexEntry {
    /// Echo the message belongs to
    pub echo: String,
    /// Message ID
    pub id: MsgId,
}

/// Bundled message blob served under its ID
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMessage {
    /// ID the node served the blob under
    pub id: MsgId,
    /// Base64 bundled message
    pub blob: String,
}

impl RawMessage {
    /// Parse the blob
    pub fn parse(&self) -> Result<Message> {
        Message::parse(&self.blob)
    }

    /// Parse the blob and check that its content hashes to `id`
    ///
    /// # Errors
    ///
    /// Returns [`Error::IdMismatch`] if the content does not match the ID,
    /// or any error [`Message::parse`] returns.
    pub fn verify(&self) -> Result<Message> {
        let text = decode_blob(&self.blob)?;
        let found = make_msg_id(&text);
        if found != self.id {
            debug!(expected = %self.id, %found, "served message does not match its id");
            return Err(Error::IdMismatch {
                expected: self.id.to_string(),
                found: found.into_string(),
            });
        }
        Message::from_text(&text)
    }
}

/// Parse an echo index (`u/e` response)
///
/// A line containing `.` names an echo; every other non-empty line is a
/// message ID of the most recent echo.
///
/// # Errors
///
/// Returns [`Error::Format`] for an ID before any echo line or a line that
/// is neither an echo name nor a message ID.
pub fn parse_echo_index(text: &str) -> Result<Vec<IndexEntry>> {
    let mut entries = Vec::new();
    let mut echo: Option<&str> = None;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.contains('.') {
            echo = Some(line);
            continue;
        }

        let Some(current) = echo else {
            return Err(format_error(line_no, format!("id {line:?} before any echo")));
        };
        let id = line
            .parse::<MsgId>()
            .map_err(|_| format_error(line_no, format!("{line:?} is not a message id")))?;

        entries.push(IndexEntry {
            echo: current.to_owned(),
            id,
        });
    }

    trace!(entries = entries.len(), "parsed echo index");
    Ok(entries)
}

/// Parse a message bundle (`u/m` response)
///
/// # Errors
///
/// Returns [`Error::Format`] for a non-empty line that is not
/// `<id>:<blob>`.
pub fn parse_message_bundle(text: &str) -> Result<Vec<RawMessage>> {
    let mut messages = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((id, blob)) = line.split_once(':') else {
            return Err(format_error(line_no, "missing ':' separator".to_owned()));
        };
        let id = id
            .parse::<MsgId>()
            .map_err(|_| format_error(line_no, format!("{id:?} is not a message id")))?;

        messages.push(RawMessage {
            id,
            blob: blob.to_owned(),
        });
    }

    trace!(messages = messages.len(), "parsed message bundle");
    Ok(messages)
}

fn format_error(line: usize, reason: String) -> Error {
    debug!(line, %reason, "rejecting node index");
    Error::Format { line, reason }
}
