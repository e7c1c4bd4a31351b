//! Bundled messages (as stored and served by nodes)
//!
//! # Format
//!
//! ```text
//! ii/ok[/repto/<id>]
//! <echo>
//! <unix timestamp>
//! <from>
//! <address>
//! <to>
//! <subject>
//!
//! <body...>
//! ```

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, trace};

use super::codec::{decode_blob, encode_blob};
use super::{
    BUNDLED_BODY_OFFSET, BUNDLED_MESSAGE_MIN_LINES, Error, II_OK, MsgId, PointMessage, Result,
    TAG_PREFIX, Tags, make_msg_id,
};

/// Canonical, network-addressable IDEC message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    /// Tag line
    pub tags: Tags,
    /// Echo conference
    pub echo: String,
    /// Unix time in seconds
    pub timestamp: i64,
    /// Author
    pub from: String,
    /// Originating station
    pub address: String,
    /// Recipient
    pub to: String,
    /// Subject
    pub subg: String,
    /// Message text
    pub body: String,
}

impl Message {
    /// Parse a bundled message blob
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The blob is not valid base64 text
    /// - The text has fewer than seven lines
    /// - The tag line has no `ii/` marker
    /// - The timestamp is not an integer
    pub fn parse(blob: &str) -> Result<Self> {
        let text = decode_blob(blob)?;
        Self::from_text(&text)
    }

    /// Parse already decoded bundled message text
    pub fn from_text(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() < BUNDLED_MESSAGE_MIN_LINES {
            debug!(lines = lines.len(), "rejecting bundled message: too short");
            return Err(Error::MalformedMessage {
                needed: BUNDLED_MESSAGE_MIN_LINES,
                got: lines.len(),
            });
        }

        let tags = Tags::parse(lines[0])?;
        let timestamp = lines[2].parse::<i64>().map_err(|source| {
            debug!(value = lines[2], "rejecting bundled message: bad timestamp");
            Error::Timestamp {
                value: lines[2].to_owned(),
                source,
            }
        })?;

        let body = lines.get(BUNDLED_BODY_OFFSET..).unwrap_or_default().join("\n");

        let message = Self {
            tags,
            echo: lines[1].to_owned(),
            timestamp,
            from: lines[3].to_owned(),
            address: lines[4].to_owned(),
            to: lines[5].to_owned(),
            subg: lines[6].to_owned(),
            body,
        };
        trace!(echo = %message.echo, timestamp, "parsed bundled message");

        Ok(message)
    }

    /// Bundle a point message at `timestamp`
    ///
    /// `from` and `address` are left empty: the node identity is only
    /// known to the transport, which must fill them before sending. The tag
    /// line is parsed back, so a `repto` containing `/` keeps only its
    /// first segment.
    pub fn bundle(point: &PointMessage, timestamp: i64) -> Result<Self> {
        let line = if point.repto.is_empty() {
            format!("{TAG_PREFIX}{II_OK}")
        } else {
            format!("{TAG_PREFIX}{II_OK}/repto/{}", point.repto)
        };
        let tags = Tags::parse(&line)?;

        Ok(Self {
            tags,
            echo: point.echo.clone(),
            timestamp,
            from: String::new(),
            address: String::new(),
            to: point.to.clone(),
            subg: point.subg.clone(),
            body: point.body.clone(),
        })
    }

    /// ID of the message this one replies to, empty if none
    #[must_use]
    pub fn repto(&self) -> &str {
        &self.tags.repto
    }

    /// Base64 of the canonical text
    #[must_use]
    pub fn encode(&self) -> String {
        encode_blob(&self.to_string())
    }

    /// Content-addressed ID of this message
    #[must_use]
    pub fn id(&self) -> MsgId {
        make_msg_id(&self.to_string())
    }
}

/// Bundle a point message stamped with the current time
///
/// See [`Message::bundle`].
pub fn make_bundled_message(point: &PointMessage) -> Result<Message> {
    Message::bundle(point, unix_now())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
        })
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.tags)?;
        writeln!(f, "{}", self.echo)?;
        writeln!(f, "{}", self.timestamp)?;
        writeln!(f, "{}", self.from)?;
        writeln!(f, "{}", self.address)?;
        writeln!(f, "{}", self.to)?;
        writeln!(f, "{}", self.subg)?;
        writeln!(f)?;
        f.write_str(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOB: &str = "aWkvb2svcmVwdG8vdFU3SjBienVMMnI0RG9zRGtOUE8KcGlwZS4yMDMyCjE1NTE2ODk3NjYKRGlmcmV4CmR5bmFtaWMsMQpEaWZyZXgKUmU6IGlkZWMKCtCY0LvQuCDQtNCw0LbQtSDRgtCw0Lo6Cj09PT0KY3VybCAtWFBPU1QgLUggIlgtSWRlYy1QYXV0aDogc2Rsa2RzZmprbHNkZiIgLVQgL2V0Yy9wYXNzd2QgaWRlYy5ub2RlL3gvZC9tc2dpZAo9PT09";

    #[test]
    fn test_parse_message() {
        let msg = Message::parse(BLOB).unwrap();
        assert_eq!(msg.tags, Tags::reply("tU7J0bzuL2r4DosDkNPO"));
        assert_eq!(msg.repto(), "tU7J0bzuL2r4DosDkNPO");
        assert_eq!(msg.echo, "pipe.2032");
        assert_eq!(msg.timestamp, 1_551_689_766);
        assert_eq!(msg.from, "Difrex");
        assert_eq!(msg.address, "dynamic,1");
        assert_eq!(msg.to, "Difrex");
        assert_eq!(msg.subg, "Re: idec");
        assert!(msg.body.starts_with("Или даже так:\n===="));
        assert!(msg.body.ends_with("idec.node/x/d/msgid\n===="));
    }

    #[test]
    fn test_parse_bad_timestamp() {
        let text = "ii/ok\nii.test.14\n\nDifrex\ndynamic,1\nAll\nsubj\n\nbody";
        let result = Message::from_text(text);
        assert!(matches!(result, Err(Error::Timestamp { value, .. }) if value.is_empty()));
    }

    #[test]
    fn test_parse_bad_tags() {
        let text = "ok\nii.test.14\n1\nDifrex\ndynamic,1\nAll\nsubj\n\nbody";
        assert!(matches!(
            Message::from_text(text),
            Err(Error::InvalidTag { .. })
        ));
    }

    #[test]
    fn test_parse_too_short() {
        let result = Message::from_text("ii/ok\nii.test.14\n1");
        assert!(matches!(
            result,
            Err(Error::MalformedMessage { needed: 7, got: 3 })
        ));
    }

    #[test]
    fn test_parse_without_body() {
        let msg = Message::from_text("ii/ok\nii.test.14\n1\nDifrex\ndynamic,1\nAll\nsubj").unwrap();
        assert_eq!(msg.subg, "subj");
        assert_eq!(msg.body, "");
    }

    #[test]
    fn test_display_inverts_parse() {
        let text = "ii/ok/repto/EviyYJSFrnubg0DvckW9\nii.test.14\n1551689766\nDifrex\ndynamic,1\nAll\nRe: test\n\nline one\n\nline three\n";
        let msg = Message::from_text(text).unwrap();
        assert_eq!(msg.to_string(), text);
        assert_eq!(Message::parse(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn test_bundle_point_message() {
        let point = PointMessage::new("ii.test.14", "All", "Test", "\nhello")
            .with_repto("EviyYJSFrnubg0DvckW9");
        let msg = Message::bundle(&point, 1_551_689_766).unwrap();

        assert_eq!(msg.tags.collect().unwrap(), "ii/ok/repto/EviyYJSFrnubg0DvckW9");
        assert_eq!(msg.repto(), point.repto);
        assert_eq!(msg.echo, "ii.test.14");
        assert_eq!(msg.timestamp, 1_551_689_766);
        assert_eq!(msg.from, "");
        assert_eq!(msg.address, "");
        assert_eq!(msg.to, "All");
        assert_eq!(msg.subg, "Test");
        assert_eq!(msg.body, "\nhello");
    }

    #[test]
    fn test_bundle_without_repto() {
        let point = PointMessage::new("ii.test.14", "All", "Test", "hello");
        let msg = Message::bundle(&point, 0).unwrap();
        assert_eq!(msg.tags, Tags::ok());
        assert_eq!(msg.repto(), "");
    }

    #[test]
    fn test_bundle_cuts_repto_at_slash() {
        let point = PointMessage::new("ii.test.14", "All", "Test", "hello").with_repto("a/b");
        let msg = Message::bundle(&point, 0).unwrap();
        assert_eq!(msg.repto(), "a");
        assert_eq!(msg.to_string().lines().next(), Some("ii/ok/repto/a"));
    }

    #[test]
    fn test_make_bundled_message_uses_clock() {
        let point = PointMessage::new("ii.test.14", "All", "Test", "hello");
        let before = unix_now();
        let msg = make_bundled_message(&point).unwrap();
        assert!(msg.timestamp >= before);
        assert!(msg.timestamp <= unix_now());
    }

    #[test]
    fn test_id_is_stable_across_encoding() {
        let msg = Message::parse(BLOB).unwrap();
        let reparsed = Message::parse(&msg.encode()).unwrap();
        assert_eq!(msg.id(), reparsed.id());
    }
}
