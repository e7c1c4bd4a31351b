//! IDEC tag line (`ii/ok[/repto/<id>]`)

use std::fmt;
use std::str::FromStr;

use super::{Error, II_OK, Result, TAG_PREFIX};

/// Parsed tag line of a bundled message
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tags {
    /// Protocol marker, `"ok"` on every valid message
    pub ii: String,
    /// ID of the message this one replies to, empty if none
    pub repto: String,
}

impl Tags {
    /// Tags of a top-level message
    #[must_use]
    pub fn ok() -> Self {
        Self {
            ii: II_OK.to_owned(),
            repto: String::new(),
        }
    }

    /// Tags of a reply to `repto`
    #[must_use]
    pub fn reply(repto: impl Into<String>) -> Self {
        Self {
            ii: II_OK.to_owned(),
            repto: repto.into(),
        }
    }

    /// Render the tag line
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTag`] unless `ii` is `"ok"`.
    pub fn collect(&self) -> Result<String> {
        if self.ii != II_OK {
            return Err(Error::InvalidTag {
                tags: format!("{TAG_PREFIX}{}", self.ii),
            });
        }

        if self.repto.is_empty() {
            Ok(format!("{TAG_PREFIX}{II_OK}"))
        } else {
            Ok(format!("{TAG_PREFIX}{II_OK}/repto/{}", self.repto))
        }
    }

    /// Parse a tag line
    ///
    /// The second segment is `ii`; a fourth segment, if present, is the
    /// reply target. The third segment is not checked, so any
    /// four-segment line carries a `repto`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTag`] if the line has no `ii/` marker.
    pub fn parse(line: &str) -> Result<Self> {
        if !line.contains(TAG_PREFIX) {
            return Err(Error::InvalidTag {
                tags: line.to_owned(),
            });
        }

        let segments: Vec<&str> = line.split('/').collect();
        let ii = segments.get(1).copied().unwrap_or_default();
        let repto = segments.get(3).copied().unwrap_or_default();

        Ok(Self {
            ii: ii.to_owned(),
            repto: repto.to_owned(),
        })
    }

    /// Check if the tag line marks a reply
    #[must_use]
    pub fn is_reply(&self) -> bool {
        !self.repto.is_empty()
    }
}

impl FromStr for Tags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repto.is_empty() {
            write!(f, "{TAG_PREFIX}{}", self.ii)
        } else {
            write!(f, "{TAG_PREFIX}{}/repto/{}", self.ii, self.repto)
        }
    }
}
