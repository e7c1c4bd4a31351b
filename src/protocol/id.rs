//! Content-addressed message IDs

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

use super::{Error, ID_LEN};

/// IDEC message ID
///
/// The first [`ID_LEN`] characters of the standard base64 SHA-256 digest of
/// the canonical bundled message, with `+` replaced by `A` and `/` by `Z`
/// so the ID can sit in a URL path unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct MsgId(String);

impl MsgId {
    /// Get the ID text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the ID text
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Check if `s` has the shape of a message ID
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        s.len() == ID_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}

/// Compute the ID of a canonical bundled message
#[must_use]
pub fn make_msg_id(msg: &str) -> MsgId {
    let digest = Sha256::digest(msg.as_bytes());
    let id = STANDARD
        .encode(digest)
        .chars()
        .take(ID_LEN)
        .map(|c| match c {
            '+' => 'A',
            '/' => 'Z',
            other => other,
        })
        .collect();
    MsgId(id)
}

impl FromStr for MsgId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(invalid_id(s))
        }
    }
}

impl TryFrom<String> for MsgId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&s) {
            Ok(Self(s))
        } else {
            Err(invalid_id(&s))
        }
    }
}

fn invalid_id(s: &str) -> Error {
    Error::Format {
        line: 0,
        reason: format!("{s:?} is not a {ID_LEN}-character message id"),
    }
}

impl From<MsgId> for String {
    fn from(id: MsgId) -> Self {
        id.0
    }
}

impl AsRef<str> for MsgId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MsgId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MsgId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for MsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &str = "ii/ok/repto/tU7J0bzuL2r4DosDkNPO
pipe.2032
1551689766
Difrex
dynamic,1
Difrex
Re: idec

Или даже так:
====
curl -XPOST -H \"X-Idec-Pauth: sdlkdsfjklsdf\" -T /etc/passwd idec.node/x/d/msgid
====
";

    #[test]
    fn test_make_msg_id_known_vector() {
        let id = make_msg_id(BUNDLED);
        assert_eq!(id, "Jc0StQZltt2EoHV9fLee");
    }

    #[test]
    fn test_make_msg_id_deterministic() {
        let a = make_msg_id("ii/ok\nii.test.14\n1\n\n\nAll\nsubj\n\nbody");
        let b = make_msg_id("ii/ok\nii.test.14\n1\n\n\nAll\nsubj\n\nbody");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), ID_LEN);
        assert!(MsgId::is_valid(a.as_str()));
    }

    #[test]
    fn test_msg_id_from_str() {
        let id: MsgId = "EviyYJSFrnubg0DvckW9".parse().unwrap();
        assert_eq!(id.to_string(), "EviyYJSFrnubg0DvckW9");

        assert!("EviyYJSFrnubg0DvckW".parse::<MsgId>().is_err());
        assert!("EviyYJSFrnubg0Dvck/9".parse::<MsgId>().is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every ID is path-safe and fixed length
            #[test]
            fn prop_id_shape(msg in ".{0,512}") {
                let id = make_msg_id(&msg);
                prop_assert_eq!(id.as_str().len(), ID_LEN);
                prop_assert!(!id.as_str().contains(['+', '/', '=']));
                prop_assert_eq!(make_msg_id(&msg), id);
            }
        }
    }
}
