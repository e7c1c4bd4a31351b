//! IDEC blob codec (base64 text envelope)
//!
//! Nodes exchange messages as standard base64 of the UTF-8 message text.
//! Decoding is as forgiving as the nodes producing the blobs: line breaks
//! inside the base64 text are ignored and non-zero trailing bits are
//! accepted. Padding is still required.

use std::borrow::Cow;

use base64::Engine;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use percent_encoding::percent_decode_str;
use tracing::debug;

use super::{DecodeError, Result};

const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Encode message text as a base64 blob
#[must_use]
pub fn encode_blob(text: &str) -> String {
    ENGINE.encode(text)
}

/// Decode a base64 blob into message text
///
/// # Errors
///
/// Returns [`Error::Decode`](super::Error::Decode) if the blob is not valid
/// base64 or does not decode to UTF-8.
pub fn decode_blob(blob: impl AsRef<[u8]>) -> Result<String> {
    let blob = blob.as_ref();

    let compact: Cow<'_, [u8]> = if blob.iter().any(|b| matches!(b, b'\r' | b'\n')) {
        Cow::Owned(
            blob.iter()
                .copied()
                .filter(|b| !matches!(b, b'\r' | b'\n'))
                .collect(),
        )
    } else {
        Cow::Borrowed(blob)
    };

    let bytes = ENGINE.decode(compact).map_err(|err| {
        debug!(error = %err, len = blob.len(), "rejecting blob: bad base64");
        DecodeError::from(err)
    })?;

    let text = String::from_utf8(bytes).map_err(|err| {
        debug!(error = %err, "rejecting blob: not UTF-8");
        DecodeError::from(err)
    })?;

    Ok(text)
}

/// URL-unescape a submitted blob, then decode it
///
/// `+` is kept as is: it is a base64 character, not an escaped space.
pub(crate) fn decode_escaped_blob(blob: &str) -> Result<String> {
    let unescaped: Cow<'_, [u8]> = percent_decode_str(blob).into();
    decode_blob(unescaped)
}
