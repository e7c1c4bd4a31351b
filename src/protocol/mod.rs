//! IDEC protocol core implementation
//!
//! This module provides the message types, the text wire format and the
//! content-addressed message IDs.

mod codec;
mod echo;
mod error;
mod id;
mod index;
mod message;
mod point;
mod tags;

pub use codec::{decode_blob, encode_blob};
pub use echo::{Echo, parse_echo_list};
pub use error::{DecodeError, Error, Result, ValidationError};
pub use id::{MsgId, make_msg_id};
pub use index::{IndexEntry, RawMessage, parse_echo_index, parse_message_bundle};
pub use message::{Message, make_bundled_message};
pub use point::{PointMessage, parse_repto_field};
pub use tags::Tags;

/// Length of a message ID in characters
pub const ID_LEN: usize = 20;

/// Only `ii` value accepted on a tag line
pub const II_OK: &str = "ok";

/// Prefix every tag line starts with
pub const TAG_PREFIX: &str = "ii/";

/// Marker introducing the reply target on line 4 of a point message
pub const REPTO_MARKER: &str = "@repto:";

/// Minimum line count of a point message
pub const POINT_MESSAGE_MIN_LINES: usize = 6;

/// Minimum line count of a bundled message (tags through subject)
pub const BUNDLED_MESSAGE_MIN_LINES: usize = 7;

/// Line where the body of a bundled message starts
pub(crate) const BUNDLED_BODY_OFFSET: usize = 8;
