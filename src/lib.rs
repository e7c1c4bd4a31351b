//! IDEC - message model and wire-format codec for the IDEC echo network
//!
//! IDEC nodes exchange plain-text messages over HTTP. Each message is a
//! fixed sequence of newline-delimited fields, shipped as base64 and
//! addressed by a content hash that every node must reproduce exactly.
//! This crate parses, validates, composes and addresses those messages;
//! fetching and posting them is left to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use idec::{Message, PointMessage};
//!
//! // Encode what a point submits; the node parses it back unchanged
//! let draft = PointMessage::new("ii.test.14", "All", "Hello", "\nFirst post");
//! let point = PointMessage::parse(&draft.encode())?;
//! assert_eq!(point, draft);
//! point.validate()?;
//!
//! // Bundle it at a given time; the transport fills `from` and `address`
//! let mut msg = Message::bundle(&point, 1_551_689_766)?;
//! msg.from = "Difrex".into();
//! msg.address = "dynamic,1".into();
//!
//! // Its ID is what replies put in `@repto:`
//! let id = msg.id();
//! assert_eq!(id.as_str().len(), idec::ID_LEN);
//! # Ok::<(), idec::Error>(())
//! ```
//!
//! # Features
//!
//! - **Point messages** - parsing, validation and canonical text
//! - **Bundled messages** - parsing, composing and re-encoding
//! - **Message IDs** - SHA-256 content addressing
//! - **Node listings** - echo lists, echo indexes and message bundles

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;

pub use protocol::{
    DecodeError, Echo, Error, ID_LEN, IndexEntry, Message, MsgId, PointMessage, REPTO_MARKER,
    RawMessage, Result, Tags, ValidationError, make_bundled_message, make_msg_id,
    parse_echo_index, parse_echo_list, parse_message_bundle, parse_repto_field,
};

/// IDEC protocol revision implemented
pub const VERSION: &str = "ii/ok";
