//! # orgbind
//!
//! Decode org-mode outline documents into typed Rust values.
//!
//! An org document expresses structure with nothing but sections,
//! lists and text, so the same surface syntax can stand for an object,
//! an array or a plain string. orgbind resolves that ambiguity with a
//! type-directed decoder: the destination declares its shape (record,
//! mapping, sequence, scalar) and the decoder matches the tree against
//! it — or, for a dynamically-shaped [`decode::Value`], infers the
//! shape from the tree itself.
//!
//! ```text
//! * General :general:
//! - FirstName :: Ada
//! - Skills :: well, everything
//! ```
//!
//! decodes into a struct declared with [`org_record!`], into a
//! `BTreeMap<String, String>`, or into a [`decode::Value`] map,
//! depending on what the caller hands to [`decode::Decoder`].

pub mod decode;
pub mod org;

pub use decode::{DecodeError, DecodeOrg, Decoder, Slot, Stringifier, Target, Value};
pub use org::{parse, Document, Node, ParseError};
