//! Type-directed decoding of node trees into caller-supplied targets
//!
//! ## Modules
//!
//! - `decoder` - decode session, dispatch, blank filter and kv-pair extractor
//! - `target` - target classification traits and standard impls
//! - `value` - dynamically-shaped decode destination
//! - `error` - decode error taxonomy

pub mod decoder;
pub mod error;
pub mod target;
pub mod value;

pub use decoder::{kv_pairs, without_blank_nodes, Decoder, KvPair, Stringifier};
pub use error::DecodeError;
pub use target::{field_name_matches, DecodeOrg, Mapping, Record, Sequence, Slot, Target};
pub use value::Value;
