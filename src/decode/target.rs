//! Decode targets and their classification
//!
//! The decoder never inspects concrete destination types; every
//! destination classifies itself into exactly one [`Slot`] kind via the
//! [`Target`] trait, and the dispatcher branches on that closed set.
//! Standard shapes come ready-made: `String` is a scalar, `Vec` a
//! sequence, `BTreeMap`/`HashMap` mappings, [`Value`] the
//! dynamically-shaped destination, and the [`org_record!`] macro turns
//! a plain struct into a record with case-insensitive field matching.
//!
//! A type can instead take over its own decoding entirely by
//! classifying as `Slot::Custom` and implementing [`DecodeOrg`]; the
//! dispatcher then hands it the raw node sequence and stays out of the
//! way for that slot and everything below it.

use crate::decode::decoder::{without_blank_nodes, Decoder};
use crate::decode::error::DecodeError;
use crate::decode::value::Value;
use crate::org::ast::Node;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// The closed set of destination shapes the dispatcher knows.
pub enum Slot<'a> {
    Scalar(&'a mut String),
    Sequence(&'a mut dyn Sequence),
    Mapping(&'a mut dyn Mapping),
    Record(&'a mut dyn Record),
    Dynamic(&'a mut Value),
    Custom(&'a mut dyn DecodeOrg),
}

/// A decode destination. Classifies itself into one [`Slot`] kind; the
/// slot is written exactly once by the decode that owns it.
pub trait Target {
    fn slot(&mut self) -> Slot<'_>;
}

/// The capability to decode directly from a node sequence, bypassing
/// generic dispatch for this slot and all its descendants.
pub trait DecodeOrg {
    fn decode_org(&mut self, decoder: &Decoder, nodes: &[Node]) -> Result<(), DecodeError>;
}

/// Sequence-shaped destination: decodes each element's node slice into
/// a fresh element slot and appends it.
pub trait Sequence {
    fn decode_element(&mut self, decoder: &Decoder, nodes: &[Node]) -> Result<(), DecodeError>;
}

/// Mapping-shaped destination: decodes key and value node slices into
/// fresh slots and upserts the entry (later duplicates overwrite).
pub trait Mapping {
    fn decode_entry(
        &mut self,
        decoder: &Decoder,
        key: &[Node],
        value: &[Node],
    ) -> Result<(), DecodeError>;
}

/// Record-shaped destination: routes a rendered key to the matching
/// named field slot. Returns `Ok(false)` when no field matches, which
/// the dispatcher treats as a silent skip.
pub trait Record {
    fn decode_field(
        &mut self,
        decoder: &Decoder,
        key: &str,
        value: &[Node],
    ) -> Result<bool, DecodeError>;
}

impl Target for String {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Scalar(self)
    }
}

impl Target for Value {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Dynamic(self)
    }
}

impl<T: Target + Default> Target for Vec<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Sequence(self)
    }
}

impl<T: Target + Default> Sequence for Vec<T> {
    fn decode_element(&mut self, decoder: &Decoder, nodes: &[Node]) -> Result<(), DecodeError> {
        let mut element = T::default();
        decoder.decode(nodes, &mut element)?;
        self.push(element);
        Ok(())
    }
}

impl<K, V> Target for BTreeMap<K, V>
where
    K: Target + Default + Ord,
    V: Target + Default,
{
    fn slot(&mut self) -> Slot<'_> {
        Slot::Mapping(self)
    }
}

impl<K, V> Mapping for BTreeMap<K, V>
where
    K: Target + Default + Ord,
    V: Target + Default,
{
    fn decode_entry(
        &mut self,
        decoder: &Decoder,
        key: &[Node],
        value: &[Node],
    ) -> Result<(), DecodeError> {
        let mut decoded_key = K::default();
        decoder.decode(key, &mut decoded_key)?;
        let mut decoded_value = V::default();
        decoder.decode(value, &mut decoded_value)?;
        self.insert(decoded_key, decoded_value);
        Ok(())
    }
}

impl<K, V> Target for HashMap<K, V>
where
    K: Target + Default + Eq + Hash,
    V: Target + Default,
{
    fn slot(&mut self) -> Slot<'_> {
        Slot::Mapping(self)
    }
}

impl<K, V> Mapping for HashMap<K, V>
where
    K: Target + Default + Eq + Hash,
    V: Target + Default,
{
    fn decode_entry(
        &mut self,
        decoder: &Decoder,
        key: &[Node],
        value: &[Node],
    ) -> Result<(), DecodeError> {
        let mut decoded_key = K::default();
        decoder.decode(key, &mut decoded_key)?;
        let mut decoded_value = V::default();
        decoder.decode(value, &mut decoded_value)?;
        self.insert(decoded_key, decoded_value);
        Ok(())
    }
}

/// `Option` decodes its inner target and becomes `Some`, except for
/// blank input, which leaves it `None`.
impl<T: Target + Default> Target for Option<T> {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Custom(self)
    }
}

impl<T: Target + Default> DecodeOrg for Option<T> {
    fn decode_org(&mut self, decoder: &Decoder, nodes: &[Node]) -> Result<(), DecodeError> {
        if without_blank_nodes(nodes).is_empty() {
            return Ok(());
        }
        let mut inner = T::default();
        decoder.decode(nodes, &mut inner)?;
        *self = Some(inner);
        Ok(())
    }
}

/// Case-insensitive field matching, ignoring `_`, `-` and spaces, so a
/// document key `FirstName` reaches the field `first_name`.
pub fn field_name_matches(field: &str, key: &str) -> bool {
    fn normalize(name: &str) -> String {
        name.chars()
            .filter(|c| !matches!(*c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect()
    }
    normalize(field) == normalize(key)
}

/// Declare a plain struct that decodes as a record target.
///
/// Each document key is matched against the field names with
/// [`field_name_matches`]; unmatched keys are skipped. The struct body
/// is passed through unchanged, so derives and field types are up to
/// the caller (fields must implement [`Target`]).
///
/// ```ignore
/// org_record! {
///     #[derive(Debug, Default)]
///     pub struct General {
///         pub first_name: String,
///         pub skills: Vec<String>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! org_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_type:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_type,
            )*
        }

        impl $crate::decode::Target for $name {
            fn slot(&mut self) -> $crate::decode::Slot<'_> {
                $crate::decode::Slot::Record(self)
            }
        }

        impl $crate::decode::Record for $name {
            fn decode_field(
                &mut self,
                decoder: &$crate::decode::Decoder,
                key: &str,
                value: &[$crate::org::ast::Node],
            ) -> Result<bool, $crate::decode::DecodeError> {
                $(
                    if $crate::decode::field_name_matches(stringify!($field), key) {
                        decoder.decode(value, &mut self.$field)?;
                        return Ok(true);
                    }
                )*
                let _ = (decoder, value);
                Ok(false)
            }
        }
    };
}
