//! Property-based tests for the decoder
//!
//! These pin down the order- and whitespace-insensitivity guarantees:
//! blank nodes never contribute anything, record decoding does not
//! depend on document order, and duplicate mapping keys always resolve
//! to the last occurrence in document order.

use orgbind::decode::{without_blank_nodes, Decoder};
use orgbind::org::{Node, Paragraph, Text};
use orgbind::org_record;
use proptest::prelude::*;
use std::collections::BTreeMap;

org_record! {
    #[derive(Debug, Default, PartialEq)]
    struct Contact {
        name: String,
        email: String,
        phone: String,
    }
}

proptest! {
    #[test]
    fn whitespace_only_sequences_filter_to_nothing(
        contents in prop::collection::vec(r"[ \t]*", 0..8)
    ) {
        let nodes: Vec<Node> = contents
            .into_iter()
            .map(|content| Node::Text(Text { content }))
            .collect();
        prop_assert!(without_blank_nodes(&nodes).is_empty());
    }

    #[test]
    fn empty_paragraphs_filter_to_nothing(count in 0usize..8) {
        let nodes: Vec<Node> = (0..count)
            .map(|_| Node::Paragraph(Paragraph { children: vec![] }))
            .collect();
        prop_assert!(without_blank_nodes(&nodes).is_empty());
    }

    #[test]
    fn record_decoding_is_key_order_independent(
        (name, email, phone, lines) in (r"[a-z]{1,8}", r"[a-z]{1,8}", r"[0-9]{1,8}")
            .prop_flat_map(|(name, email, phone)| {
                let lines = vec![
                    format!("- Name :: {}", name),
                    format!("- Email :: {}", email),
                    format!("- Phone :: {}", phone),
                ];
                (Just(name), Just(email), Just(phone), Just(lines).prop_shuffle())
            })
    ) {
        let source = lines.join("\n") + "\n";
        let mut contact = Contact::default();
        Decoder::new()
            .decode_str(&source, "test.org", &mut contact)
            .expect("decode failed");
        prop_assert_eq!(contact.name, name);
        prop_assert_eq!(contact.email, email);
        prop_assert_eq!(contact.phone, phone);
    }

    #[test]
    fn duplicate_mapping_keys_resolve_to_the_last_occurrence(
        pairs in prop::collection::vec((r"[a-d]", r"[a-z]{1,6}"), 1..12)
    ) {
        let source: String = pairs
            .iter()
            .map(|(key, value)| format!("- {} :: {}\n", key, value))
            .collect();
        let mut decoded = BTreeMap::<String, String>::new();
        Decoder::new()
            .decode_str(&source, "test.org", &mut decoded)
            .expect("decode failed");

        let mut expected = BTreeMap::new();
        for (key, value) in &pairs {
            expected.insert(key.clone(), value.clone());
        }
        prop_assert_eq!(decoded, expected);
    }
}
