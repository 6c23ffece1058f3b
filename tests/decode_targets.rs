//! Decoding into declared target shapes
//!
//! Covers the dispatcher's target-directed branches: scalars,
//! sequences, mappings, records, optional fields and the custom-decode
//! capability. Every test decodes real org source through the parser,
//! the way callers use the crate.

use orgbind::decode::{DecodeError, DecodeOrg, Decoder, Slot, Stringifier, Target};
use orgbind::org::Node;
use orgbind::org_record;
use std::collections::BTreeMap;

fn decode_into<T: Target + Default>(source: &str) -> T {
    let mut target = T::default();
    Decoder::new()
        .decode_str(source, "test.org", &mut target)
        .expect("decode failed");
    target
}

#[test]
fn scalar_decodes_to_rendered_text() {
    let text: String = decode_into("Alice\n");
    assert_eq!(text, "Alice");
}

#[test]
fn scalar_with_org_stringifier_keeps_literal_markup() {
    let mut text = String::new();
    Decoder::with_stringifier(Stringifier::Org)
        .decode_str("Alice and *friends*\n", "test.org", &mut text)
        .unwrap();
    assert_eq!(text, "Alice and *friends*");
}

#[test]
fn scalar_with_html_stringifier_expands_markup() {
    let text: String = decode_into("Alice and *friends*\n");
    assert_eq!(text, "Alice and <strong>friends</strong>");
}

#[test]
fn plain_list_decodes_into_a_sequence() {
    let items: Vec<String> = decode_into("- A\n- B\n");
    assert_eq!(items, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn untagged_headlines_decode_into_a_sequence() {
    let items: Vec<String> = decode_into("* one\nalpha\n* two\nbeta\n");
    assert_eq!(items, vec!["alpha".to_string(), "beta".to_string()]);
}

#[test]
fn consecutive_lists_concatenate_their_elements() {
    let items: Vec<String> = decode_into("- A\n\n- B\n");
    assert_eq!(items, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn tagged_headline_decodes_into_a_mapping() {
    let entries: BTreeMap<String, String> = decode_into("* Name :tag:\nAlice\n");
    assert_eq!(
        entries,
        BTreeMap::from([("tag".to_string(), "Alice".to_string())])
    );
}

#[test]
fn descriptive_list_decodes_into_a_mapping() {
    let entries: BTreeMap<String, String> = decode_into("- Name :: Alice\n- Email :: a@b.c\n");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["Name"], "Alice");
    assert_eq!(entries["Email"], "a@b.c");
}

#[test]
fn duplicate_mapping_keys_resolve_last_write_wins() {
    let entries: BTreeMap<String, String> = decode_into("- a :: first\n- a :: second\n");
    assert_eq!(entries["a"], "second");
}

#[test]
fn mapping_values_may_be_sequences() {
    let entries: BTreeMap<String, Vec<String>> =
        decode_into("* Skills :skills:\n- Mathematics\n- Programming\n");
    assert_eq!(
        entries["skills"],
        vec!["Mathematics".to_string(), "Programming".to_string()]
    );
}

org_record! {
    #[derive(Debug, Default, PartialEq)]
    struct Contact {
        name: String,
        email: String,
        phone: Option<String>,
    }
}

#[test]
fn record_fields_fill_from_descriptive_list() {
    let contact: Contact = decode_into("- Name :: Alice\n- Email :: a@b.c\n");
    assert_eq!(contact.name, "Alice");
    assert_eq!(contact.email, "a@b.c");
    assert_eq!(contact.phone, None);
}

#[test]
fn record_key_matching_is_case_insensitive() {
    let contact: Contact = decode_into("- NAME :: Alice\n- E-Mail :: a@b.c\n");
    assert_eq!(contact.name, "Alice");
    assert_eq!(contact.email, "a@b.c");
}

#[test]
fn unknown_record_keys_are_silently_skipped() {
    let contact: Contact = decode_into("- Name :: Alice\n- Hobby :: chess\n");
    assert_eq!(contact.name, "Alice");
    assert_eq!(contact.email, "");
}

#[test]
fn record_with_no_matching_field_decodes_to_defaults() {
    let contact: Contact = decode_into("- Hobby :: chess\n");
    assert_eq!(contact, Contact::default());
}

#[test]
fn optional_field_becomes_some_when_present() {
    let contact: Contact = decode_into("- Phone :: 12345\n");
    assert_eq!(contact.phone, Some("12345".to_string()));
}

org_record! {
    #[derive(Debug, Default, PartialEq)]
    struct Section {
        title: String,
        entries: Vec<String>,
    }
}

#[test]
fn record_fields_may_be_nested_shapes() {
    let section: Section = decode_into("- Title :: Skills\n- Entries ::\n  - one\n  - two\n");
    assert_eq!(section.title, "Skills");
    assert_eq!(section.entries, vec!["one".to_string(), "two".to_string()]);
}

#[test]
fn record_decodes_from_tagged_headlines_too() {
    let contact: Contact = decode_into("* ignored :name:\nAlice\n* ignored :email:\na@b.c\n");
    assert_eq!(contact.name, "Alice");
    assert_eq!(contact.email, "a@b.c");
}

/// A comma-separated scalar that takes over its own decoding.
#[derive(Debug, Default, PartialEq)]
struct Keywords(Vec<String>);

impl Target for Keywords {
    fn slot(&mut self) -> Slot<'_> {
        Slot::Custom(self)
    }
}

impl DecodeOrg for Keywords {
    fn decode_org(&mut self, decoder: &Decoder, nodes: &[Node]) -> Result<(), DecodeError> {
        let mut raw = String::new();
        decoder.decode(nodes, &mut raw)?;
        self.0 = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        Ok(())
    }
}

org_record! {
    #[derive(Debug, Default, PartialEq)]
    struct Post {
        title: String,
        keywords: Keywords,
    }
}

#[test]
fn custom_decode_replaces_generic_dispatch() {
    let keywords: Keywords = decode_into("rust, parsing, decoding\n");
    assert_eq!(
        keywords.0,
        vec![
            "rust".to_string(),
            "parsing".to_string(),
            "decoding".to_string()
        ]
    );
}

#[test]
fn custom_decode_applies_inside_records() {
    let post: Post = decode_into("- Title :: orgbind\n- Keywords :: a, b\n");
    assert_eq!(post.title, "orgbind");
    assert_eq!(post.keywords.0, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn empty_input_leaves_every_target_at_its_default() {
    assert_eq!(decode_into::<String>(""), "");
    assert_eq!(decode_into::<Vec<String>>(""), Vec::<String>::new());
    assert_eq!(
        decode_into::<BTreeMap<String, String>>(""),
        BTreeMap::new()
    );
    assert_eq!(decode_into::<Contact>(""), Contact::default());
}

#[test]
fn whitespace_only_input_is_treated_as_empty() {
    let source = "\n   \n\t\n";
    assert_eq!(decode_into::<Vec<String>>(source), Vec::<String>::new());
    assert_eq!(
        decode_into::<BTreeMap<String, String>>(source),
        BTreeMap::new()
    );
    assert_eq!(decode_into::<Contact>(source), Contact::default());
}
