// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests use property-based testing to verify that value trees survive
//! the codecs and that the settings store honors its defaulting rules for
//! arbitrary inputs.

use proptest::prelude::*;
use std::path::Path;
use treecfg::prelude::*;

// A store that never touches the disk
fn memory_store() -> JsonConfigFile {
    JsonConfigFile::new(JsonCodec::new().with_logger(LogSink::silent()))
}

fn json() -> JsonCodec {
    JsonCodec::new().with_logger(LogSink::silent())
}

fn xml() -> XmlCodec {
    XmlCodec::new().with_logger(LogSink::silent())
}

// Scalars whose tag survives JSON. Unsigned integers small enough for i64 read
// back as signed, so only larger ones are generated.
fn json_scalar() -> BoxedStrategy<Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::from),
        ((i64::MAX as u64 + 1)..=u64::MAX).prop_map(Value::from),
        (-1.0e12f64..1.0e12f64).prop_map(Value::from),
        "\\PC{0,12}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
    .boxed()
}

// Words that XML text inference reads back as strings
fn xml_word() -> impl Strategy<Value = String> {
    "[a-zA-Z]{1,10}".prop_filter("inferred as non-string", |s| {
        !matches!(s.as_str(), "true" | "false" | "inf" | "NaN")
    })
}

fn xml_scalar() -> BoxedStrategy<Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::from),
        ((i64::MAX as u64 + 1)..=u64::MAX).prop_map(Value::from),
        (-1.0e12f64..1.0e12f64).prop_map(Value::from),
        xml_word().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
    .boxed()
}

fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}".prop_filter("reserved for array entries", |k| k != "item")
}

// Objects holding scalars, arrays of scalars, and objects of scalars
fn document(scalar: BoxedStrategy<Value>) -> impl Strategy<Value = Value> {
    let array = prop::collection::vec(scalar.clone(), 1..5).prop_map(Value::from);
    let object = prop::collection::btree_map(key(), scalar.clone(), 1..5).prop_map(Value::from);
    let member = prop_oneof![scalar, array, object];
    prop::collection::btree_map(key(), member, 1..6).prop_map(Value::from)
}

proptest! {
    #[test]
    fn test_json_round_trip(body in document(json_scalar())) {
        let codec = json();
        let back = codec.read(&codec.write(&body).unwrap()).unwrap();
        prop_assert_eq!(back, body);
    }
}

proptest! {
    #[test]
    fn test_json_text_preserves_reals(r in any::<f64>().prop_filter("finite", |r| r.is_finite())) {
        let mut root = Value::Null;
        root["r"] = Value::from(r);

        let codec = json();
        let back = codec.deserialize(&codec.serialize(&root).unwrap()).unwrap();
        prop_assert!(back["r"].is_real());
        prop_assert_eq!(back["r"].get_double().to_bits(), r.to_bits());
    }
}

proptest! {
    #[test]
    fn test_xml_round_trip(body in document(xml_scalar()), name in key()) {
        let mut root = Value::Null;
        root[name.as_str()] = body;

        let codec = xml();
        let text = codec.serialize(&root).unwrap();
        prop_assert_eq!(codec.deserialize(&text).unwrap(), root);
    }
}

proptest! {
    #[test]
    fn test_dump_is_idempotent(body in document(json_scalar())) {
        prop_assert_eq!(body.dump(), body.dump());
    }
}

proptest! {
    #[test]
    fn test_array_of_array_is_rejected(body in document(json_scalar()), name in key()) {
        let mut root = body;
        root[name.as_str()].append(Value::with_type(ValueType::ArrayValues));

        let err = json().write(&root).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Schema);
    }
}

proptest! {
    #[test]
    fn test_absent_keys_return_defaults(
        k in key(),
        int_default in any::<i64>(),
        text_default in "\\PC{0,8}",
    ) {
        let store = memory_store();
        prop_assert_eq!(store.get_int(&k, int_default), int_default);
        prop_assert_eq!(store.get_string(&k, &text_default), text_default);
        prop_assert_eq!(store.filename(), Path::new(""));
    }
}

proptest! {
    #[test]
    fn test_set_property_upserts(k in key(), first in any::<i64>(), second in any::<i64>()) {
        let mut store = memory_store();
        store.set_property(&k, first);
        store.set_property(&k, second);

        prop_assert_eq!(store.get_int(&k, first.wrapping_add(1)), second);
        prop_assert_eq!(store.len(), 1);
    }
}

proptest! {
    #[test]
    fn test_mismatched_tag_returns_default(k in key(), text in "\\PC{0,8}", fallback in any::<i64>()) {
        let mut store = memory_store();
        store.set_property(&k, text.as_str());

        prop_assert_eq!(store.get_int(&k, fallback), fallback);
        prop_assert_eq!(store.get_string(&k, ""), text);
    }
}
