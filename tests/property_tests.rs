//! Property-based tests for the core round-trip guarantee: anything the
//! encoder emits, the decoder reconstructs.

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_csvt::{from_str, to_string};

fn roundtrip<T>(value: &T) -> bool
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug,
{
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
            Err(e) => {
                eprintln!("deserialize failed: {e}");
                eprintln!("serialized was: {serialized}");
                false
            }
        },
        Err(e) => {
            eprintln!("serialize failed: {e}");
            false
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Entry {
    id: u32,
    label: String,
    score: i64,
    ratio: f64,
    active: bool,
    tags: Vec<String>,
    attributes: BTreeMap<String, i64>,
    comment: Option<u32>,
}

fn arb_entry() -> impl Strategy<Value = Entry> {
    (
        any::<u32>(),
        any::<String>(),
        any::<i64>(),
        any::<f64>().prop_filter("finite", |f| f.is_finite()),
        any::<bool>(),
        prop::collection::vec(any::<String>(), 0..4),
        prop::collection::btree_map(any::<String>(), any::<i64>(), 0..4),
        proptest::option::of(any::<u32>()),
    )
        .prop_map(
            |(id, label, score, ratio, active, tags, attributes, comment)| Entry {
                id,
                label,
                score,
                ratio,
                active,
                tags,
                attributes,
                comment,
            },
        )
}

proptest! {
    #[test]
    fn prop_record_of_scalars(entry in arb_entry()) {
        prop_assert!(roundtrip(&entry));
    }

    #[test]
    fn prop_arbitrary_strings_survive(text in any::<String>()) {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Note { text: String }
        let ok = roundtrip(&Note { text });
        prop_assert!(ok);
    }

    #[test]
    fn prop_string_vectors_survive(tags in prop::collection::vec(any::<String>(), 0..6)) {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Tagged { tags: Vec<String> }
        let ok = roundtrip(&Tagged { tags });
        prop_assert!(ok);
    }

    #[test]
    fn prop_maps_survive(attributes in prop::collection::btree_map(any::<String>(), any::<String>(), 0..6)) {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Attributed { attributes: BTreeMap<String, String> }
        let ok = roundtrip(&Attributed { attributes });
        prop_assert!(ok);
    }

    #[test]
    fn prop_sequences_of_distinct_records(entries in prop::collection::vec(arb_entry(), 0..5)) {
        // rows are deduplicated document-wide, so keep the top-level
        // elements distinguishable
        let mut entries = entries;
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.id = i as u32;
        }
        prop_assert!(roundtrip(&entries));
    }

    #[test]
    fn prop_integer_fields(score in any::<i64>(), count in any::<u32>()) {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Counted { score: i64, count: u32 }
        let ok = roundtrip(&Counted { score, count });
        prop_assert!(ok);
    }

    #[test]
    fn prop_finite_floats(ratio in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        #[derive(Serialize, Deserialize, Debug, PartialEq)]
        struct Measured { ratio: f64 }
        let ok = roundtrip(&Measured { ratio });
        prop_assert!(ok);
    }
}
