use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_csvt::{
    from_str, to_string, to_string_with_options, DecodeOptions, EncodeOptions, Error,
};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Release {
    version: String,
    stable: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
struct Lang {
    name: String,
    release: Release,
    tags: Vec<String>,
    attributes: HashMap<String, String>,
}

fn go() -> Lang {
    let mut attributes = HashMap::new();
    attributes.insert("oop".to_string(), "some".to_string());
    attributes.insert("procedural".to_string(), "true".to_string());
    attributes.insert("functional".to_string(), "false".to_string());
    Lang {
        name: "Go".to_string(),
        release: Release {
            version: "1.25.3".to_string(),
            stable: true,
        },
        tags: vec!["go".to_string(), "golang".to_string()],
        attributes,
    }
}

fn zig() -> Lang {
    let mut attributes = HashMap::new();
    attributes.insert("oop".to_string(), "false".to_string());
    attributes.insert("procedural".to_string(), "true".to_string());
    attributes.insert("functional".to_string(), "false".to_string());
    Lang {
        name: "Zig".to_string(),
        release: Release {
            version: "0.16.0-dev.747+493ad58ff".to_string(),
            stable: false,
        },
        tags: vec!["zig".to_string(), "ziglang".to_string()],
        attributes,
    }
}

#[test]
fn lang_document_has_four_tables() {
    let output = to_string(&vec![go(), zig()]).unwrap();

    assert!(output.contains("/** Lang&"));
    assert!(output.contains("/// Release&"));
    assert!(output.contains("/// common-array"));
    assert!(output.contains("/// common-map"));
    assert_eq!(output.matches("/** ").count(), 1);
    assert_eq!(output.matches("/// ").count(), 3);

    assert!(output.contains("H-> name;release;tags;attributes"));
    assert!(output.contains("H-> version;stable"));
}

#[test]
fn lang_rows_reference_their_composites() {
    let output = to_string(&vec![go(), zig()]).unwrap();

    // one pointer per record into each composite table, no inlined bodies
    assert_eq!(output.matches("$Release&").count(), 2);
    assert_eq!(output.matches("$common-array_").count(), 2);
    assert_eq!(output.matches("$common-map_").count(), 2);
    assert!(output.contains("\"Go\";$"));
    assert!(output.contains("\"Zig\";$"));
}

#[test]
fn lang_round_trip() {
    let langs = vec![go(), zig()];
    let output = to_string(&langs).unwrap();
    let back: Vec<Lang> = from_str(&output).unwrap();
    assert_eq!(back, langs);
}

#[test]
fn shared_substructures_collapse_to_one_row() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Host {
        name: String,
        release: Release,
    }

    let release = Release {
        version: "1.0.0".to_string(),
        stable: true,
    };
    let hosts = vec![
        Host {
            name: "a".to_string(),
            release: release.clone(),
        },
        Host {
            name: "b".to_string(),
            release: release.clone(),
        },
    ];

    let output = to_string(&hosts).unwrap();
    assert_eq!(output.matches("\"1.0.0\";true:").count(), 1);

    let pointers: Vec<&str> = output
        .match_indices("$Release&")
        .map(|(i, _)| {
            let rest = &output[i..];
            &rest[..rest.find([';', ':']).unwrap()]
        })
        .collect();
    assert_eq!(pointers.len(), 2);
    assert_eq!(pointers[0], pointers[1]);

    let back: Vec<Host> = from_str(&output).unwrap();
    assert_eq!(back, hosts);
}

#[test]
fn distinct_empty_sequences_share_the_canonical_row() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Tagged {
        name: String,
        tags: Vec<String>,
    }

    let values = vec![
        Tagged {
            name: "a".to_string(),
            tags: Vec::new(),
        },
        Tagged {
            name: "b".to_string(),
            tags: Vec::new(),
        },
    ];
    let output = to_string(&values).unwrap();

    assert!(output.contains("0-> |"));
    assert_eq!(output.matches("$common-array_0").count(), 2);

    let back: Vec<Tagged> = from_str(&output).unwrap();
    assert_eq!(back, values);
}

#[test]
fn three_rows_get_three_consecutive_pointers() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Item {
        label: String,
        parts: Vec<i64>,
    }

    let items = vec![
        Item {
            label: "x".to_string(),
            parts: vec![1],
        },
        Item {
            label: "y".to_string(),
            parts: vec![2],
        },
        Item {
            label: "z".to_string(),
            parts: vec![3],
        },
    ];
    let output = to_string(&items).unwrap();

    // canonical empty row takes index 0
    assert!(output.contains("$common-array_1"));
    assert!(output.contains("$common-array_2"));
    assert!(output.contains("$common-array_3"));
}

#[test]
fn separator_heavy_strings_survive() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Note {
        text: String,
    }

    for text in [
        "a;b",
        "a,b",
        "a=b",
        "a|b",
        "a^b",
        "a:b",
        "line\nbreak",
        "carriage\rreturn",
        "tab\there",
        "back\\slash",
        "quote\"inside",
        "$looks-like-a-pointer_0",
        "",
    ] {
        let note = Note {
            text: text.to_string(),
        };
        let output = to_string(&note).unwrap();
        let back: Note = from_str(&output).unwrap();
        assert_eq!(back, note, "string {text:?} did not survive");
    }
}

#[test]
fn quoted_cell_text_follows_the_escape_rules() {
    #[derive(Serialize)]
    struct Note {
        text: String,
    }

    let note = Note {
        text: "hello;\"world\"\n".to_string(),
    };
    let output = to_string(&note).unwrap();
    assert!(output.contains("0-> \"hello;\\\"world\\\"\\n\":"));
}

#[test]
fn renamed_fields_become_renamed_columns() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Pkg {
        #[serde(rename = "Version")]
        version: String,
        name: String,
    }

    let pkg = Pkg {
        version: "0.1.0".to_string(),
        name: "csvt".to_string(),
    };
    let output = to_string(&pkg).unwrap();

    assert!(output.contains("H-> Version;name"));
    let back: Pkg = from_str(&output).unwrap();
    assert_eq!(back, pkg);
}

#[test]
fn optional_fields_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Pkg {
        name: String,
        homepage: Option<String>,
        downloads: Option<u32>,
    }

    let with = Pkg {
        name: "a".to_string(),
        homepage: Some("https://example.org".to_string()),
        downloads: Some(7),
    };
    let without = Pkg {
        name: "b".to_string(),
        homepage: None,
        downloads: None,
    };

    let output = to_string(&vec![with, without]).unwrap();
    let back: Vec<Pkg> = from_str(&output).unwrap();
    assert_eq!(back[0].homepage.as_deref(), Some("https://example.org"));
    assert_eq!(back[0].downloads, Some(7));
    assert_eq!(back[1].homepage, None);
    assert_eq!(back[1].downloads, None);
}

#[test]
fn unit_enum_variants_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Status {
        Active,
        Retired,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Project {
        name: String,
        status: Status,
    }

    let projects = vec![
        Project {
            name: "a".to_string(),
            status: Status::Active,
        },
        Project {
            name: "b".to_string(),
            status: Status::Retired,
        },
    ];
    let output = to_string(&projects).unwrap();
    let back: Vec<Project> = from_str(&output).unwrap();
    assert_eq!(back, projects);
}

#[test]
fn nested_sequences_and_maps_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Matrix {
        rows: Vec<Vec<i64>>,
        lookup: BTreeMap<i64, String>,
        pair: (i64, bool),
    }

    let mut lookup = BTreeMap::new();
    lookup.insert(1, "one".to_string());
    lookup.insert(2, "two".to_string());

    let matrix = Matrix {
        rows: vec![vec![1, 2], vec![3], Vec::new()],
        lookup,
        pair: (9, true),
    };

    let output = to_string(&matrix).unwrap();
    let back: Matrix = from_str(&output).unwrap();
    assert_eq!(back, matrix);
}

#[test]
fn maps_with_record_values_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
    struct Registry {
        releases: BTreeMap<String, Release>,
    }

    let mut releases = BTreeMap::new();
    releases.insert(
        "go".to_string(),
        Release {
            version: "1.25.3".to_string(),
            stable: true,
        },
    );
    releases.insert(
        "zig".to_string(),
        Release {
            version: "0.16.0".to_string(),
            stable: false,
        },
    );

    let registry = Registry { releases };
    let output = to_string(&registry).unwrap();
    let back: Registry = from_str(&output).unwrap();
    assert_eq!(back, registry);
}

#[test]
fn compact_off_still_round_trips() {
    let langs = vec![go(), zig()];
    let output =
        to_string_with_options(&langs, EncodeOptions::new().with_compact(false)).unwrap();
    let back: Vec<Lang> = from_str(&output).unwrap();
    assert_eq!(back, langs);
}

#[test]
fn namespace_option_round_trips() {
    let lang = go();
    let output =
        to_string_with_options(&lang, EncodeOptions::new().with_namespace("models")).unwrap();
    let back: Lang = from_str(&output).unwrap();
    assert_eq!(back, lang);
}

#[test]
fn strict_decoding_accepts_complete_documents() {
    let output = to_string(&go()).unwrap();
    let back: Lang =
        serde_csvt::from_str_with_options(&output, DecodeOptions::new().with_strict(true)).unwrap();
    assert_eq!(back, go());
}

#[test]
fn self_referential_types_round_trip() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Chain {
        id: u32,
        next: Option<Box<Chain>>,
    }

    let chain = Chain {
        id: 1,
        next: Some(Box::new(Chain {
            id: 2,
            next: Some(Box::new(Chain { id: 3, next: None })),
        })),
    };

    let output = to_string(&chain).unwrap();

    // nested links of the same type are committed before their parent, so
    // the top-level value holds the table's last row
    let deserializer = serde_csvt::Deserializer::from_str(&output).unwrap();
    let back: Chain = deserializer.value_at(2).unwrap();
    assert_eq!(back, chain);

    let tail: Chain = deserializer.value_at(0).unwrap();
    assert_eq!(tail, Chain { id: 3, next: None });
}

#[test]
fn runaway_nesting_is_reported_as_cyclic() {
    #[derive(Serialize)]
    struct Chain {
        next: Option<Box<Chain>>,
    }

    let mut chain = Chain { next: None };
    for _ in 0..300 {
        chain = Chain {
            next: Some(Box::new(chain)),
        };
    }

    assert!(matches!(to_string(&chain), Err(Error::CyclicGraph)));
}

#[test]
fn top_level_maps_are_rejected() {
    let mut map = HashMap::new();
    map.insert("a".to_string(), 1);
    assert!(matches!(to_string(&map), Err(Error::InvalidRoot)));
}

#[test]
fn non_finite_floats_are_rejected() {
    #[derive(Serialize)]
    struct Sample {
        value: f64,
    }

    let sample = Sample {
        value: f64::INFINITY,
    };
    assert!(matches!(to_string(&sample), Err(Error::UnsupportedKind(_))));
}
