use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};
use serde_csvt::{from_str, to_string};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Clone)]
struct Release {
    version: String,
    stable: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct Lang {
    name: String,
    release: Release,
    tags: Vec<String>,
    attributes: BTreeMap<String, String>,
}

fn sample(i: usize) -> Lang {
    let mut attributes = BTreeMap::new();
    attributes.insert("oop".to_string(), "some".to_string());
    attributes.insert("procedural".to_string(), "true".to_string());
    Lang {
        name: format!("lang-{i}"),
        release: Release {
            version: format!("1.{i}.0"),
            stable: i % 2 == 0,
        },
        tags: vec![format!("tag-{i}"), "shared".to_string()],
        attributes,
    }
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    for size in [1usize, 10, 100] {
        let langs: Vec<Lang> = (0..size).map(sample).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &langs, |b, langs| {
            b.iter(|| to_string(black_box(langs)).unwrap());
        });
    }
    group.finish();
}

fn bench_deserialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("deserialize");
    for size in [1usize, 10, 100] {
        let langs: Vec<Lang> = (0..size).map(sample).collect();
        let document = to_string(&langs).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &document, |b, doc| {
            b.iter(|| from_str::<Vec<Lang>>(black_box(doc)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_serialize, bench_deserialize);
criterion_main!(benches);
