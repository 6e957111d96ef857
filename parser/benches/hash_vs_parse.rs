//! Hashing a doc comment must be cheaper than parsing it, or the annotation
//! cache buys nothing but memory.
//!
//! Run with: `cargo bench --package anno`

use anno_parser::{parse_annotations, AnnotationCache};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sha2::{Digest, Sha256};

const SHORT: &str = "/**\n * @Column\n */";

const MEDIUM: &str = "/**\n * @Id\n * @Column(name = id)\n */";

const LONG: &str = r#"/**
 * Model class.
 *
 * @author Jane Doe <jane@example.com>
 * @package anno\test
 *
 * @Entity(table = models)
 * @NoCrud
 * @Index(
 *   columns = [ name, created_at ],
 *   unique = false
 * )
 * @Menu {"label": "Models", "order": 3}
 */"#;

const COMMENTS: [(&str, &str); 3] = [("short", SHORT), ("medium", MEDIUM), ("long", LONG)];

fn bench_hash_vs_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_vs_parse");

    for (name, comment) in COMMENTS {
        group.throughput(Throughput::Bytes(comment.len() as u64));
        group.bench_with_input(BenchmarkId::new("sha256", name), comment, |b, s| {
            b.iter(|| Sha256::digest(black_box(s).as_bytes()))
        });
        group.bench_with_input(BenchmarkId::new("parse", name), comment, |b, s| {
            b.iter(|| parse_annotations(black_box(s)))
        });
    }

    group.finish();
}

fn bench_cache(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache");

    for (name, comment) in COMMENTS {
        let cache = AnnotationCache::new();
        cache.get_text(comment);
        group.bench_with_input(BenchmarkId::new("hit", name), comment, |b, s| {
            b.iter(|| cache.get_text(black_box(s)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hash_vs_parse, bench_cache);
criterion_main!(benches);
