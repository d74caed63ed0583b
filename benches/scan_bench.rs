// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use leakhound::discovery::reconstruct;
use leakhound::{Chunker, Classifier, ContentKind, FilterContext, ResultSet, ScanConfig};

fn bundle() -> String {
    let line = concat!(
        r#"axios.get("/api/user/info",{headers:{Authorization:"Bearer x"}});"#,
        r#"var conf={password:"s3cretPass",host:"10.20.30.40:8080"};"#,
        r#"fetch("https://api.example.com/v1/items");mail="ops@example.com";"#,
    );
    line.repeat(2_000)
}

fn chunking_benchmark(c: &mut Criterion) {
    let text = bundle().replace(';', ";\n");
    let chunker = Chunker::new(100_000);

    c.bench_function("chunk_bundle", |b| {
        b.iter(|| black_box(chunker.chunks(&text).count()))
    });
}

fn classifier_benchmark(c: &mut Criterion) {
    let text = bundle();
    let classifier = Classifier::new(&ScanConfig::default());
    let ctx = FilterContext::new("https://www.example.com/static/js/app.js", Some("www.example.com"));

    c.bench_function("classify_bundle", |b| {
        b.iter(|| {
            let mut out = ResultSet::new();
            black_box(classifier.scan(&text, ContentKind::Resource, &ctx, &mut out))
        })
    });

    c.bench_function("classify_bundle_cooperative", |b| {
        b.iter(|| {
            let mut out = ResultSet::new();
            tokio_test::block_on(classifier.scan_cooperative(
                &text,
                ContentKind::Resource,
                &ctx,
                &mut out,
            ))
        })
    });
}

fn webpack_benchmark(c: &mut Criterion) {
    let runtime = r#"return a.p+"static/js/"+({}[e]||e)+"."+{0:"3f2a9c1b",1:"77aa01ce",2:"9b8c7d6e",3:"0a1b2c3d"}[e]+".chunk.js""#
        .repeat(50);

    c.bench_function("reconstruct_chunks", |b| {
        b.iter(|| black_box(reconstruct(&runtime).len()))
    });
}

criterion_group!(benches, chunking_benchmark, classifier_benchmark, webpack_benchmark);
criterion_main!(benches);
