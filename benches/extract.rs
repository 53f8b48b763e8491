use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use wtc_scrape::extract::extract_page;
use wtc_scrape::model::Page;
use wtc_scrape::normalize::Normalizer;

const ROUND_PAGE: &str = include_str!("../tests/fixtures/round1.html");

fn page() -> Page {
    Page {
        round: 1,
        body: ROUND_PAGE.as_bytes().to_vec(),
    }
}

fn bench_extract_page(c: &mut Criterion) {
    let page = page();
    c.bench_function("extract_page", |b| {
        b.iter(|| {
            let extract = extract_page(black_box(&page)).unwrap();
            black_box(extract.matches.len());
        })
    });
}

fn bench_normalize_round(c: &mut Criterion) {
    let matches = extract_page(&page()).unwrap().matches;
    c.bench_function("normalize_round", |b| {
        b.iter(|| {
            let mut normalizer = Normalizer::new();
            let mut emitted = 0usize;
            for m in &matches {
                emitted += normalizer.normalize(black_box(m)).len();
            }
            black_box(emitted);
        })
    });
}

criterion_group!(benches, bench_extract_page, bench_normalize_round);
criterion_main!(benches);
