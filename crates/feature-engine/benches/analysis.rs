use criterion::{black_box, criterion_group, criterion_main, Criterion};
use feature_engine::Analyzer;
use field_parser::YearMonth;
use listing_model::{fields, RawListing};

fn synthetic_listings(count: usize) -> Vec<RawListing> {
    (0..count)
        .map(|i| {
            let year = 2010 + (i % 14);
            let month = 1 + (i % 12);
            let new_price = 8.0 + (i % 40) as f64;
            let current_price = new_price * (0.3 + (i % 7) as f64 / 10.0);
            RawListing::new(i.to_string())
                .with_field(fields::REGISTRATION_DATE, format!("{}年{:02}月", year, month).as_str())
                .with_field(fields::NEW_PRICE, new_price)
                .with_field(fields::CURRENT_PRICE, current_price)
                .with_field(fields::SAVED_AMOUNT, new_price - current_price)
        })
        .collect()
}

fn bench_analysis(c: &mut Criterion) {
    let listings = synthetic_listings(1_000);
    let analyzer = Analyzer::default();
    let reference = YearMonth { year: 2024, month: 6 };

    c.bench_function("analyze_1000_listings", |b| {
        b.iter(|| analyzer.run(black_box(&listings), reference))
    });
}

criterion_group!(benches, bench_analysis);
criterion_main!(benches);
