use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use arep_properties::{Property, PropertyDraft, PropertyFilter, PropertyId};
use rust_decimal::Decimal;

fn listings(count: usize) -> Vec<Property> {
    let streets = ["Main St", "Oak Ave", "Pine Rd", "Harbor Blvd"];
    (0..count)
        .map(|i| {
            let fields = PropertyDraft {
                address: Some(format!("{} {}", i + 1, streets[i % streets.len()])),
                price: Some(Decimal::from(50_000 + (i as i64 % 400) * 1_000)),
                size: Some(1 + (i as i32 % 8)),
                description: None,
            }
            .validate()
            .expect("bench listing is valid");
            Property::new(PropertyId::new(i as i64 + 1), fields)
        })
        .collect()
}

fn bench_filter_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_evaluation");

    let unconstrained = PropertyFilter::default();
    let combined = PropertyFilter {
        address: Some("main".to_string()),
        min_price: Some(Decimal::from(100_000)),
        max_price: Some(Decimal::from(200_000)),
        min_size: Some(2),
        max_size: None,
    };

    for count in [100usize, 1_000, 10_000].iter() {
        let data = listings(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("unconstrained", count), &data, |b, data| {
            b.iter(|| data.iter().filter(|p| unconstrained.matches(black_box(p))).count())
        });

        group.bench_with_input(BenchmarkId::new("combined", count), &data, |b, data| {
            b.iter(|| {
                let constraints = combined.constraints();
                data.iter()
                    .filter(|p| constraints.iter().all(|c| c.matches(black_box(p))))
                    .count()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter_evaluation);
criterion_main!(benches);
