use criterion::{black_box, criterion_group, criterion_main, Criterion};

use mailcache::{build_patch, domain::record::from_listing, CustomFlags, Flag, Flags, SyncRecord};

fn record(id: usize, flags: Flags) -> SyncRecord {
    SyncRecord::new(format!("msg-{id}"), flags, CustomFlags::default()).unwrap()
}

fn bench_build_patch(c: &mut Criterion) {
    // 10k cached records; live side drops the first thousand, changes
    // the flags of the second thousand and appends a fresh thousand
    let cached = from_listing((0..10_000).map(|id| record(id, Flags::default())));
    let live = from_listing((1_000..11_000).map(|id| {
        if id < 2_000 {
            record(id, Flags::from(Flag::Seen))
        } else {
            record(id, Flags::default())
        }
    }));

    c.bench_function("build patch over 10k records", |b| {
        b.iter(|| build_patch(black_box(&cached), black_box(&live)))
    });
}

criterion_group!(benches, bench_build_patch);
criterion_main!(benches);
