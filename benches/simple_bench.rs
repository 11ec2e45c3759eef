use criterion::{criterion_group, criterion_main, Criterion};
use seqmatch::{Pattern, Scanner};

/// A small integer pattern with the same shape as the optional/repeat interplay exercised in the
/// library's own scenario tests: a mandatory head, an optional single element, an optional run,
/// and a mandatory run.
fn sample_pattern() -> Pattern<i32> {
    Pattern::build(|p| {
        p.value_eq(1, Default::default())?;
        p.value_eq_opt(2, Default::default())?;
        p.zero_or_more_value_eq(3, Default::default())?;
        p.least_one_value_eq(4, Default::default())?;
        Ok(())
    })
    .unwrap()
}

/// Repeats the scenario-1 input enough times to give the scanner real work to do.
fn long_input(repeats: usize) -> Vec<i32> {
    let mut values = Vec::with_capacity(repeats * 8);
    for _ in 0..repeats {
        values.extend_from_slice(&[1, 2, 3, 4, 4, 4, 4, 9]);
    }
    values
}

fn bench_match_seq(c: &mut Criterion) {
    let pattern = sample_pattern();
    let values = &[1, 2, 3, 4, 4, 4, 4, 9][..];

    c.bench_function("match_seq/single_window", |b| {
        b.iter(|| pattern.match_seq(values));
    });
}

fn bench_scan_iter(c: &mut Criterion) {
    let pattern = sample_pattern();
    let values = long_input(1000);

    c.bench_function("scan_iter/1000_repeats", |b| {
        b.iter(|| {
            let mut scanner = Scanner::new(&values);
            let count = scanner.scan_iter(&pattern).count();
            criterion::black_box(count)
        });
    });
}

criterion_group!(benches, bench_match_seq, bench_scan_iter);
criterion_main!(benches);
