use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgmerge::{Expr, MergeBuilder, Placeholder, merge};

/// Build a MERGE whose USING source is a VALUES list with `n` rows of two params:
/// MERGE INTO t USING (VALUES (?, ?), (?, ?), ...) AS s (id, v) ON ...
fn build_merge(n: usize) -> MergeBuilder {
    let mut values = String::from("(VALUES ");
    let mut source = Vec::with_capacity(n * 2);
    for i in 0..n {
        if i > 0 {
            values.push_str(", ");
        }
        values.push_str("(?, ?)");
        source.push(i as i64);
        source.push((i * 10) as i64);
    }
    values.push_str(") AS s (id, v)");

    merge("t")
        .using(Expr::with_values(values, source))
        .on("s.id = t.id")
        .when_matched("UPDATE SET v = s.v")
        .when_not_matched("INSERT (id, v) VALUES (s.id, s.v)")
        .suffix("RETURNING t.id")
}

fn bench_to_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_builder/to_sql");

    for n in [1, 10, 100, 1000] {
        let question = build_merge(n);
        let dollar = question.placeholder_format(Placeholder::Dollar);
        group.bench_with_input(BenchmarkId::new("question", n), &question, |b, qb| {
            b.iter(|| black_box(qb.to_sql().unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("dollar", n), &dollar, |b, qb| {
            b.iter(|| black_box(qb.to_sql().unwrap()));
        });
    }

    group.finish();
}

fn bench_build_chain(c: &mut Criterion) {
    c.bench_function("merge_builder/build_chain", |b| {
        b.iter(|| {
            let qb = merge("t")
                .prefix(Expr::new("WITH p AS (SELECT ?)").bind(1_i32))
                .using(Expr::new("(SELECT ? AS id) AS s").bind(2_i32))
                .on("s.id = t.id")
                .when_matched(Expr::new("UPDATE SET v = ?").bind(3_i32))
                .when_not_matched("INSERT (id) VALUES (s.id)")
                .output_into("@out", ["inserted.id"]);
            black_box(qb)
        });
    });
}

criterion_group!(benches, bench_to_sql, bench_build_chain);
criterion_main!(benches);
