//! Rendering through the public API.

use pgmerge::{Expr, MergeError, Param, Placeholder, StatementBuilder, merge};
use std::thread;

#[test]
fn upsert_with_prefix_and_suffix() {
    let b = merge("test as t")
        .prefix(Expr::new("WITH prefix AS ?").bind(0_i32))
        .using(Expr::new("(SELECT ? as ID) as s").bind(1_i32))
        .on("s.ID = t.ID")
        .when_matched(Expr::new("UPDATE SET c = ?").bind(2_i32))
        .when_not_matched(Expr::new("INSERT(d) VALUES(?)").bind(3_i32))
        .suffix(Expr::new("RETURNING ?").bind(4_i32));

    let (sql, params) = b.to_sql().unwrap();
    assert_eq!(
        sql,
        "WITH prefix AS ? MERGE INTO test as t USING (SELECT ? as ID) as s ON s.ID = t.ID \
         WHEN MATCHED THEN UPDATE SET c = ? WHEN NOT MATCHED THEN INSERT(d) VALUES(?) RETURNING ?;"
    );
    assert_eq!(format!("{params:?}"), "[0, 1, 2, 3, 4]");
    assert_eq!(params.as_refs().len(), 5);
}

#[test]
fn sql_server_output_into() {
    let (sql, params) = StatementBuilder::new()
        .placeholder_format(Placeholder::AtP)
        .merge("dbo.target AS t")
        .using(Expr::with_params(
            "(VALUES (?, ?)) AS s (id, name)",
            [Param::new(1_i32), Param::new("bob")],
        ))
        .on("s.id = t.id")
        .when_matched("UPDATE SET name = s.name")
        .output_into("@audit", ["inserted.id", "deleted.name"])
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "MERGE INTO dbo.target AS t USING (VALUES (@p1, @p2)) AS s (id, name) ON s.id = t.id \
         WHEN MATCHED THEN UPDATE SET name = s.name OUTPUT inserted.id,deleted.name INTO @audit;"
    );
    assert_eq!(params.len(), 2);
}

#[test]
fn validation_order() {
    for (builder, expected) in [
        (merge(""), "merge statements must specify a target table"),
        (merge("t"), "merge statements must specify a using statement"),
        (merge("t").using("s"), "merge statements must specify an on statement"),
    ] {
        let err = builder.to_sql().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn argument_order_matches_marker_order() {
    let (sql, params) = merge("t")
        .suffix(Expr::new("RETURNING ?").bind(5_i32))
        .when_not_matched(Expr::new("INSERT (v) VALUES (?)").bind(4_i32))
        .when_matched(Expr::new("UPDATE SET v = ?").bind(3_i32))
        .on(Expr::new("s.id = t.id AND t.v <> ?").bind(2_i32))
        .using(Expr::new("(SELECT ? AS id) AS s").bind(1_i32))
        .prefix(Expr::new("WITH p AS (SELECT ?)").bind(0_i32))
        .placeholder_format(Placeholder::Dollar)
        .to_sql()
        .unwrap();

    let positions: Vec<usize> = (1..=6)
        .map(|n| sql.find(&format!("${n}")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(format!("{params:?}"), "[0, 1, 2, 3, 4, 5]");
}

#[test]
fn shared_parent_across_threads() {
    let parent = merge("t").using("src AS s").on("s.id = t.id");

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parent = parent.clone();
            thread::spawn(move || {
                parent
                    .when_matched(Expr::new("UPDATE SET v = ?").bind(i as i32))
                    .to_sql()
                    .unwrap()
                    .0
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            "MERGE INTO t USING src AS s ON s.id = t.id WHEN MATCHED THEN UPDATE SET v = ?;"
        );
    }
    assert_eq!(
        parent.to_sql().unwrap().0,
        "MERGE INTO t USING src AS s ON s.id = t.id;"
    );
}

#[test]
fn jsonb_operators_survive_dollar_rewriting() {
    let (sql, _) = merge("docs AS t")
        .using(Expr::new("(SELECT ?::jsonb AS body) AS s").bind("{}"))
        .on("t.body ?? 'id'")
        .when_matched("UPDATE SET body = s.body")
        .placeholder_format(Placeholder::Dollar)
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "MERGE INTO docs AS t USING (SELECT $1::jsonb AS body) AS s ON t.body ? 'id' \
         WHEN MATCHED THEN UPDATE SET body = s.body;"
    );
}

#[test]
fn unterminated_quote_is_reported() {
    let err = merge("t")
        .using("src AS s")
        .on("s.name = 'x")
        .placeholder_format(Placeholder::Dollar)
        .to_sql()
        .unwrap_err();
    assert!(matches!(err, MergeError::Placeholder(_)));
}
