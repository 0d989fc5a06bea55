//! Runs against a live database when `DATABASE_URL` is set (PostgreSQL 15+ for MERGE).

use pgmerge::{Expr, StatementBuilder};
use std::sync::Arc;

async fn try_connect() -> Option<tokio_postgres::Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });
    Some(client)
}

#[tokio::test]
async fn merge_inserts_then_updates() {
    let Some(client) = try_connect().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    client
        .batch_execute(
            "CREATE TEMP TABLE pgmerge_items (id BIGINT PRIMARY KEY, name TEXT NOT NULL)",
        )
        .await
        .unwrap();

    let client = Arc::new(client);
    let stmts = StatementBuilder::postgres().run_with(client.clone());
    let upsert = |id: i64, name: &'static str| {
        stmts
            .merge("pgmerge_items AS t")
            .using(
                Expr::new("(SELECT ?::bigint AS id, ?::text AS name) AS s")
                    .bind(id)
                    .bind(name),
            )
            .on("s.id = t.id")
            .when_matched("UPDATE SET name = s.name")
            .when_not_matched("INSERT (id, name) VALUES (s.id, s.name)")
    };

    assert_eq!(upsert(1, "first").exec().await.unwrap(), 1);
    assert_eq!(upsert(1, "second").exec().await.unwrap(), 1);

    let row = client
        .query_one("SELECT name FROM pgmerge_items WHERE id = 1", &[])
        .await
        .unwrap();
    let name: String = row.get("name");
    assert_eq!(name, "second");
}
