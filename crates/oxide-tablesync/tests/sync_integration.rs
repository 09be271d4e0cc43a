//! End-to-end reconciliation tests.
//!
//! Rules are loaded from JSON files the way the CLI loads them and applied
//! to a file-backed SQLite database, or rendered against an empty catalog.

use std::fs;

use oxide_tablesync::prelude::*;
use tempfile::TempDir;

const RULES_JSON: &str = r#"[
    {
        "Namespace": "listings",
        "OutputFields": ["url", "title", "city", "price"],
        "OutputConstaints": {
            "url": {"Sql": "varchar(512) NOT NULL", "UniqueIndex": "UNIQUE_INDEX"},
            "city": {"Index": "idx_city_price"},
            "price": {"Sql": "INT NOT NULL DEFAULT 0", "Index": "idx_city_price,INDEX"}
        }
    },
    {
        "namespace": "sellers",
        "output_fields": ["name"],
        "output_constraints": {
            "name": {"sql": "varchar(64) NOT NULL primary key"}
        }
    }
]"#;

fn write_rules(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("rules.json");
    fs::write(&path, json).expect("Failed to write rule file");
    path
}

async fn open_db(dir: &TempDir) -> SqliteDatabase {
    let url = format!("sqlite:{}", dir.path().join("crawl.sqlite3").display());
    SqliteDatabase::connect(&url)
        .await
        .expect("Failed to open SQLite database")
}

#[tokio::test]
async fn test_rule_file_creates_schema() {
    let dir = TempDir::new().unwrap();
    let rules = SchemaRule::load(write_rules(&dir, RULES_JSON)).unwrap();
    assert_eq!(rules.len(), 2);

    let db = open_db(&dir).await;
    let report = Synchronizer::new(&db, &db).migrate_all(&rules).await;
    assert!(report.is_ok(), "{:?}", report.errors);

    for column in ["url", "title", "city", "price", "id", "created_at"] {
        assert!(db.has_column("listings", column).await.unwrap(), "{column}");
    }
    assert!(db.has_index("listings", "idx_city_price").await.unwrap());
    assert!(db.has_index("listings", "idx_listings_price").await.unwrap());
    assert!(db.has_index("listings", "uix_listings_url").await.unwrap());

    // The declared primary key joins the injected id.
    assert!(db.has_column("sellers", "name").await.unwrap());
    assert!(db.has_column("sellers", "id").await.unwrap());
    assert!(db.has_column("sellers", "created_at").await.unwrap());

    let pk: Vec<(String,)> =
        sqlx::query_as("SELECT name FROM pragma_table_info('sellers') WHERE pk > 0 ORDER BY pk")
            .fetch_all(db.pool())
            .await
            .unwrap();
    let pk: Vec<&str> = pk.iter().map(|(name,)| name.as_str()).collect();
    assert_eq!(pk, vec!["name", "id"]);

    // Only a sole INTEGER key is a rowid alias, so the composite key's id
    // must be supplied on SQLite.
    sqlx::query("INSERT INTO sellers (id, name) VALUES (1, 'acme')")
        .execute(db.pool())
        .await
        .unwrap();
    let missing_id = sqlx::query("INSERT INTO sellers (name) VALUES ('globex')")
        .execute(db.pool())
        .await;
    assert!(missing_id.is_err());

    let (count,): (i64,) = sqlx::query_as("SELECT count(*) FROM sellers")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_second_run_after_reopen_is_noop() {
    let dir = TempDir::new().unwrap();
    let rules = SchemaRule::load(write_rules(&dir, RULES_JSON)).unwrap();

    {
        let db = open_db(&dir).await;
        let report = Synchronizer::new(&db, &db).migrate_all(&rules).await;
        assert!(report.is_ok(), "{:?}", report.errors);
        db.pool().close().await;
    }

    let db = open_db(&dir).await;
    let report = Synchronizer::new(&db, &db).migrate_all(&rules).await;
    assert!(report.is_noop(), "{:?}", report.applied);
    assert!(report.is_ok());
}

#[tokio::test]
async fn test_widened_rule_adds_columns_only() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir).await;

    let v1 = SchemaRule::new("pages").fields(["url"]);
    let report = Synchronizer::new(&db, &db).migrate(&v1).await;
    assert!(report.created_table());

    let v2 = SchemaRule::new("pages")
        .fields(["url", "lang"])
        .constraint("lang", ColumnConstraint::varchar(8, Some("en")).index("INDEX"));
    let changes = Synchronizer::new(&db, &db)
        .migrate(&v2)
        .await
        .into_result()
        .unwrap();

    let lines: Vec<String> = changes.iter().map(ToString::to_string).collect();
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert!(matches!(
        &changes[0],
        Applied::AddColumn { table, column, .. } if table == "pages" && column == "lang"
    ));
    assert!(matches!(
        &changes[1],
        Applied::CreateIndex { name, unique: false, .. } if name == "idx_pages_lang"
    ));

    sqlx::query("INSERT INTO pages (url) VALUES ('https://example.org')")
        .execute(db.pool())
        .await
        .unwrap();
    let (lang,): (String,) = sqlx::query_as("SELECT lang FROM pages")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(lang, "en");
}

#[tokio::test]
async fn test_dry_run_leaves_database_untouched() {
    let dir = TempDir::new().unwrap();
    let rules = SchemaRule::load(write_rules(&dir, RULES_JSON)).unwrap();
    let db = open_db(&dir).await;

    let recorder = SqlRecorder::new(*db.dialect());
    let report = Synchronizer::new(&db, &recorder).migrate_all(&rules).await;
    assert!(report.is_ok(), "{:?}", report.errors);

    let statements = recorder.take();
    assert_eq!(statements.len(), 5);
    assert!(statements[0].starts_with("CREATE TABLE \"listings\""));
    assert!(statements[4].starts_with("CREATE TABLE \"sellers\""));
    assert!(!db.has_table("listings").await.unwrap());
    assert!(!db.has_table("sellers").await.unwrap());
}

#[tokio::test]
async fn test_fresh_catalog_renders_mysql_ddl() {
    let rules = SchemaRule::from_json(RULES_JSON).unwrap();
    let catalog = FreshCatalog::new(MySqlDialect::new());
    let recorder = SqlRecorder::new(MySqlDialect::new());

    let report = Synchronizer::new(&catalog, &recorder)
        .with_options(SyncOptions::new().without_created_at())
        .migrate_all(&rules)
        .await;
    assert!(report.is_ok());

    assert_eq!(
        recorder.statements(),
        vec![
            "CREATE TABLE `listings` (\
             `url` varchar(512) NOT NULL, \
             `title` varchar(255) NOT NULL DEFAULT '', \
             `city` varchar(255) NOT NULL DEFAULT '', \
             `price` INT NOT NULL DEFAULT 0, \
             `id` bigint(64) unsigned NOT NULL AUTO_INCREMENT, \
             PRIMARY KEY (`id`)) CHARSET=utf8mb4"
                .to_string(),
            "CREATE INDEX `idx_city_price` ON `listings` (`city`, `price`)".to_string(),
            "CREATE INDEX `idx_listings_price` ON `listings` (`price`)".to_string(),
            "CREATE UNIQUE INDEX `uix_listings_url` ON `listings` (`url`)".to_string(),
            "CREATE TABLE `sellers` (\
             `name` varchar(64) NOT NULL, \
             `id` bigint(64) unsigned NOT NULL AUTO_INCREMENT, \
             PRIMARY KEY (`name`,`id`)) CHARSET=utf8mb4"
                .to_string(),
        ]
    );
}

#[test]
fn test_malformed_rule_file_names_path() {
    let dir = TempDir::new().unwrap();
    let path = write_rules(&dir, "{\"namespace\": ");

    let err = SchemaRule::load(&path).unwrap_err();
    assert!(matches!(&err, SyncError::RuleFile { path: p, .. } if *p == path));
    assert!(err.to_string().contains("rules.json"));
}
