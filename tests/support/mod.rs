//! Shared helpers for integration tests.
//!
//! Each test gets its own SQLite file inside a temp directory, reached through
//! the same sea-orm entities and migrator the Postgres deployment uses.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use carebook_server::sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;

pub struct TestDb {
    pub db: DatabaseConnection,
    pub url: String,
    pub dir: TempDir,
}

pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

pub async fn temp_db() -> TestDb {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = sqlite_url(&dir.path().join("carebook.db"));

    let mut options = ConnectOptions::new(url.clone());
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.expect("open sqlite database");

    TestDb { db, url, dir }
}

/// Writes a minimal frontend bundle and returns its directory.
pub fn static_bundle(root: &Path) -> PathBuf {
    let dir = root.join("build");
    std::fs::create_dir_all(&dir).expect("create bundle dir");
    std::fs::write(dir.join("index.html"), "<html><body>carebook</body></html>")
        .expect("write index.html");
    std::fs::write(dir.join("app.js"), "console.log('carebook');").expect("write app.js");
    dir
}
