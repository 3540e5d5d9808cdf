use crate::db::migrations;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::time::Duration;

pub const DB_FILE_NAME: &str = "evreg.db";

pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the application database and brings its schema up to date.
    ///
    /// A busy timeout is set so writers on different sessions queue behind
    /// one another at the SQLite level instead of failing spuriously.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME)?;
        let mut conn = Connection::open(db_file_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        migrations::init_with_migrations(&mut conn)?;

        Ok(Db { conn })
    }
}
