use rusqlite::Connection;

use crate::db::{config::Config, schema::create_schema};
use crate::error::Result;

pub fn create_conn(config: &Config) -> Result<Connection> {
    let mut conn = match config.db_path() {
        Some(db) => {
            log::debug!("Opening database {}", db.display());
            Connection::open(db)?
        }
        None => Connection::open_in_memory()?,
    };

    configure_conn(&mut conn)?;
    create_schema(&mut conn)?;

    Ok(conn)
}

fn configure_conn(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = TRUE;
        ",
    )?;

    Ok(())
}
