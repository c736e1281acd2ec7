use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::models::{Channel, NewSource, Source, SourceId, Upserted};

/// Storage operations the engine needs.
///
/// Implementations are handed out for the lifetime of one transaction, so every
/// sequence of calls made through a single `Store` commits or rolls back together.
pub trait Store {
    fn get_channel(&self, id: &str) -> Result<Option<Channel>>;

    /// Creates the channel (disabled) if missing. Returns true when a row was created.
    fn upsert_channel(&self, id: &str) -> Result<bool>;

    /// Returns false when no channel has this id.
    fn set_channel_enabled(&self, id: &str, enabled: bool) -> Result<bool>;

    /// All channels ordered by id.
    fn all_channels(&self) -> Result<Vec<Channel>>;

    /// Sources of one channel ordered by id.
    fn get_sources_for_channel(&self, channel_id: &str) -> Result<Vec<Source>>;

    fn get_source(&self, id: SourceId) -> Result<Option<Source>>;

    /// Refreshes the lowest-id row for `(channel_id, url)` or inserts an inactive one.
    fn upsert_source(&self, source: &NewSource) -> Result<Upserted>;

    fn set_source_active(&self, id: SourceId, active: bool) -> Result<()>;

    fn delete_source(&self, id: SourceId) -> Result<()>;
}

/// `Store` over an open SQLite transaction.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts a row without looking for an existing one, the way older
    /// versions of the store did.
    #[cfg(test)]
    pub(crate) fn insert_raw_source(&self, source: &NewSource, active: bool) -> Result<SourceId> {
        self.conn.execute(
            "INSERT INTO sources (channel_id, display_name, raw_header, url, active) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                source.channel_id,
                source.display_name,
                source.raw_header,
                source.url,
                active
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

impl Store for SqliteStore<'_> {
    fn get_channel(&self, id: &str) -> Result<Option<Channel>> {
        let channel = self
            .conn
            .query_row(
                "SELECT id, enabled FROM channels WHERE id = ?1",
                params![id],
                channel_from_row,
            )
            .optional()?;
        Ok(channel)
    }

    fn upsert_channel(&self, id: &str) -> Result<bool> {
        let inserted = self
            .conn
            .execute("INSERT OR IGNORE INTO channels (id) VALUES (?1)", params![id])?;
        Ok(inserted > 0)
    }

    fn set_channel_enabled(&self, id: &str, enabled: bool) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE channels SET enabled = ?1 WHERE id = ?2",
            params![enabled, id],
        )?;
        Ok(updated > 0)
    }

    fn all_channels(&self) -> Result<Vec<Channel>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, enabled FROM channels ORDER BY id")?;
        let channels = stmt
            .query_map([], channel_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(channels)
    }

    fn get_sources_for_channel(&self, channel_id: &str) -> Result<Vec<Source>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, channel_id, display_name, raw_header, url, active FROM sources WHERE channel_id = ?1 ORDER BY id",
        )?;
        let sources = stmt
            .query_map(params![channel_id], source_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(sources)
    }

    fn get_source(&self, id: SourceId) -> Result<Option<Source>> {
        let source = self
            .conn
            .query_row(
                "SELECT id, channel_id, display_name, raw_header, url, active FROM sources WHERE id = ?1",
                params![id],
                source_from_row,
            )
            .optional()?;
        Ok(source)
    }

    fn upsert_source(&self, source: &NewSource) -> Result<Upserted> {
        let existing: Option<SourceId> = self
            .conn
            .query_row(
                "SELECT MIN(id) FROM sources WHERE channel_id = ?1 AND url = ?2",
                params![source.channel_id, source.url],
                |row| row.get(0),
            )?;

        match existing {
            Some(id) => {
                self.conn.execute(
                    "UPDATE sources SET display_name = ?1, raw_header = ?2 WHERE id = ?3",
                    params![source.display_name, source.raw_header, id],
                )?;
                Ok(Upserted::Refreshed(id))
            }
            None => {
                self.conn.execute(
                    r#"INSERT INTO sources (channel_id, display_name, raw_header, url, active)
                       VALUES (?1, ?2, ?3, ?4, 0)"#,
                    params![
                        source.channel_id,
                        source.display_name,
                        source.raw_header,
                        source.url
                    ],
                )?;
                Ok(Upserted::Inserted(self.conn.last_insert_rowid()))
            }
        }
    }

    fn set_source_active(&self, id: SourceId, active: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE sources SET active = ?1 WHERE id = ?2",
            params![active, id],
        )?;
        Ok(())
    }

    fn delete_source(&self, id: SourceId) -> Result<()> {
        self.conn
            .execute("DELETE FROM sources WHERE id = ?1", params![id])?;
        Ok(())
    }
}

fn channel_from_row(row: &Row) -> rusqlite::Result<Channel> {
    Ok(Channel {
        id: row.get(0)?,
        enabled: row.get::<_, i64>(1)? != 0,
    })
}

fn source_from_row(row: &Row) -> rusqlite::Result<Source> {
    Ok(Source {
        id: row.get(0)?,
        channel_id: row.get(1)?,
        display_name: row.get(2)?,
        raw_header: row.get(3)?,
        url: row.get(4)?,
        active: row.get::<_, i64>(5)? != 0,
    })
}
