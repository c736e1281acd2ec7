use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::ChannelView;

use super::schema::SCHEMA;
use super::store::{SqliteStore, Store};

/// Async handle to the channel database.
///
/// All reads and writes go through [`Repository::transaction`], which is the
/// unit of atomicity for every engine operation.
pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Self::init(conn).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    /// Runs `f` inside one SQLite transaction.
    ///
    /// The transaction commits when `f` returns `Ok` and rolls back otherwise,
    /// so a failed operation leaves the persisted state as it was.
    pub async fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SqliteStore<'_>) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let outcome = f(&SqliteStore::new(&tx));
                if outcome.is_ok() {
                    tx.commit()?;
                }
                Ok(outcome)
            })
            .await?
    }

    /// Every channel with its sources, ordered by channel id then source id.
    pub async fn channel_views(&self) -> Result<Vec<ChannelView>> {
        self.transaction(|store| {
            store
                .all_channels()?
                .into_iter()
                .map(|channel| -> Result<ChannelView> {
                    let sources = store.get_sources_for_channel(&channel.id)?;
                    Ok(ChannelView { channel, sources })
                })
                .collect()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::NewSource;

    fn new_source(channel_id: &str, url: &str) -> NewSource {
        NewSource {
            channel_id: channel_id.to_string(),
            url: url.to_string(),
            display_name: channel_id.to_uppercase(),
            raw_header: format!("#EXTINF:-1,{}", channel_id.to_uppercase()),
        }
    }

    #[tokio::test]
    async fn committed_transaction_is_visible() {
        let repo = Repository::open_in_memory().await.unwrap();

        repo.transaction(|store| {
            store.upsert_channel("bbc")?;
            store.upsert_source(&new_source("bbc", "http://b/1"))?;
            Ok(())
        })
        .await
        .unwrap();

        let views = repo.channel_views().await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].channel.id, "bbc");
        assert!(!views[0].channel.enabled);
        assert_eq!(views[0].sources.len(), 1);
        assert!(!views[0].sources[0].active);
    }

    #[tokio::test]
    async fn failed_transaction_rolls_back() {
        let repo = Repository::open_in_memory().await.unwrap();

        let result: Result<()> = repo
            .transaction(|store| {
                store.upsert_channel("bbc")?;
                store.upsert_source(&new_source("bbc", "http://b/1"))?;
                Err(AppError::UnknownChannel("boom".into()))
            })
            .await;

        assert!(matches!(result, Err(AppError::UnknownChannel(_))));
        assert!(repo.channel_views().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_source_refreshes_lowest_duplicate() {
        let repo = Repository::open_in_memory().await.unwrap();

        let (first, second, upserted) = repo
            .transaction(|store| {
                store.upsert_channel("bbc")?;
                let first = store.insert_raw_source(&new_source("bbc", "http://b/1"), false)?;
                let second = store.insert_raw_source(&new_source("bbc", "http://b/1"), false)?;
                let mut fresh = new_source("bbc", "http://b/1");
                fresh.display_name = "BBC One HD".into();
                let upserted = store.upsert_source(&fresh)?;
                Ok((first, second, upserted))
            })
            .await
            .unwrap();

        assert!(first < second);
        assert_eq!(upserted, crate::models::Upserted::Refreshed(first));

        let views = repo.channel_views().await.unwrap();
        assert_eq!(views[0].sources[0].display_name, "BBC One HD");
        assert_eq!(views[0].sources[1].display_name, "BBC");
    }

    #[tokio::test]
    async fn channels_are_ordered_by_id() {
        let repo = Repository::open_in_memory().await.unwrap();

        repo.transaction(|store| {
            for id in ["zdf", "ard", "mtv"] {
                store.upsert_channel(id)?;
            }
            Ok(())
        })
        .await
        .unwrap();

        let ids: Vec<String> = repo
            .transaction(|store| store.all_channels())
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, ["ard", "mtv", "zdf"]);
    }

    #[tokio::test]
    async fn unknown_channel_is_not_enabled() {
        let repo = Repository::open_in_memory().await.unwrap();
        let updated = repo
            .transaction(|store| store.set_channel_enabled("nope", true))
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn state_survives_reopening_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channels.db");
        let path = path.to_string_lossy().to_string();

        {
            let repo = Repository::open(&path).await.unwrap();
            repo.transaction(|store| {
                store.upsert_channel("cnn")?;
                store.set_channel_enabled("cnn", true)?;
                Ok(())
            })
            .await
            .unwrap();
        }

        let repo = Repository::open(&path).await.unwrap();
        let channel = repo
            .transaction(|store| store.get_channel("cnn"))
            .await
            .unwrap()
            .unwrap();
        assert!(channel.enabled);
    }
}
