use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::db::Repository;
use crate::engine::{self, ExportedPlaylist, ReconcileReport};
use crate::error::Result;
use crate::models::{ChannelView, ParsedEntry, SourceId};
use crate::playlist::{parse_playlist, PlaylistFetcher};

/// A user decision applied against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleChannel(String),
    SetChannelEnabled { channel_id: String, enabled: bool },
    SetAllChannelsEnabled(bool),
    SelectSource { channel_id: String, source_id: SourceId },
    Export(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    ChannelEnabled { channel_id: String, enabled: bool },
    ChannelsUpdated(usize),
    SourceSelected { channel_id: String, source_id: SourceId },
    Exported { path: PathBuf, records: usize },
}

pub struct App {
    pub repository: Repository,
    fetcher: PlaylistFetcher,
    config: Config,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let repository = Repository::open(&config.db_path).await?;
        Self::with_repository(repository, config)
    }

    pub fn with_repository(repository: Repository, config: &Config) -> Result<Self> {
        let fetcher = PlaylistFetcher::new(
            Duration::from_secs(config.fetch_timeout_secs),
            config.download_copy_path.as_ref().map(PathBuf::from),
        )?;

        Ok(Self {
            repository,
            fetcher,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Loads every input and reconciles their entries together in one transaction.
    pub async fn import(&self, inputs: &[String]) -> Result<ReconcileReport> {
        let mut entries = Vec::new();
        for input in inputs {
            let text = self.fetcher.load(input).await?;
            let parsed = parse_playlist(&text)?;
            tracing::info!("Parsed {} entries from {}", parsed.len(), input);
            entries.extend(parsed.into_iter().map(|entry| ParsedEntry {
                document: input.clone(),
                ..entry
            }));
        }
        self.reconcile(entries).await
    }

    pub async fn import_text(&self, text: &str) -> Result<ReconcileReport> {
        let entries = parse_playlist(text)?;
        self.reconcile(entries).await
    }

    async fn reconcile(&self, entries: Vec<ParsedEntry>) -> Result<ReconcileReport> {
        self.repository
            .transaction(move |store| engine::reconcile(store, &entries))
            .await
    }

    pub async fn channel_views(&self) -> Result<Vec<ChannelView>> {
        self.repository.channel_views().await
    }

    pub async fn export_document(&self) -> Result<ExportedPlaylist> {
        let style = self.config.header_style;
        self.repository
            .transaction(move |store| engine::export(store, style))
            .await
    }

    pub async fn apply(&self, command: Command) -> Result<CommandOutcome> {
        match command {
            Command::ToggleChannel(channel_id) => {
                let id = channel_id.clone();
                let enabled = self
                    .repository
                    .transaction(move |store| engine::toggle_channel(store, &id))
                    .await?;
                Ok(CommandOutcome::ChannelEnabled {
                    channel_id,
                    enabled,
                })
            }

            Command::SetChannelEnabled {
                channel_id,
                enabled,
            } => {
                let id = channel_id.clone();
                self.repository
                    .transaction(move |store| engine::set_channel_enabled(store, &id, enabled))
                    .await?;
                Ok(CommandOutcome::ChannelEnabled {
                    channel_id,
                    enabled,
                })
            }

            Command::SetAllChannelsEnabled(enabled) => {
                let count = self
                    .repository
                    .transaction(move |store| engine::set_all_channels_enabled(store, enabled))
                    .await?;
                Ok(CommandOutcome::ChannelsUpdated(count))
            }

            Command::SelectSource {
                channel_id,
                source_id,
            } => {
                let id = channel_id.clone();
                self.repository
                    .transaction(move |store| engine::select_source(store, &id, source_id))
                    .await?;
                Ok(CommandOutcome::SourceSelected {
                    channel_id,
                    source_id,
                })
            }

            Command::Export(path) => {
                let exported = self.export_document().await?;
                tokio::fs::write(&path, &exported.document).await?;
                tracing::info!("Wrote {} records to {}", exported.records, path.display());
                Ok(CommandOutcome::Exported {
                    path,
                    records: exported.records,
                })
            }
        }
    }
}
