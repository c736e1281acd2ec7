use crate::db::Repository;
use crate::models::{ChannelView, ParsedEntry};

pub(crate) fn entry(channel_id: &str, name: &str, url: &str) -> ParsedEntry {
    ParsedEntry {
        document: String::new(),
        line: 1,
        channel_id: channel_id.to_string(),
        display_name: name.to_string(),
        raw_header: format!("#EXTINF:-1 tvg-id=\"{}\",{}", channel_id, name),
        url: url.to_string(),
    }
}

pub(crate) async fn snapshot(repo: &Repository) -> Vec<ChannelView> {
    repo.channel_views().await.unwrap()
}
