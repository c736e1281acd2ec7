use serde::{Deserialize, Serialize};

use crate::db::Store;
use crate::error::Result;
use crate::models::{Channel, Source};

pub const PLAYLIST_MARKER: &str = "#EXTM3U";

/// How the header line of each exported record is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderStyle {
    /// `#EXTINF:-1 tvg-id="<channel>",<label>`
    #[default]
    Reconstructed,
    /// The header line exactly as last seen in an imported document.
    Original,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPlaylist {
    pub document: String,
    pub records: usize,
}

/// Render every active source of every enabled channel, ordered by channel id.
///
/// Read-only: exporting never changes channel or source state.
pub fn export<S: Store + ?Sized>(store: &S, style: HeaderStyle) -> Result<ExportedPlaylist> {
    let mut document = String::from(PLAYLIST_MARKER);
    document.push('\n');
    let mut records = 0;

    for channel in store.all_channels()?.iter().filter(|c| c.enabled) {
        let sources = store.get_sources_for_channel(&channel.id)?;
        let Some(source) = sources.iter().find(|s| s.active) else {
            tracing::debug!("Channel {} is enabled but has no active source", channel.id);
            continue;
        };

        document.push_str(&header_line(channel, source, style));
        document.push('\n');
        document.push_str(&source.url);
        document.push('\n');
        records += 1;
    }

    tracing::info!("Exported {} records", records);
    Ok(ExportedPlaylist { document, records })
}

fn header_line(channel: &Channel, source: &Source, style: HeaderStyle) -> String {
    match style {
        HeaderStyle::Original if !source.raw_header.is_empty() => source.raw_header.clone(),
        _ => {
            let label = if source.display_name.is_empty() {
                &channel.id
            } else {
                &source.display_name
            };
            // A quote cannot sit inside tvg-id="..."; the bare name reads back as the id
            if channel.id.contains('"') {
                format!("#EXTINF:-1,{}", channel.id)
            } else {
                format!("#EXTINF:-1 tvg-id=\"{}\",{}", channel.id, label)
            }
        }
    }
}
