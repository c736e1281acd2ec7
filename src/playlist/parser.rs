use regex::Regex;

use crate::error::Result;
use crate::models::ParsedEntry;

const HEADER_PREFIX: &str = "#EXTINF";
const TVG_ID_PATTERN: &str = r#"tvg-id="([^"]+)""#;

/// Scan an M3U document into header/URL entries, in document order.
///
/// The channel id is the header's `tvg-id` attribute when present; otherwise it
/// falls back to the display name, i.e. the text after the header's last comma.
/// Blank lines and `#` directives between a header and its URL are skipped; a
/// header with no URL before the next header yields an entry with an empty URL.
pub fn parse_playlist(text: &str) -> Result<Vec<ParsedEntry>> {
    let tag_re = Regex::new(TVG_ID_PATTERN)?;
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let mut entries = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let header = lines[i];
        if !header.starts_with(HEADER_PREFIX) {
            i += 1;
            continue;
        }
        let line = i + 1;

        // Directives such as #EXTGRP or #EXTVLCOPT may sit between a header and its URL
        i += 1;
        let mut url = String::new();
        while let Some(next) = lines.get(i) {
            if next.starts_with(HEADER_PREFIX) {
                break;
            }
            i += 1;
            if !next.is_empty() && !next.starts_with('#') {
                url = next.to_string();
                break;
            }
        }

        let display_name = header
            .rsplit_once(',')
            .map(|(_, name)| name.trim().to_string())
            .unwrap_or_default();
        let channel_id = tag_re
            .captures(header)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| display_name.clone());

        entries.push(ParsedEntry {
            document: String::new(),
            line,
            channel_id,
            display_name,
            raw_header: header.to_string(),
            url,
        });
    }

    Ok(entries)
}
