pub const SCHEMA: &str = r#"
PRAGMA foreign_keys = ON;

-- channels table
CREATE TABLE IF NOT EXISTS channels (
    id TEXT PRIMARY KEY,
    enabled INTEGER NOT NULL DEFAULT 0
);

-- sources table
-- (channel_id, url) is not UNIQUE: stores written by older
-- versions can hold duplicates, which reconciliation collapses.
CREATE TABLE IF NOT EXISTS sources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    channel_id TEXT NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
    display_name TEXT NOT NULL,
    raw_header TEXT NOT NULL,
    url TEXT NOT NULL,
    active INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_sources_channel_url ON sources(channel_id, url);
CREATE INDEX IF NOT EXISTS idx_sources_active ON sources(channel_id, active);
"#;
