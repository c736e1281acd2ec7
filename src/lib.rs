//! Curated view over M3U channel playlists.
//!
//! Imported documents are reconciled into a SQLite store of channels and their
//! alternative sources; the user enables channels, picks one source per channel,
//! and exports a filtered playlist.

pub mod app;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod menu;
pub mod models;
pub mod playlist;
