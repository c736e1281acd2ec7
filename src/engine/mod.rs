//! Reconciliation, activation and export over a [`Store`](crate::db::Store).
//!
//! Every function here takes the store of a single transaction and never
//! commits on its own; callers run them through `Repository::transaction`.

pub mod activation;
pub mod exporter;
pub mod reconciler;

pub use activation::{select_source, set_all_channels_enabled, set_channel_enabled, toggle_channel};
pub use exporter::{export, ExportedPlaylist, HeaderStyle};
pub use reconciler::{reconcile, ReconcileReport};

#[cfg(test)]
pub(crate) mod testing;
