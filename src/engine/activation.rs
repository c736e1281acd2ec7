use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::SourceId;

/// Idempotent; fails with `UnknownChannel` when there is no such channel.
pub fn set_channel_enabled<S: Store + ?Sized>(store: &S, channel_id: &str, enabled: bool) -> Result<()> {
    if !store.set_channel_enabled(channel_id, enabled)? {
        return Err(AppError::UnknownChannel(channel_id.to_string()));
    }
    tracing::debug!("Channel {} enabled = {}", channel_id, enabled);
    Ok(())
}

/// Flips a channel's `enabled` flag and returns the new value.
pub fn toggle_channel<S: Store + ?Sized>(store: &S, channel_id: &str) -> Result<bool> {
    let channel = store
        .get_channel(channel_id)?
        .ok_or_else(|| AppError::UnknownChannel(channel_id.to_string()))?;
    let enabled = !channel.enabled;
    set_channel_enabled(store, channel_id, enabled)?;
    Ok(enabled)
}

/// Returns the number of channels updated.
pub fn set_all_channels_enabled<S: Store + ?Sized>(store: &S, enabled: bool) -> Result<usize> {
    let channels = store.all_channels()?;
    for channel in &channels {
        store.set_channel_enabled(&channel.id, enabled)?;
    }
    tracing::info!("Set enabled = {} on {} channels", enabled, channels.len());
    Ok(channels.len())
}

/// Makes `source_id` the only active source of `channel_id`.
///
/// Siblings are cleared before the target is set; the caller's transaction
/// makes both steps visible together.
pub fn select_source<S: Store + ?Sized>(store: &S, channel_id: &str, source_id: SourceId) -> Result<()> {
    if store.get_channel(channel_id)?.is_none() {
        return Err(AppError::UnknownChannel(channel_id.to_string()));
    }

    let belongs = store
        .get_source(source_id)?
        .is_some_and(|s| s.channel_id == channel_id);
    if !belongs {
        return Err(AppError::UnknownSource {
            channel_id: channel_id.to_string(),
            source_id,
        });
    }

    let siblings = store.get_sources_for_channel(channel_id)?;
    for sibling in siblings.iter().filter(|s| s.active && s.id != source_id) {
        store.set_source_active(sibling.id, false)?;
    }
    store.set_source_active(source_id, true)?;

    tracing::info!("Selected source {} for channel {}", source_id, channel_id);
    Ok(())
}
