//! Best-effort redis cache for challenge draft detail views.
//!
//! Every draft update or delete must invalidate the cached detail so the
//! edit view never renders a stale document. Cache failures are logged and
//! swallowed; the database remains the source of truth.

use redis::AsyncCommands;
use tracing::warn;
use uuid::Uuid;

const DRAFT_TTL_SECS: u64 = 300;

fn draft_key(id: Uuid) -> String {
    format!("draft:{id}")
}

/// Returns the cached detail JSON for a draft, if present.
pub async fn get_draft_json(client: &redis::Client, id: Uuid) -> Option<String> {
    let mut conn = match client.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(e) => {
            warn!("Redis unavailable, skipping cache read: {e}");
            return None;
        }
    };
    match conn.get::<_, Option<String>>(draft_key(id)).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Cache read failed for draft {id}: {e}");
            None
        }
    }
}

/// Caches the detail JSON for a draft with a short TTL.
pub async fn put_draft_json(client: &redis::Client, id: Uuid, json: &str) {
    let mut conn = match client.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(e) => {
            warn!("Redis unavailable, skipping cache write: {e}");
            return;
        }
    };
    if let Err(e) = conn
        .set_ex::<_, _, ()>(draft_key(id), json, DRAFT_TTL_SECS)
        .await
    {
        warn!("Cache write failed for draft {id}: {e}");
    }
}

/// Drops the cached detail for a draft. Called on every update and delete.
pub async fn invalidate_draft(client: &redis::Client, id: Uuid) {
    let mut conn = match client.get_multiplexed_async_connection().await {
        Ok(c) => c,
        Err(e) => {
            warn!("Redis unavailable, skipping cache invalidation: {e}");
            return;
        }
    };
    if let Err(e) = conn.del::<_, ()>(draft_key(id)).await {
        warn!("Cache invalidation failed for draft {id}: {e}");
    }
}
