//! TTL-keyed tip persistence.
//!
//! Two keys per tip: `coach_tips:tip:{id}` holds the serialized tip,
//! `coach_tips:plan:{plan_id}` indexes the latest tip id for a plan.
//! The two writes (and the two deletes) are issued concurrently with no
//! cross-key transaction; a dangling index reads as `None`. Expiry is
//! enforced lazily on every read in addition to the key TTLs, so callers
//! never observe a tip past its `expiresAt`.

use crate::models::{CoachTip, StoredCoachTip, TipStats};
use async_trait::async_trait;
use chrono::Utc;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

const TIP_KEY_PREFIX: &str = "coach_tips:tip:";
const PLAN_KEY_PREFIX: &str = "coach_tips:plan:";

#[derive(Debug, Error)]
pub enum TipStoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type TipStoreResult<T> = Result<T, TipStoreError>;

/// Persistence interface for coach tips.
///
/// Implementations must preserve overwrite-wins index semantics and lazy
/// expiry on read.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TipStore: Send + Sync {
    /// Persist a tip and point its plan index at it.
    async fn store(&self, tip: CoachTip) -> TipStoreResult<StoredCoachTip>;

    /// Resolve the plan index and return the live tip, if any.
    async fn get_by_plan(&self, plan_id: &str) -> TipStoreResult<Option<StoredCoachTip>>;

    /// Return the live tip with this id, if any.
    async fn get_by_id(&self, id: &str) -> TipStoreResult<Option<StoredCoachTip>>;

    /// Delete a tip and its plan index entry.
    async fn delete(&self, id: &str, plan_id: &str) -> TipStoreResult<()>;

    /// All live tips for an owner, newest generation first.
    async fn get_all_by_owner(&self, owner_id: &str) -> TipStoreResult<Vec<StoredCoachTip>>;

    /// Delete every expired tip, returning how many were removed.
    async fn cleanup_expired(&self) -> TipStoreResult<usize>;

    /// Store-wide counts. Does not delete anything.
    async fn stats(&self) -> TipStoreResult<TipStats>;
}

fn tip_key(id: &str) -> String {
    format!("{}{}", TIP_KEY_PREFIX, id)
}

fn plan_key(plan_id: &str) -> String {
    format!("{}{}", PLAN_KEY_PREFIX, plan_id)
}

/// Redis-backed tip store.
#[derive(Clone)]
pub struct RedisTipStore {
    redis: ConnectionManager,
}

impl RedisTipStore {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }

    /// Remaining whole seconds until the tip expires, if in the future.
    fn ttl_seconds(tip: &CoachTip) -> Option<u64> {
        let remaining = (tip.expires_at - Utc::now()).num_seconds();
        (remaining > 0).then_some(remaining as u64)
    }

    async fn read_tip(&self, id: &str) -> TipStoreResult<Option<StoredCoachTip>> {
        let mut redis = self.redis.clone();
        let raw: Option<String> = redis.get(tip_key(id)).await?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Cursor-based scan collecting all tip keys.
    async fn scan_tip_keys(&self) -> TipStoreResult<Vec<String>> {
        let mut redis = self.redis.clone();
        let mut keys = Vec::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(format!("{}*", TIP_KEY_PREFIX))
                .arg("COUNT")
                .arg(100)
                .query_async(&mut redis)
                .await?;

            keys.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        Ok(keys)
    }

    async fn read_all(&self) -> TipStoreResult<Vec<StoredCoachTip>> {
        let mut redis = self.redis.clone();
        let mut tips = Vec::new();

        for key in self.scan_tip_keys().await? {
            let raw: Option<String> = redis.get(&key).await?;
            if let Some(raw) = raw {
                tips.push(serde_json::from_str(&raw)?);
            }
        }

        Ok(tips)
    }
}

#[async_trait]
impl TipStore for RedisTipStore {
    async fn store(&self, tip: CoachTip) -> TipStoreResult<StoredCoachTip> {
        let stored = StoredCoachTip {
            tip,
            stored_at: Utc::now(),
        };
        let serialized = serde_json::to_string(&stored)?;

        let mut tip_conn = self.redis.clone();
        let mut plan_conn = self.redis.clone();
        let t_key = tip_key(&stored.tip.id);
        let p_key = plan_key(&stored.tip.plan_id);

        match Self::ttl_seconds(&stored.tip) {
            Some(ttl) => {
                let (tip_res, plan_res): (redis::RedisResult<()>, redis::RedisResult<()>) = tokio::join!(
                    tip_conn.set_ex(&t_key, &serialized, ttl),
                    plan_conn.set_ex(&p_key, &stored.tip.id, ttl),
                );
                tip_res?;
                plan_res?;
            }
            None => {
                warn!(
                    tip_id = %stored.tip.id,
                    expires_at = %stored.tip.expires_at,
                    "Storing tip whose expiry has already passed, no key TTL set"
                );
                let (tip_res, plan_res): (redis::RedisResult<()>, redis::RedisResult<()>) = tokio::join!(
                    tip_conn.set(&t_key, &serialized),
                    plan_conn.set(&p_key, &stored.tip.id),
                );
                tip_res?;
                plan_res?;
            }
        }

        debug!(tip_id = %stored.tip.id, plan_id = %stored.tip.plan_id, "Tip stored");
        Ok(stored)
    }

    async fn get_by_plan(&self, plan_id: &str) -> TipStoreResult<Option<StoredCoachTip>> {
        let mut redis = self.redis.clone();
        let id: Option<String> = redis.get(plan_key(plan_id)).await?;

        match id {
            // A dangling index (primary key already gone) reads as None.
            Some(id) => self.get_by_id(&id).await,
            None => Ok(None),
        }
    }

    async fn get_by_id(&self, id: &str) -> TipStoreResult<Option<StoredCoachTip>> {
        let Some(stored) = self.read_tip(id).await? else {
            return Ok(None);
        };

        if stored.is_expired(Utc::now()) {
            debug!(tip_id = %id, "Expired tip read, deleting");
            self.delete(id, &stored.tip.plan_id).await?;
            return Ok(None);
        }

        Ok(Some(stored))
    }

    async fn delete(&self, id: &str, plan_id: &str) -> TipStoreResult<()> {
        let mut tip_conn = self.redis.clone();
        let mut plan_conn = self.redis.clone();

        let (tip_res, plan_res): (redis::RedisResult<()>, redis::RedisResult<()>) = tokio::join!(
            tip_conn.del(tip_key(id)),
            plan_conn.del(plan_key(plan_id)),
        );
        tip_res?;
        plan_res?;

        Ok(())
    }

    async fn get_all_by_owner(&self, owner_id: &str) -> TipStoreResult<Vec<StoredCoachTip>> {
        let now = Utc::now();
        let mut tips = Vec::new();

        for stored in self.read_all().await? {
            if stored.tip.user_id != owner_id {
                continue;
            }
            if stored.is_expired(now) {
                self.delete(&stored.tip.id, &stored.tip.plan_id).await?;
                continue;
            }
            tips.push(stored);
        }

        tips.sort_by(|a, b| b.tip.generated_at.cmp(&a.tip.generated_at));
        Ok(tips)
    }

    async fn cleanup_expired(&self) -> TipStoreResult<usize> {
        let now = Utc::now();
        let mut cleaned = 0;

        for stored in self.read_all().await? {
            if stored.is_expired(now) {
                self.delete(&stored.tip.id, &stored.tip.plan_id).await?;
                cleaned += 1;
            }
        }

        Ok(cleaned)
    }

    async fn stats(&self) -> TipStoreResult<TipStats> {
        let now = Utc::now();
        let tips = self.read_all().await?;

        let total = tips.len();
        let expired = tips.iter().filter(|t| t.is_expired(now)).count();

        Ok(TipStats {
            total_tips: total,
            expired_tips: expired,
            active_tips: total - expired,
            timestamp: now,
        })
    }
}

/// In-memory tip store with the same observable semantics as Redis.
///
/// Used by tests and local development; keys never auto-expire, so all
/// expiry is enforced by the lazy read-time check.
#[derive(Clone, Default)]
pub struct MemoryTipStore {
    tips: Arc<RwLock<HashMap<String, StoredCoachTip>>>,
    plan_index: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryTipStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TipStore for MemoryTipStore {
    async fn store(&self, tip: CoachTip) -> TipStoreResult<StoredCoachTip> {
        let stored = StoredCoachTip {
            tip,
            stored_at: Utc::now(),
        };

        self.plan_index
            .write()
            .await
            .insert(stored.tip.plan_id.clone(), stored.tip.id.clone());
        self.tips
            .write()
            .await
            .insert(stored.tip.id.clone(), stored.clone());

        Ok(stored)
    }

    async fn get_by_plan(&self, plan_id: &str) -> TipStoreResult<Option<StoredCoachTip>> {
        let id = self.plan_index.read().await.get(plan_id).cloned();
        match id {
            Some(id) => self.get_by_id(&id).await,
            None => Ok(None),
        }
    }

    async fn get_by_id(&self, id: &str) -> TipStoreResult<Option<StoredCoachTip>> {
        let stored = self.tips.read().await.get(id).cloned();
        let Some(stored) = stored else {
            return Ok(None);
        };

        if stored.is_expired(Utc::now()) {
            self.delete(id, &stored.tip.plan_id).await?;
            return Ok(None);
        }

        Ok(Some(stored))
    }

    async fn delete(&self, id: &str, plan_id: &str) -> TipStoreResult<()> {
        self.tips.write().await.remove(id);
        self.plan_index.write().await.remove(plan_id);
        Ok(())
    }

    async fn get_all_by_owner(&self, owner_id: &str) -> TipStoreResult<Vec<StoredCoachTip>> {
        let now = Utc::now();
        let all: Vec<StoredCoachTip> = self.tips.read().await.values().cloned().collect();

        let mut tips = Vec::new();
        for stored in all {
            if stored.tip.user_id != owner_id {
                continue;
            }
            if stored.is_expired(now) {
                self.delete(&stored.tip.id, &stored.tip.plan_id).await?;
                continue;
            }
            tips.push(stored);
        }

        tips.sort_by(|a, b| b.tip.generated_at.cmp(&a.tip.generated_at));
        Ok(tips)
    }

    async fn cleanup_expired(&self) -> TipStoreResult<usize> {
        let now = Utc::now();
        let all: Vec<StoredCoachTip> = self.tips.read().await.values().cloned().collect();

        let mut cleaned = 0;
        for stored in all {
            if stored.is_expired(now) {
                self.delete(&stored.tip.id, &stored.tip.plan_id).await?;
                cleaned += 1;
            }
        }

        Ok(cleaned)
    }

    async fn stats(&self) -> TipStoreResult<TipStats> {
        let now = Utc::now();
        let tips = self.tips.read().await;

        let total = tips.len();
        let expired = tips.values().filter(|t| t.is_expired(now)).count();

        Ok(TipStats {
            total_tips: total,
            expired_tips: expired,
            active_tips: total - expired,
            timestamp: now,
        })
    }
}
