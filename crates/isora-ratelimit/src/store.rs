use async_trait::async_trait;

/// Minimal sorted-set + string key-value surface the limiter needs.
/// Abstracted behind a trait so the sliding-window algorithm can be unit
/// tested without a live Redis instance, and so the fail-open wrapper can
/// simulate a store outage deterministically.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// `ZREMRANGEBYSCORE key -inf cutoff`
    async fn trim(&self, key: &str, cutoff: f64) -> Result<(), StoreError>;
    /// `ZCARD key`
    async fn count(&self, key: &str) -> Result<u64, StoreError>;
    /// Smallest score currently in the set, if any (`ZRANGE key 0 0 WITHSCORES`).
    async fn oldest_score(&self, key: &str) -> Result<Option<f64>, StoreError>;
    /// `ZADD key score member`
    async fn add(&self, key: &str, score: f64, member: &str) -> Result<(), StoreError>;
    /// `EXPIRE key seconds`
    async fn expire(&self, key: &str, seconds: u64) -> Result<(), StoreError>;
    /// `GET key`
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    /// `SETEX key seconds value`
    async fn setex(&self, key: &str, seconds: u64, value: &str) -> Result<(), StoreError>;
    /// `DEL key`
    async fn del(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
#[error("rate limit store unavailable: {0}")]
pub struct StoreError(pub String);

/// Live Redis-backed implementation over a pooled `ConnectionManager`.
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| StoreError(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| StoreError(e.to_string()))?;
        Ok(RedisStore { conn })
    }
}

#[async_trait]
impl RateLimitStore for RedisStore {
    async fn trim(&self, key: &str, cutoff: f64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("ZREMRANGEBYSCORE")
            .arg(key)
            .arg("-inf")
            .arg(cutoff)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn count(&self, key: &str) -> Result<u64, StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("ZCARD")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn oldest_score(&self, key: &str) -> Result<Option<f64>, StoreError> {
        let mut conn = self.conn.clone();
        let rows: Vec<(String, f64)> = redis::cmd("ZRANGE")
            .arg(key)
            .arg(0)
            .arg(0)
            .arg("WITHSCORES")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError(e.to_string()))?;
        Ok(rows.into_iter().next().map(|(_, score)| score))
    }

    async fn add(&self, key: &str, score: f64, member: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("ZADD")
            .arg(key)
            .arg(score)
            .arg(member)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn expire(&self, key: &str, seconds: u64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("EXPIRE")
            .arg(key)
            .arg(seconds)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn setex(&self, key: &str, seconds: u64, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("SETEX")
            .arg(key)
            .arg(seconds)
            .arg(value)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn del(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        redis::cmd("DEL")
            .arg(key)
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::collections::BTreeMap;
    use tokio::sync::Mutex;

    /// In-process sorted-set emulation for pinning the sliding-window
    /// algorithm's arithmetic without a live Redis instance.
    #[derive(Default)]
    pub struct InMemoryStore {
        sets: Mutex<std::collections::HashMap<String, BTreeMap<String, f64>>>,
        strings: Mutex<std::collections::HashMap<String, String>>,
    }

    #[async_trait]
    impl RateLimitStore for InMemoryStore {
        async fn trim(&self, key: &str, cutoff: f64) -> Result<(), StoreError> {
            let mut sets = self.sets.lock().await;
            if let Some(set) = sets.get_mut(key) {
                set.retain(|_, score| *score >= cutoff);
            }
            Ok(())
        }

        async fn count(&self, key: &str) -> Result<u64, StoreError> {
            let sets = self.sets.lock().await;
            Ok(sets.get(key).map(|s| s.len() as u64).unwrap_or(0))
        }

        async fn oldest_score(&self, key: &str) -> Result<Option<f64>, StoreError> {
            let sets = self.sets.lock().await;
            Ok(sets
                .get(key)
                .and_then(|s| s.values().cloned().fold(None, |acc, v| {
                    Some(acc.map_or(v, |a: f64| a.min(v)))
                })))
        }

        async fn add(&self, key: &str, score: f64, member: &str) -> Result<(), StoreError> {
            let mut sets = self.sets.lock().await;
            sets.entry(key.to_string())
                .or_default()
                .insert(member.to_string(), score);
            Ok(())
        }

        async fn expire(&self, _key: &str, _seconds: u64) -> Result<(), StoreError> {
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.strings.lock().await.get(key).cloned())
        }

        async fn setex(&self, key: &str, _seconds: u64, value: &str) -> Result<(), StoreError> {
            self.strings
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn del(&self, key: &str) -> Result<(), StoreError> {
            self.sets.lock().await.remove(key);
            Ok(())
        }
    }

    /// Always-fails store used to exercise the fail-open path deterministically.
    pub struct FailingStore;

    #[async_trait]
    impl RateLimitStore for FailingStore {
        async fn trim(&self, _key: &str, _cutoff: f64) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn count(&self, _key: &str) -> Result<u64, StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn oldest_score(&self, _key: &str) -> Result<Option<f64>, StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn add(&self, _key: &str, _score: f64, _member: &str) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn expire(&self, _key: &str, _seconds: u64) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn setex(&self, _key: &str, _seconds: u64, _value: &str) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
        async fn del(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError("simulated outage".into()))
        }
    }
}
