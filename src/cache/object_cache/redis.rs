use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::OnceCell;
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

/// Redis 缓存，所有 worker 共用一条多路复用连接
pub struct RedisObjectCache {
    client: redis::Client,
    connection: OnceCell<MultiplexedConnection>,
    key_prefix: String,
    default_ttl: u64,
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis_config.url))?;

        // 启动时同步 PING 一次，连不上就交给调用方回退
        let mut conn = client
            .get_connection()
            .map_err(|e| format!("Redis connection failed: {e}"))?;
        let pong: String = redis::cmd("PING")
            .query(&mut conn)
            .map_err(|e| format!("Redis ping failed: {e}"))?;
        debug!(
            "Redis reachable ({}), prefix '{}', default TTL {}s",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            connection: OnceCell::new(),
            key_prefix: redis_config.key_prefix.clone(),
            default_ttl: config.cache.default_ttl,
        })
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let result = self
            .connection
            .get_or_try_init(|| self.client.get_multiplexed_async_connection())
            .await;
        match result {
            Ok(conn) => Some(conn.clone()),
            Err(e) => {
                error!("Failed to open Redis connection: {}", e);
                None
            }
        }
    }

    fn make_key(&self, key: &str) -> String {
        prefixed_key(&self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.make_key(key)).await {
            Ok(Some(data)) => CacheResult::Found(data),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                error!("Redis GET '{}' failed: {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = if ttl == 0 { self.default_ttl } else { ttl };
        if let Err(e) = conn
            .set_ex::<_, _, ()>(self.make_key(&key), value, ttl)
            .await
        {
            error!("Redis SETEX '{}' failed: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        match conn.del::<_, i32>(self.make_key(key)).await {
            Ok(0) => debug!("Redis key '{}' already absent", key),
            Ok(_) => debug!("Redis key '{}' removed", key),
            Err(e) => error!("Redis DEL '{}' failed: {}", key, e),
        }
    }

    async fn invalidate_all(&self) {
        // 共享的 Redis 实例上不做整库清理，键依赖 TTL 自然过期
        warn!(
            "RedisObjectCache ignores invalidate_all; keys under '{}' expire by TTL",
            self.key_prefix
        );
    }
}

fn prefixed_key(prefix: &str, key: &str) -> String {
    format!("{prefix}{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        assert_eq!(prefixed_key("tutorhub:", "user:abc"), "tutorhub:user:abc");
        assert_eq!(prefixed_key("", "user:abc"), "user:abc");
    }
}
