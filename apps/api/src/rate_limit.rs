//! Per-client sliding-window rate limiting.
//!
//! `AppState` holds an `Arc<dyn RateLimiter>`. The in-memory backend suits a
//! single process; the Redis backend shares the window across processes and
//! lets keys expire with the window. Rejected requests never consume capacity.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Records one request for `key` if capacity remains.
    async fn check(&self, key: &str) -> RateDecision;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

const SWEEP_EVERY: u64 = 256;

struct WindowState {
    hits: HashMap<String, VecDeque<Instant>>,
    calls: u64,
}

pub struct InMemoryRateLimiter {
    max_requests: u32,
    window: Duration,
    state: Mutex<WindowState>,
}

impl InMemoryRateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Mutex::new(WindowState {
                hits: HashMap::new(),
                calls: 0,
            }),
        }
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.state.lock().await.hits.len()
    }
}

fn expire(hits: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = hits.front() {
        if now.duration_since(oldest) >= window {
            hits.pop_front();
        } else {
            break;
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let mut state = self.state.lock().await;

        state.calls += 1;
        if state.calls % SWEEP_EVERY == 0 {
            let window = self.window;
            state.hits.retain(|_, hits| {
                expire(hits, now, window);
                !hits.is_empty()
            });
        }

        let hits = state.hits.entry(key.to_string()).or_default();
        expire(hits, now, self.window);

        if hits.len() as u32 >= self.max_requests {
            let retry_after = hits
                .front()
                .map(|&oldest| self.window.saturating_sub(now.duration_since(oldest)))
                .unwrap_or(self.window);
            return RateDecision::Limited { retry_after };
        }

        hits.push_back(now);
        RateDecision::Allowed {
            remaining: self.max_requests - hits.len() as u32,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Redis backend
// ────────────────────────────────────────────────────────────────────────────

const KEY_PREFIX: &str = "cvlens:ratelimit:";

/// Trims the window, then admits the request only if capacity remains.
/// Returns `{admitted, count, oldest_ms}`.
const SLIDING_WINDOW_SCRIPT: &str = r#"
local key = KEYS[1]
local now = tonumber(ARGV[1])
local window = tonumber(ARGV[2])
local limit = tonumber(ARGV[3])
local member = ARGV[4]

redis.call('ZREMRANGEBYSCORE', key, '-inf', now - window)
local count = redis.call('ZCARD', key)
if count < limit then
  redis.call('ZADD', key, now, member)
  redis.call('PEXPIRE', key, window)
  return {1, count + 1, 0}
end

local oldest = redis.call('ZRANGE', key, 0, 0, 'WITHSCORES')
local oldest_ms = now
if oldest[2] then
  oldest_ms = tonumber(oldest[2])
end
return {0, count, oldest_ms}
"#;

pub struct RedisRateLimiter {
    connection: MultiplexedConnection,
    script: redis::Script,
    max_requests: u32,
    window: Duration,
}

impl RedisRateLimiter {
    pub async fn connect(
        redis_url: &str,
        max_requests: u32,
        window: Duration,
    ) -> anyhow::Result<Self> {
        let client = redis::Client::open(redis_url)?;
        let connection = client.get_multiplexed_tokio_connection().await?;
        Ok(Self {
            connection,
            script: redis::Script::new(SLIDING_WINDOW_SCRIPT),
            max_requests,
            window,
        })
    }

    async fn run_script(&self, key: &str) -> redis::RedisResult<(i64, i64, i64)> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let window_ms = self.window.as_millis() as i64;
        // Unique member so two requests in the same millisecond both count.
        let member = format!("{now_ms}-{}", unique_suffix());

        let mut connection = self.connection.clone();
        self.script
            .key(format!("{KEY_PREFIX}{key}"))
            .arg(now_ms)
            .arg(window_ms)
            .arg(self.max_requests)
            .arg(member)
            .invoke_async(&mut connection)
            .await
    }
}

fn unique_suffix() -> u64 {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    COUNTER.fetch_add(1, Ordering::Relaxed) ^ u64::from(std::process::id())
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str) -> RateDecision {
        match self.run_script(key).await {
            Ok((1, count, _)) => RateDecision::Allowed {
                remaining: self.max_requests.saturating_sub(count.max(0) as u32),
            },
            Ok((_, _, oldest_ms)) => {
                let now_ms = chrono::Utc::now().timestamp_millis();
                let elapsed = Duration::from_millis((now_ms - oldest_ms).max(0) as u64);
                RateDecision::Limited {
                    retry_after: self.window.saturating_sub(elapsed),
                }
            }
            Err(e) => {
                warn!("Rate limiter unavailable, allowing request: {e}");
                RateDecision::Allowed {
                    remaining: self.max_requests,
                }
            }
        }
    }
}

/// Limiter that admits everything. Used when limiting is configured off.
pub struct Unlimited;

#[async_trait]
impl RateLimiter for Unlimited {
    async fn check(&self, key: &str) -> RateDecision {
        debug!("Rate limiting disabled, admitting {key}");
        RateDecision::Allowed { remaining: u32::MAX }
    }
}
