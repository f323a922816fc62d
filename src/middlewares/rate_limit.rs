/*!
 * 令牌桶速率限制中间件
 *
 * 每个限制键（`前缀:user:<id>` 或 `前缀:ip:<addr>`）对应一个令牌桶：
 * 桶容量为 `burst`，每秒补充 `rate` 个令牌，每个请求消耗一个令牌。
 * 桶空时返回 429，并通过 `Retry-After` 告知还需等待的秒数。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RateLimit;
 *
 * web::scope("/api/v1/auth")
 *     .service(
 *         web::resource("/login")
 *             .wrap(RateLimit::login())  // 5 次突发，每分钟补充 5 次
 *             .route(web::post().to(login_handler)),
 *     )
 * ```
 *
 * 状态仅保存在进程内存中，多实例部署时各实例分别计数。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, RETRY_AFTER},
};
use dashmap::DashMap;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

// 超过该数量时清理已回满的桶
const MAX_TRACKED_KEYS: usize = 10_000;

/// 单个令牌桶
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    rate: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    pub fn new(capacity: u32, rate_per_sec: f64, now: Instant) -> Self {
        Self {
            capacity: capacity as f64,
            rate: rate_per_sec,
            tokens: capacity as f64,
            last_refill: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_refill = now;
    }

    /// 尝试取出一个令牌；失败时返回需要等待的时间
    pub fn try_take(&mut self, now: Instant) -> Result<u32, Duration> {
        self.refill(now);
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(self.tokens.floor() as u32)
        } else if self.rate <= 0.0 {
            Err(Duration::from_secs(u64::MAX / 2))
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / self.rate))
        }
    }

    fn is_full(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.last_refill).as_secs_f64();
        self.tokens + elapsed * self.rate >= self.capacity
    }
}

/// 按键管理令牌桶
#[derive(Default)]
pub struct RateLimiter {
    buckets: DashMap<String, TokenBucket>,
}

impl RateLimiter {
    pub fn check(&self, key: &str, burst: u32, rate_per_sec: f64) -> Result<u32, Duration> {
        self.check_at(key, burst, rate_per_sec, Instant::now())
    }

    fn check_at(
        &self,
        key: &str,
        burst: u32,
        rate_per_sec: f64,
        now: Instant,
    ) -> Result<u32, Duration> {
        if self.buckets.len() > MAX_TRACKED_KEYS {
            self.buckets.retain(|_, bucket| !bucket.is_full(now));
        }

        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(burst, rate_per_sec, now));
        bucket.try_take(now)
    }
}

static RATE_LIMITER: Lazy<Arc<RateLimiter>> = Lazy::new(|| Arc::new(RateLimiter::default()));

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 桶容量（允许的突发请求数）
    burst: u32,
    /// 每秒补充的令牌数
    rate_per_sec: f64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    pub fn new(burst: u32, rate_per_sec: f64) -> Self {
        Self {
            burst,
            rate_per_sec,
            key_prefix: String::new(),
            limiter: RATE_LIMITER.clone(),
        }
    }

    /// 每分钟补充 `per_minute` 个令牌
    pub fn per_minute(burst: u32, per_minute: u32) -> Self {
        Self::new(burst, per_minute as f64 / 60.0)
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录端点：突发 5 次，每分钟补充 5 次
    pub fn login() -> Self {
        Self::per_minute(5, 5).with_prefix("login")
    }

    /// CSV 导入：突发 3 次，每分钟补充 3 次
    pub fn imports() -> Self {
        Self::per_minute(3, 3).with_prefix("imports")
    }

    /// 通用 API：突发 100 次，每分钟补充 100 次
    pub fn api() -> Self {
        Self::per_minute(100, 100).with_prefix("api")
    }
}

/// 从请求中提取客户端 IP
///
/// 部署在反向代理之后时，需要代理正确设置 X-Forwarded-For / X-Real-IP。
fn extract_client_ip(req: &ServiceRequest) -> String {
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
        && is_valid_ip(ip.trim())
    {
        return ip.trim().to_string();
    }

    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

fn is_valid_ip(ip: &str) -> bool {
    ip.parse::<std::net::IpAddr>().is_ok()
}

fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    use crate::models::users::entities::User;
    req.extensions().get::<User>().map(|user| user.id)
}

fn limit_key(prefix: &str, identifier: &str) -> String {
    if prefix.is_empty() {
        identifier.to_string()
    } else {
        format!("{prefix}:{identifier}")
    }
}

fn create_rate_limit_response(retry_after: Duration) -> HttpResponse {
    let secs = retry_after.as_secs_f64().ceil().max(1.0) as u64;
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header((RETRY_AFTER, secs.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please retry later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let config = self.config.clone();

        Box::pin(async move {
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));
            let key = limit_key(&config.key_prefix, &identifier);

            match config
                .limiter
                .check(&key, config.burst, config.rate_per_sec)
            {
                Ok(_remaining) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(retry_after) => {
                    warn!(
                        "Rate limit exceeded for key: {} (retry after {:?})",
                        key, retry_after
                    );
                    Ok(req.into_response(
                        create_rate_limit_response(retry_after).map_into_right_body(),
                    ))
                }
            }
        })
    }
}
