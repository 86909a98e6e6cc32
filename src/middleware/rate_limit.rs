use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use redis::AsyncCommands;
use tracing::{debug, error, warn};

use crate::{config::Config, error::AppError};

/// Fixed-window request counter per client IP, kept in redis.
#[derive(Clone)]
pub struct RateLimiter {
    redis: Arc<redis::Client>,
    config: Arc<Config>,
}

impl RateLimiter {
    pub fn new(redis: redis::Client, config: Config) -> Self {
        Self {
            redis: Arc::new(redis),
            config: Arc::new(config),
        }
    }

    pub async fn check_rate_limit(&self, req: Request<Body>, next: Next) -> Result<Response, AppError> {
        let ip = client_ip(&req);
        let key = format!("rate_limit:{}", ip);

        let mut conn = self
            .redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                error!("Rate limiter cannot reach redis: {}", e);
                AppError::Internal("Rate limiter unavailable")
            })?;

        let count: i64 = conn.incr(&key, 1).await.map_err(|e| {
            error!("Rate limiter INCR failed: {}", e);
            AppError::Internal("Rate limiter unavailable")
        })?;

        if count == 1 {
            // first hit opens the window
            let _: () = conn
                .expire(&key, self.config.rate_limit_window().as_secs() as i64)
                .await
                .map_err(|e| {
                    error!("Rate limiter EXPIRE failed: {}", e);
                    AppError::Internal("Rate limiter unavailable")
                })?;
        }

        if count > i64::from(self.config.rate_limit_requests) {
            warn!("Rate limit exceeded for {}", ip);
            return Err(AppError::ResourceExhausted(
                "Too many requests, retry later",
            ));
        }

        Ok(next.run(req).await)
    }
}

/// Client address: `x-real-ip`, then the first `x-forwarded-for` entry, then
/// the socket peer.
pub fn client_ip(req: &Request<Body>) -> String {
    let remote_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string());

    let ip = req
        .headers()
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| {
            req.headers()
                .get("x-forwarded-for")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').find(|ip| !ip.trim().is_empty()))
        })
        .or(remote_ip.as_deref())
        .unwrap_or("unknown")
        .trim()
        .to_string();
    debug!("client ip: {}", ip);
    ip
}

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    limiter.check_rate_limit(req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> axum::http::request::Builder {
        Request::builder().uri("/getRtcToken")
    }

    #[test]
    fn prefers_real_ip_header() {
        let req = request()
            .header("x-real-ip", "10.0.0.1")
            .header("x-forwarded-for", "10.0.0.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "10.0.0.1");
    }

    #[test]
    fn takes_first_forwarded_entry() {
        let req = request()
            .header("x-forwarded-for", " , 203.0.113.7, 10.0.0.2")
            .body(Body::empty())
            .unwrap();
        assert_eq!(client_ip(&req), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let mut req = request().body(Body::empty()).unwrap();
        req.extensions_mut()
            .insert(ConnectInfo("192.0.2.10:4431".parse::<SocketAddr>().unwrap()));
        assert_eq!(client_ip(&req), "192.0.2.10");

        let req = request().body(Body::empty()).unwrap();
        assert_eq!(client_ip(&req), "unknown");
    }
}
