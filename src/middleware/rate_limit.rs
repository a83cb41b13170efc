//! In-memory per-IP limiter for the public contact form. One submission per
//! window; state is per-process and resets on restart.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;

#[derive(Clone)]
struct RateLimitEntry {
    count: u32,
    reset_at: Instant,
}

#[derive(Clone)]
pub struct ContactRateLimiter {
    limits: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
    max_requests: u32,
    window_seconds: u64,
}

impl ContactRateLimiter {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            limits: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_seconds,
        }
    }

    /// When the window is 0, rate limiting is disabled (local dev/testing).
    pub fn is_disabled(&self) -> bool {
        self.window_seconds == 0
    }

    pub async fn check_limit(&self, key: &str) -> Result<(), StatusCode> {
        let mut limits = self.limits.write().await;
        let now = Instant::now();

        // Bounded memory: drop expired entries once the map grows large.
        if limits.len() > 10_000 {
            limits.retain(|_, entry| entry.reset_at > now);
        }

        match limits.get_mut(key) {
            Some(entry) => {
                if entry.reset_at <= now {
                    entry.count = 1;
                    entry.reset_at = now + Duration::from_secs(self.window_seconds);
                    return Ok(());
                }

                if entry.count >= self.max_requests {
                    return Err(StatusCode::TOO_MANY_REQUESTS);
                }

                entry.count += 1;
                Ok(())
            }
            None => {
                limits.insert(
                    key.to_string(),
                    RateLimitEntry {
                        count: 1,
                        reset_at: now + Duration::from_secs(self.window_seconds),
                    },
                );
                Ok(())
            }
        }
    }
}

/// Client IP as seen through a reverse proxy, falling back to "unknown".
pub fn extract_ip(req: &Request) -> String {
    if let Some(forwarded_for) = req.headers().get("x-forwarded-for") {
        if let Ok(ip) = forwarded_for.to_str() {
            return ip.split(',').next().unwrap_or("unknown").trim().to_string();
        }
    }

    if let Some(real_ip) = req.headers().get("x-real-ip") {
        if let Ok(ip) = real_ip.to_str() {
            return ip.to_string();
        }
    }

    "unknown".to_string()
}

pub async fn contact_rate_limit_middleware(
    State(limiter): State<ContactRateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if limiter.is_disabled() {
        return Ok(next.run(req).await);
    }

    let ip = extract_ip(&req);
    limiter.check_limit(&ip).await?;

    Ok(next.run(req).await)
}
