//! Liveness and readiness probes for orchestrators and load balancers.
//!
//! ```text
//! GET /health/live
//! GET /health/ready
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Probe state shared between `main` and the probe handlers.
///
/// A service starts live but not ready. `main` marks it ready once the
/// listener is bound and unhealthy once shutdown begins.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a live, not-yet-ready state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail both probes while the process drains.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
        self.ready.store(false, Ordering::Release);
    }

    /// Whether the readiness probe passes.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Whether the liveness probe passes.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

fn probe(passing: bool) -> HttpResponse {
    let mut response = if passing {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe: `200` once the service accepts traffic, `503` otherwise.
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready())
}

/// Liveness probe: `200` until shutdown begins, `503` afterwards.
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_alive())
}
