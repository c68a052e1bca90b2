//! WebSocket server
//!
//! Exposes `GET /ws` for query sessions and `GET /health` for liveness.
//! Each accepted connection runs in its own task with strictly sequential
//! receive/reply handling; connections share only the read-only registry and
//! classifier tables through the coordinator.

pub mod session;

use crate::exchange::ExchangeCoordinator;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;
use warp::Filter;

/// Shared state behind the warp routes
pub struct AppState {
    pub coordinator: ExchangeCoordinator,
    pub max_rounds: u32,
    active_sessions: AtomicU64,
}

impl AppState {
    pub fn new(coordinator: ExchangeCoordinator, max_rounds: u32) -> Self {
        Self {
            coordinator,
            max_rounds,
            active_sessions: AtomicU64::new(0),
        }
    }

    pub fn session_opened(&self) {
        self.active_sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn session_closed(&self) {
        self.active_sessions.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn active_sessions(&self) -> u64 {
        self.active_sessions.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Serialize)]
struct HealthStatus {
    service: &'static str,
    status: &'static str,
    active_sessions: u64,
}

/// Build the warp filter tree for the service
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let ws_state = state.clone();
    let ws_route = warp::path("ws")
        .and(warp::path::end())
        .and(warp::ws())
        .map(move |ws: warp::ws::Ws| {
            let state = ws_state.clone();
            ws.on_upgrade(move |socket| session::handle_session(socket, state))
        });

    let health_state = state;
    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || {
            let status = HealthStatus {
                service: "textroute",
                status: "healthy",
                active_sessions: health_state.active_sessions(),
            };
            warp::reply::json(&status)
        });

    ws_route.or(health_route)
}

/// Serve until the shutdown future resolves
pub async fn serve(
    state: Arc<AppState>,
    addr: SocketAddr,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) {
    let (bound_addr, server) = warp::serve(routes(state)).bind_with_graceful_shutdown(addr, shutdown);
    info!(%bound_addr, "server listening");
    server.await;
}
