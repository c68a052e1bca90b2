//! Per-connection session handler
//!
//! One session owns one WebSocket end-to-end. The loop is strictly
//! sequential: the next frame is not read until the previous reply has been
//! sent or the error path taken, so replies always leave in request order.
//!
//! Failure policy: on receive failure, coordinator failure, or send failure
//! the connection is closed - at most once - without an error-text reply in
//! place of a summary. The client detects closure and may reconnect.

use crate::error::sanitize_error_message;
use crate::server::AppState;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use warp::ws::{Message, WebSocket};

/// Drive one session from accept to close
pub async fn handle_session(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    state.session_opened();
    info!(%session_id, "session opened");

    let (mut sink, mut stream) = socket.split();
    let mut closed = false;

    while let Some(frame) = stream.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(e) => {
                warn!(%session_id, "receive failed: {}", sanitize_error_message(&e.to_string()));
                break;
            }
        };

        if message.is_close() {
            debug!(%session_id, "client closed connection");
            closed = true;
            break;
        }
        if message.is_ping() || message.is_pong() {
            continue;
        }

        let query = match message.to_str() {
            Ok(text) => text.to_string(),
            Err(()) => {
                warn!(%session_id, "non-text frame received, closing session");
                break;
            }
        };

        debug!(%session_id, query_len = query.len(), "query received");
        match state.coordinator.run(&query, state.max_rounds).await {
            Ok(result) => {
                debug!(
                    %session_id,
                    last_speaker = %result.last_speaker,
                    turns = result.turn_count,
                    "exchange complete"
                );
                if let Err(e) = sink.send(Message::text(result.summary_text)).await {
                    warn!(%session_id, "send failed: {}", sanitize_error_message(&e.to_string()));
                    break;
                }
            }
            Err(e) => {
                error!(
                    %session_id,
                    "exchange failed: {}",
                    sanitize_error_message(&e.to_string())
                );
                break;
            }
        }
    }

    close_once(&mut sink, &mut closed, session_id).await;
    state.session_closed();
    info!(%session_id, "session closed");
}

/// Close the connection if it has not been closed already
async fn close_once(sink: &mut SplitSink<WebSocket, Message>, closed: &mut bool, session_id: Uuid) {
    if *closed {
        return;
    }
    *closed = true;
    if let Err(e) = sink.send(Message::close()).await {
        // The peer may already be gone; nothing left to do
        debug!(%session_id, "close handshake failed: {}", sanitize_error_message(&e.to_string()));
    }
}
