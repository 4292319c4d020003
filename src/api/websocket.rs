//! WebSocket feed of shipment events for the admin console.
//!
//! The `X-Admin-Key` header is checked before the upgrade so an unauthenticated
//! client gets a plain 401 instead of an open socket.

use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use actix_ws::Message;
use futures_util::StreamExt;
use std::time::{Duration, Instant};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::auth::AdminAuth;
use crate::config::ADMIN_KEY_HEADER;
use crate::services::EventBroadcaster;

/// Ping interval for keeping connections alive.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// Timeout for receiving pong response.
const PONG_TIMEOUT: Duration = Duration::from_secs(10);

/// Authenticate, then upgrade to a WebSocket.
pub async fn websocket_handler(
    req: HttpRequest,
    stream: web::Payload,
    broadcaster: web::Data<EventBroadcaster>,
) -> Result<HttpResponse, actix_web::Error> {
    if let Err(auth_err) = AdminAuth::authenticate(&req) {
        warn!(
            client = %req.connection_info().realip_remote_addr().unwrap_or("unknown"),
            header_admin = %req.headers().get(ADMIN_KEY_HEADER).is_some(),
            "WebSocket authentication failed"
        );
        return Ok(auth_err.error_response());
    }

    let client_addr = req
        .connection_info()
        .realip_remote_addr()
        .map(String::from)
        .unwrap_or_else(|| "unknown".to_string());

    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    info!(client = %client_addr, "WebSocket connection established");

    actix_web::rt::spawn(handle_websocket_connection(
        session,
        msg_stream,
        broadcaster.get_ref().clone(),
        client_addr,
    ));

    Ok(response)
}

async fn handle_websocket_connection(
    mut session: actix_ws::Session,
    mut msg_stream: actix_ws::MessageStream,
    broadcaster: EventBroadcaster,
    client_addr: String,
) {
    let mut rx = broadcaster.subscribe();

    let mut last_pong = Instant::now();
    let mut ping_interval = tokio::time::interval(PING_INTERVAL);

    loop {
        tokio::select! {
            Some(msg_result) = msg_stream.next() => {
                match msg_result {
                    Ok(Message::Ping(bytes)) => {
                        if session.pong(&bytes).await.is_err() {
                            break;
                        }
                    }
                    Ok(Message::Pong(_)) => {
                        last_pong = Instant::now();
                    }
                    Ok(Message::Text(text)) => {
                        debug!(client = %client_addr, message = %text, "Ignoring client message");
                    }
                    Ok(Message::Close(reason)) => {
                        info!(client = %client_addr, reason = ?reason, "Client requested close");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(client = %client_addr, error = %e, "WebSocket message error");
                        break;
                    }
                }
            }

            event_result = rx.recv() => {
                match event_result {
                    Ok(event) => match serde_json::to_string(&event) {
                        Ok(json) => {
                            if session.text(json).await.is_err() {
                                warn!(client = %client_addr, "Failed to send event, closing connection");
                                break;
                            }
                        }
                        Err(e) => warn!(error = %e, "Failed to serialize event"),
                    },
                    Err(RecvError::Lagged(count)) => {
                        warn!(client = %client_addr, missed = count, "Client lagged, missed events");
                    }
                    Err(RecvError::Closed) => {
                        info!(client = %client_addr, "Broadcast channel closed");
                        break;
                    }
                }
            }

            _ = ping_interval.tick() => {
                if last_pong.elapsed() > PING_INTERVAL + PONG_TIMEOUT {
                    warn!(client = %client_addr, "Pong timeout, closing connection");
                    break;
                }
                if session.ping(b"").await.is_err() {
                    warn!(client = %client_addr, "Failed to send ping, closing connection");
                    break;
                }
            }
        }
    }

    let _ = session.close(None).await;
    info!(client = %client_addr, "WebSocket connection closed");
}

/// Configure WebSocket routes (mounted under `/admin`).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").route(web::get().to(websocket_handler)));
}
