use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use newsdesk_core::error::CoreError;
use newsdesk_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::authenticate_token;
use crate::query::TokenParams;
use crate::state::AppState;
use crate::ws::directory::ConnectionDirectory;

/// GET /api/v1/ws?token=<jwt>
///
/// Authenticates before upgrading; a missing or invalid token is a plain
/// 401 response. After the upgrade the connection is registered in the
/// [`ConnectionDirectory`] under the token's user.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
) -> AppResult<Response> {
    let token = params.token.ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized("Missing token".into()))
    })?;
    let user = authenticate_token(&state, &token).await?;

    let connections = Arc::clone(&state.connections);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, connections, user.user_id)))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection.
///   2. Spawns a sender task that forwards messages from the directory channel.
///   3. Drains inbound frames on the current task (clients never send data).
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, connections: Arc<ConnectionDirectory>, user_id: DbId) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket connected");

    let mut rx = connections.add(conn_id.clone(), user_id).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    connections.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, user_id, "WebSocket disconnected");
}
