use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use newsdesk_core::types::DbId;
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single open connection.
pub struct Connection {
    /// The authenticated user holding this connection.
    pub user_id: DbId,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
}

/// Registry of open realtime connections.
///
/// One user may hold several connections (tabs, devices); messages for a
/// user go to all of them. Thread-safe via interior `RwLock`; owned by
/// `AppState` behind an `Arc`.
pub struct ConnectionDirectory {
    connections: RwLock<HashMap<String, Connection>>,
}

impl ConnectionDirectory {
    /// Create a new, empty directory.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection for `user_id`.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String, user_id: DbId) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = Connection { user_id, sender: tx };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Whether `user_id` holds at least one open connection.
    pub async fn is_connected(&self, user_id: DbId) -> bool {
        self.connections
            .read()
            .await
            .values()
            .any(|conn| conn.user_id == user_id)
    }

    /// Send a message to all connections belonging to a specific user.
    ///
    /// Connections whose channels are already closed are skipped; they are
    /// cleaned up when their receive loop ends. Returns the number of
    /// connections the message was handed to.
    pub async fn send_to_user(&self, user_id: DbId, message: Message) -> usize {
        let conns = self.connections.read().await;
        let mut count = 0;
        for conn in conns.values().filter(|c| c.user_id == user_id) {
            if conn.sender.send(message.clone()).is_ok() {
                count += 1;
            }
        }
        count
    }

    /// Return the current number of open connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for ConnectionDirectory {
    fn default() -> Self {
        Self::new()
    }
}
