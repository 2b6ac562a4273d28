//! The real-time messaging relay.
//!
//! A room-keyed broadcast registry over live WebSocket sessions. Rooms are process-local and
//! ephemeral: membership is lost on disconnect and clients must rejoin after reconnecting. The
//! relay never touches the database — the persisted chat log is the source of truth, and this
//! channel is a best-effort, fire-and-forget delivery accelerant with no delivery guarantee, no
//! cross-publisher ordering and no replay. A receiver that is offline at broadcast time only ever
//! sees the message via a later fetch of the persisted log.
//!
//! Wire protocol: clients send `{"event":"join-room","room":"booking-<id>"}` to subscribe and
//! `{"event":"send-message","room":…,"payload":…}` to publish. The server re-emits the payload
//! verbatim as `{"event":"receive-message","payload":…}` to every member of the room — including
//! the sender, who must reconcile by message id or timestamp if it also appended the HTTP
//! response locally.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::{Message, MessageStream, Session};
use log::*;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// The frames clients may send. Anything that does not parse is logged and dropped.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum ClientFrame {
    JoinRoom { room: String },
    SendMessage { room: String, payload: serde_json::Value },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
enum ServerFrame<'a> {
    ReceiveMessage { payload: &'a serde_json::Value },
}

/// The error a sink reports when its peer is gone.
#[derive(Debug)]
pub struct SinkClosed;

/// Where broadcast payloads go. The one real implementation is a live [`Session`]; tests plug in
/// an in-memory sink.
#[allow(async_fn_in_trait)]
pub trait RelaySink: Clone {
    async fn send_text(&mut self, payload: String) -> Result<(), SinkClosed>;
}

impl RelaySink for Session {
    async fn send_text(&mut self, payload: String) -> Result<(), SinkClosed> {
        self.text(payload).await.map_err(|_| SinkClosed)
    }
}

//--------------------------------------     ChatRelay      ----------------------------------------------------------
/// The room registry. Cheap to clone; all clones share one map.
pub struct ChatRelay<S = Session> {
    rooms: Arc<Mutex<HashMap<String, HashMap<u64, S>>>>,
    next_conn_id: Arc<AtomicU64>,
}

impl<S> Clone for ChatRelay<S> {
    fn clone(&self) -> Self {
        Self { rooms: Arc::clone(&self.rooms), next_conn_id: Arc::clone(&self.next_conn_id) }
    }
}

impl<S> Default for ChatRelay<S> {
    fn default() -> Self {
        Self { rooms: Arc::new(Mutex::new(HashMap::new())), next_conn_id: Arc::new(AtomicU64::new(1)) }
    }
}

impl<S> ChatRelay<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands out a process-unique id for a new connection.
    pub fn register(&self) -> u64 {
        self.next_conn_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl<S: RelaySink> ChatRelay<S> {
    /// Adds the connection to the room's broadcast group, creating the room on first join.
    pub async fn join(&self, room: &str, conn_id: u64, sink: S) {
        let mut rooms = self.rooms.lock().await;
        rooms.entry(room.to_string()).or_default().insert(conn_id, sink);
        debug!("📡️ Connection #{conn_id} joined room {room}");
    }

    /// Drops the connection from every room it joined. Rooms left empty are discarded.
    pub async fn leave(&self, conn_id: u64) {
        let mut rooms = self.rooms.lock().await;
        rooms.retain(|_, members| {
            members.remove(&conn_id);
            !members.is_empty()
        });
    }

    /// Sends the payload to every current member of the room, the publisher included. Members
    /// whose sockets turn out to be gone are pruned on the way through. Returns the number of
    /// members the payload was handed to; whether it ever arrives is not this relay's promise.
    pub async fn broadcast(&self, room: &str, payload: &str) -> usize {
        let mut rooms = self.rooms.lock().await;
        let Some(members) = rooms.get_mut(room) else {
            trace!("📡️ Broadcast to empty room {room} dropped");
            return 0;
        };
        let mut delivered = 0;
        let mut dead = Vec::new();
        for (conn_id, sink) in members.iter_mut() {
            match sink.send_text(payload.to_string()).await {
                Ok(()) => delivered += 1,
                Err(SinkClosed) => dead.push(*conn_id),
            }
        }
        for conn_id in dead {
            members.remove(&conn_id);
            trace!("📡️ Pruned dead connection #{conn_id} from room {room}");
        }
        if members.is_empty() {
            rooms.remove(room);
        }
        delivered
    }
}

//--------------------------------------    WS endpoint     ----------------------------------------------------------
/// `GET /ws`: upgrades the connection and parks it in the relay loop.
pub async fn ws_entry(
    req: HttpRequest,
    stream: web::Payload,
    relay: web::Data<ChatRelay>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;
    actix_web::rt::spawn(relay_session(session, msg_stream, relay.get_ref().clone()));
    Ok(response)
}

async fn relay_session(session: Session, mut stream: MessageStream, relay: ChatRelay) {
    let conn_id = relay.register();
    debug!("📡️ Socket #{conn_id} connected");
    while let Some(Ok(msg)) = stream.recv().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientFrame>(&text) {
                Ok(ClientFrame::JoinRoom { room }) => relay.join(&room, conn_id, session.clone()).await,
                Ok(ClientFrame::SendMessage { room, payload }) => {
                    match serde_json::to_string(&ServerFrame::ReceiveMessage { payload: &payload }) {
                        Ok(frame) => {
                            let delivered = relay.broadcast(&room, &frame).await;
                            trace!("📡️ Socket #{conn_id} published to {room}; reached {delivered} members");
                        },
                        Err(e) => debug!("📡️ Could not re-encode payload from #{conn_id}: {e}"),
                    }
                },
                Err(e) => debug!("📡️ Ignoring unparseable frame from #{conn_id}: {e}"),
            },
            Message::Ping(bytes) => {
                if session.clone().pong(&bytes).await.is_err() {
                    break;
                }
            },
            Message::Close(_) => break,
            _ => {},
        }
    }
    relay.leave(conn_id).await;
    debug!("📡️ Socket #{conn_id} disconnected");
}
