//! Lightstreamer WebSocket session.
//!
//! # Session Lifecycle
//!
//! 1. **Connect**: open the WebSocket with the TLCP subprotocol and send
//!    `create_session`; resolves on `CONOK`, fails on `CONERR`
//! 2. **Subscribe**: send a `control` request adding the item subscription
//! 3. **Event Loop**: translate notifications into [`FeedEvent`]s until the
//!    server ends the session, closes the socket or the transport fails
//!
//! The handler does not reconnect; once a session ends it reports a
//! `DISCONNECTED` status and `next_event` returns `None`. Reconnection is
//! the feed supervisor's job.
//!
//! A live session must show some traffic within the keepalive time
//! announced in `CONOK` plus [`STALLED_TIMEOUT`]. Past that the session is
//! reported `STALLED`; if [`RECONNECT_TIMEOUT`] then passes in silence too,
//! the session is ended.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, trace, warn};

use super::protocol::{self, ServerMessage, SUBPROTOCOL};
use crate::error::{Error, Result};
use crate::port::{FeedEvent, ItemUpdate, SubscriptionRequest, TelemetryFeed};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const STATUS_CONNECTING: &str = "CONNECTING";
const STATUS_CONNECTED: &str = "CONNECTED:WS-STREAMING";
const STATUS_STALLED: &str = "STALLED";
const STATUS_DISCONNECTED: &str = "DISCONNECTED";

/// Silence tolerated beyond the server keepalive before reporting a stall.
pub const STALLED_TIMEOUT: Duration = Duration::from_millis(2000);
/// Further silence tolerated after a stall before the session is dropped.
pub const RECONNECT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Where and how to open the session.
#[derive(Debug, Clone)]
pub struct LightstreamerSettings {
    /// WebSocket endpoint, e.g. `wss://push.lightstreamer.com/lightstreamer`.
    pub url: String,
    pub adapter_set: String,
    pub client_id: String,
}

/// Per-subscription MERGE state.
#[derive(Debug)]
struct ActiveSubscription {
    items: Vec<String>,
    fields: Vec<String>,
    values: Vec<Vec<Option<String>>>,
    awaiting_snapshot: Vec<bool>,
}

impl ActiveSubscription {
    fn new(request: &SubscriptionRequest) -> Self {
        let items: Vec<String> = request.item.split_whitespace().map(str::to_owned).collect();
        let count = items.len();
        Self {
            values: vec![vec![None; request.fields.len()]; count],
            awaiting_snapshot: vec![request.snapshot; count],
            fields: request.fields.clone(),
            items,
        }
    }

    /// Apply encoded field values to item `position` (1-based) and return
    /// the full update. `Ok(None)` means the item is unknown.
    fn apply(&mut self, position: usize, raw: &str) -> Result<Option<ItemUpdate>> {
        let Some(index) = position
            .checked_sub(1)
            .filter(|index| *index < self.items.len())
        else {
            return Ok(None);
        };
        let name = self.items[index].clone();
        let values = &mut self.values[index];
        let changes = protocol::decode_changes(raw, values.len())?;

        if changes.len() != values.len() {
            warn!(
                item = %name,
                expected = values.len(),
                received = changes.len(),
                "Update field count mismatch"
            );
        }
        protocol::apply_changes(values, changes);

        let snapshot = std::mem::replace(&mut self.awaiting_snapshot[index], false);
        let fields = self
            .fields
            .iter()
            .cloned()
            .zip(values.iter().cloned())
            .collect();
        Ok(Some(ItemUpdate::new(name, snapshot, fields)))
    }

    fn clear(&mut self, position: usize) -> Option<String> {
        let index = position.checked_sub(1)?;
        let values = self.values.get_mut(index)?;
        values.iter_mut().for_each(|value| *value = None);
        self.items.get(index).cloned()
    }

    fn item_name(&self, position: usize) -> Option<String> {
        position
            .checked_sub(1)
            .and_then(|index| self.items.get(index))
            .cloned()
    }
}

/// Lightstreamer session implementing [`TelemetryFeed`].
pub struct LightstreamerFeed {
    settings: LightstreamerSettings,
    ws: Option<WsStream>,
    session_id: Option<String>,
    keepalive: Option<Duration>,
    stalled: bool,
    pending: VecDeque<FeedEvent>,
    subscriptions: HashMap<u32, ActiveSubscription>,
    next_request_id: u64,
    next_subscription_id: u32,
}

impl LightstreamerFeed {
    #[must_use]
    pub fn new(settings: LightstreamerSettings) -> Self {
        Self {
            settings,
            ws: None,
            session_id: None,
            keepalive: None,
            stalled: false,
            pending: VecDeque::new(),
            subscriptions: HashMap::new(),
            next_request_id: 1,
            next_subscription_id: 1,
        }
    }

    /// Server-assigned id of the live session, if any.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    async fn open_socket(&self) -> Result<WsStream> {
        let mut request = self.settings.url.as_str().into_client_request()?;
        request
            .headers_mut()
            .insert("Sec-WebSocket-Protocol", HeaderValue::from_static(SUBPROTOCOL));

        let (ws, response) = connect_async(request).await?;
        info!(status = %response.status(), "WebSocket connected");
        Ok(ws)
    }

    async fn send_text(&mut self, text: String) -> Result<()> {
        let ws = self
            .ws
            .as_mut()
            .ok_or_else(|| Error::Connection("no open session".into()))?;
        trace!(request = %text.lines().next().unwrap_or_default(), "Sending request");
        ws.send(Message::Text(text)).await?;
        Ok(())
    }

    /// Read frames until the server accepts or rejects the session.
    async fn await_session(&mut self) -> Result<()> {
        loop {
            let frame = match self.ws.as_mut() {
                Some(ws) => ws.next().await,
                None => return Err(Error::Connection("session ended during handshake".into())),
            };

            match frame {
                Some(Ok(Message::Text(text))) => {
                    let mut lines = text.split("\r\n").filter(|line| !line.is_empty());
                    while let Some(line) = lines.next() {
                        match protocol::parse_line(line) {
                            Ok(ServerMessage::ConOk {
                                session_id,
                                keepalive_ms,
                                ..
                            }) => {
                                info!(session = %session_id, keepalive_ms, "Session created");
                                self.session_id = Some(session_id);
                                self.keepalive = Some(Duration::from_millis(keepalive_ms));
                                self.stalled = false;
                                self.pending
                                    .push_back(FeedEvent::StatusChanged(STATUS_CONNECTED.into()));
                                // Notifications sharing the CONOK frame.
                                lines.by_ref().for_each(|rest| self.handle_line(rest));
                                return Ok(());
                            }
                            Ok(ServerMessage::ConErr { code, message }) => {
                                self.end_session();
                                return Err(Error::Session { code, message });
                            }
                            Ok(other) => self.handle_message(other),
                            Err(e) => warn!(error = %e, line = %line, "Ignoring unparseable line"),
                        }
                    }
                }
                Some(Ok(Message::Ping(data))) => {
                    if let Some(ws) = self.ws.as_mut() {
                        ws.send(Message::Pong(data)).await?;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    self.end_session();
                    return Err(Error::Connection(format!(
                        "closed during handshake: {frame:?}"
                    )));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    self.end_session();
                    return Err(e.into());
                }
                None => {
                    self.end_session();
                    return Err(Error::Connection("closed during handshake".into()));
                }
            }
        }
    }

    fn handle_text(&mut self, text: &str) {
        for line in text.split("\r\n").filter(|line| !line.is_empty()) {
            self.handle_line(line);
        }
    }

    fn handle_line(&mut self, line: &str) {
        trace!(line = %line, "Received notification");
        match protocol::parse_line(line) {
            Ok(message) => self.handle_message(message),
            Err(e) => warn!(error = %e, line = %line, "Ignoring unparseable line"),
        }
    }

    fn handle_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Update {
                sub_id,
                item,
                values,
            } => {
                let update = match self.subscriptions.get_mut(&sub_id) {
                    Some(sub) => sub.apply(item, &values),
                    None => Ok(None),
                };
                match update {
                    Ok(Some(update)) => self.pending.push_back(FeedEvent::Update(update)),
                    Ok(None) => debug!(sub_id, item, "Update for unknown subscription"),
                    Err(e) => warn!(error = %e, sub_id, item, "Dropping malformed update"),
                }
            }
            ServerMessage::SubOk {
                sub_id,
                items,
                fields,
            } => {
                debug!(sub_id, "Subscription confirmed");
                self.pending
                    .push_back(FeedEvent::Subscribed { items, fields });
            }
            ServerMessage::EndOfSnapshot { sub_id, item } => {
                if let Some(item) = self
                    .subscriptions
                    .get(&sub_id)
                    .and_then(|sub| sub.item_name(item))
                {
                    self.pending.push_back(FeedEvent::EndOfSnapshot { item });
                }
            }
            ServerMessage::ClearSnapshot { sub_id, item } => {
                if let Some(item) = self
                    .subscriptions
                    .get_mut(&sub_id)
                    .and_then(|sub| sub.clear(item))
                {
                    self.pending.push_back(FeedEvent::ClearSnapshot { item });
                }
            }
            ServerMessage::Unsubscribed { sub_id } => {
                self.subscriptions.remove(&sub_id);
                self.pending.push_back(FeedEvent::Unsubscribed);
            }
            ServerMessage::Overflow { sub_id, item, lost } => {
                warn!(sub_id, item, lost, "Server dropped updates");
            }
            ServerMessage::ReqOk { req_id } => debug!(?req_id, "Request accepted"),
            ServerMessage::ReqErr {
                req_id,
                code,
                message,
            } => {
                debug!(req_id, "Request rejected");
                self.pending
                    .push_back(FeedEvent::SubscriptionError { code, message });
            }
            ServerMessage::Error { code, message } => {
                self.pending
                    .push_back(FeedEvent::ServerError { code, message });
            }
            ServerMessage::ConErr { code, message } | ServerMessage::End { code, message } => {
                self.pending
                    .push_back(FeedEvent::ServerError { code, message });
                self.end_session();
            }
            ServerMessage::Loop { delay_ms } => {
                info!(delay_ms, "Server asked to rebind, ending session");
                self.end_session();
            }
            ServerMessage::ConOk { session_id, .. } => {
                debug!(session = %session_id, "Unexpected CONOK on live session");
            }
            ServerMessage::Probe | ServerMessage::Noop => trace!("Keepalive"),
            ServerMessage::Sync { seconds } => trace!(seconds, "Server clock sync"),
            ServerMessage::Info { tag, args } => debug!(tag = %tag, args = %args, "Server info"),
        }
    }

    /// How long the next read may wait before the silence counts.
    fn read_deadline(&self) -> Option<Duration> {
        if self.stalled {
            Some(RECONNECT_TIMEOUT)
        } else {
            self.keepalive.map(|keepalive| keepalive + STALLED_TIMEOUT)
        }
    }

    fn on_silence(&mut self) {
        if self.stalled {
            warn!(
                timeout_ms = RECONNECT_TIMEOUT.as_millis() as u64,
                "No traffic after stall, ending session"
            );
            self.end_session();
        } else {
            warn!("No traffic within keepalive, session stalled");
            self.stalled = true;
            self.pending
                .push_back(FeedEvent::StatusChanged(STATUS_STALLED.into()));
        }
    }

    fn on_traffic(&mut self) {
        if std::mem::replace(&mut self.stalled, false) {
            info!("Traffic resumed after stall");
            self.pending
                .push_back(FeedEvent::StatusChanged(STATUS_CONNECTED.into()));
        }
    }

    /// Drop the socket and report the session as disconnected.
    fn end_session(&mut self) {
        self.keepalive = None;
        self.stalled = false;
        if self.ws.take().is_some() || self.session_id.is_some() {
            self.session_id = None;
            self.subscriptions.clear();
            self.pending
                .push_back(FeedEvent::StatusChanged(STATUS_DISCONNECTED.into()));
        }
    }
}

#[async_trait]
impl TelemetryFeed for LightstreamerFeed {
    async fn connect(&mut self) -> Result<()> {
        info!(
            url = %self.settings.url,
            adapter_set = %self.settings.adapter_set,
            "Connecting to Lightstreamer"
        );
        self.pending
            .push_back(FeedEvent::StatusChanged(STATUS_CONNECTING.into()));

        self.ws = Some(self.open_socket().await?);

        let request =
            protocol::create_session_request(&self.settings.adapter_set, &self.settings.client_id);
        self.send_text(request).await?;

        self.await_session().await
    }

    async fn subscribe(&mut self, request: &SubscriptionRequest) -> Result<()> {
        let sub_id = self.next_subscription_id;
        let req_id = self.next_request_id;
        self.next_subscription_id += 1;
        self.next_request_id += 1;

        info!(
            item = %request.item,
            fields = ?request.fields,
            mode = request.mode.as_str(),
            snapshot = request.snapshot,
            "Subscribing to item"
        );

        self.subscriptions
            .insert(sub_id, ActiveSubscription::new(request));
        self.send_text(protocol::subscribe_request(req_id, sub_id, request))
            .await
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }

            let deadline = self.read_deadline();
            let ws = self.ws.as_mut()?;
            let read = match deadline {
                Some(limit) => timeout(limit, ws.next()).await,
                None => Ok(ws.next().await),
            };
            let Ok(frame) = read else {
                self.on_silence();
                continue;
            };
            if matches!(frame, Some(Ok(_))) {
                self.on_traffic();
            }

            match frame {
                Some(Ok(Message::Text(text))) => self.handle_text(&text),
                Some(Ok(Message::Ping(data))) => {
                    trace!("Received WebSocket ping");
                    let pong = match self.ws.as_mut() {
                        Some(ws) => ws.send(Message::Pong(data)).await,
                        None => Ok(()),
                    };
                    if let Err(e) = pong {
                        error!(error = %e, "Failed to answer ping");
                        self.end_session();
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    info!(frame = ?frame, "WebSocket closed by server");
                    self.end_session();
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    error!(error = %e, "WebSocket error");
                    self.end_session();
                }
                None => {
                    warn!("WebSocket stream ended");
                    self.end_session();
                }
            }
        }
    }

    async fn close(&mut self) {
        if let Some(mut ws) = self.ws.take() {
            if let Err(e) = ws.close(None).await {
                debug!(error = %e, "Error while closing WebSocket");
            }
            info!("Lightstreamer session closed");
        }
        self.session_id = None;
        self.keepalive = None;
        self.stalled = false;
        self.subscriptions.clear();
        self.pending.clear();
    }
}
