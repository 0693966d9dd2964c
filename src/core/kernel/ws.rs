use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, warn};

type WsWrite = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsRead = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Handler invoked with every inbound data frame, verbatim and in network
/// order. Dispatch across channels sharing one handler is the caller's
/// responsibility.
pub type MessageHandler = Arc<dyn Fn(Message) + Send + Sync>;

struct Subscription {
    frame: Message,
    handler: Option<MessageHandler>,
}

struct Shared {
    url: String,
    subscriptions: RwLock<Vec<Subscription>>,
    // Bumped by unsubscribe; a connection task holding a stale epoch stops
    // instead of reconnecting or re-installing itself.
    epoch: AtomicU64,
}

/// Push-based streaming session over one lazily-created persistent
/// connection.
///
/// The session multiplexes any number of channel subscriptions over a single
/// socket. The connection is opened on the first `subscribe`; an abnormal
/// closure (dropped without a close frame, the condition surfaced as close
/// code 1006) triggers exactly one sequential reconnect that re-issues the
/// registered subscribe commands. Every other close code is terminal until
/// the next `subscribe` call. `unsubscribe` tears the whole session down -
/// the remote protocol has no per-channel unsubscribe.
pub struct StreamSession {
    shared: Arc<Shared>,
    conn: Mutex<Option<mpsc::UnboundedSender<Message>>>,
}

impl std::fmt::Debug for StreamSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSession")
            .field("url", &self.shared.url)
            .finish_non_exhaustive()
    }
}

impl StreamSession {
    /// Create a session for the given WebSocket URL. No connection is opened
    /// until the first `subscribe`.
    pub fn new(url: String) -> Self {
        Self {
            shared: Arc::new(Shared {
                url,
                subscriptions: RwLock::new(Vec::new()),
                epoch: AtomicU64::new(0),
            }),
            conn: Mutex::new(None),
        }
    }

    /// Register a subscription and issue its subscribe command.
    ///
    /// Opens the connection lazily; when one already exists the command is
    /// sent over it without creating a new one. Returns immediately - the
    /// open/send happens asynchronously, and connection-level failures are
    /// reported through the transport log, not as a subscribe failure.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe(&self, frame: Message, handler: Option<MessageHandler>) {
        {
            let mut subs = self.shared.subscriptions.write().unwrap();
            subs.push(Subscription {
                frame: frame.clone(),
                handler,
            });
        }

        let mut conn = self.conn.lock().unwrap();
        if let Some(sender) = conn.as_ref() {
            if sender.send(frame).is_ok() {
                return;
            }
            // The previous connection task is gone (terminal close or failed
            // connect); fall through and open a fresh connection.
        }

        let epoch = self.shared.epoch.load(Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        *conn = Some(tx);
        // The task sends every registered frame once connected, including the
        // one registered above.
        tokio::spawn(run_connection(Arc::clone(&self.shared), epoch, rx));
    }

    /// Tear down the session: close the connection and drop every
    /// subscription. No subsequently received frame reaches a handler.
    pub fn unsubscribe(&self) {
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.shared.subscriptions.write().unwrap().clear();
        // Dropping the sender makes the connection task send a close frame
        // and exit.
        *self.conn.lock().unwrap() = None;
    }

    /// Whether a live connection task currently exists.
    pub fn is_active(&self) -> bool {
        self.conn
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        // The sender drops with the session; the bump stops a task that is
        // mid-reconnect.
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

enum Closure {
    /// Dropped without a close handshake (the 1006 condition) - reconnect.
    Abnormal,
    /// Explicit close with any other code - terminal.
    Deliberate,
    /// The session dropped our sender - already torn down.
    Shutdown,
}

async fn run_connection(
    shared: Arc<Shared>,
    epoch: u64,
    mut outbound: mpsc::UnboundedReceiver<Message>,
) {
    loop {
        let mut stream = match connect_async(shared.url.as_str()).await {
            Ok((stream, _)) => stream,
            Err(e) => {
                error!("WebSocket connection failed: {}", e);
                return;
            }
        };
        if shared.epoch.load(Ordering::SeqCst) != epoch {
            // unsubscribe raced the (re)connect and wins.
            let _ = stream.close(None).await;
            return;
        }
        debug!(url = %shared.url, "WebSocket connected");
        let (mut write, mut read) = stream.split();

        // Anything still queued is covered by the registry resend below.
        while outbound.try_recv().is_ok() {}

        let frames: Vec<Message> = {
            let subs = shared.subscriptions.read().unwrap();
            subs.iter().map(|sub| sub.frame.clone()).collect()
        };
        let mut broken = false;
        for frame in frames {
            if let Err(e) = write.send(frame).await {
                warn!("Failed to send subscribe command: {}", e);
                broken = true;
                break;
            }
        }

        let closure = if broken {
            Closure::Abnormal
        } else {
            pump(&shared, &mut write, &mut read, &mut outbound).await
        };

        match closure {
            Closure::Abnormal => {
                if shared.epoch.load(Ordering::SeqCst) == epoch {
                    warn!("Abnormal WebSocket closure, reconnecting");
                    continue;
                }
                return;
            }
            Closure::Deliberate => {
                debug!("WebSocket closed by remote");
                return;
            }
            Closure::Shutdown => return,
        }
    }
}

/// Forward outbound commands and dispatch inbound frames until the
/// connection ends one way or another.
async fn pump(
    shared: &Shared,
    write: &mut WsWrite,
    read: &mut WsRead,
    outbound: &mut mpsc::UnboundedReceiver<Message>,
) -> Closure {
    loop {
        tokio::select! {
            command = outbound.recv() => match command {
                Some(frame) => {
                    if let Err(e) = write.send(frame).await {
                        warn!("Failed to send WebSocket message: {}", e);
                        return Closure::Abnormal;
                    }
                }
                None => {
                    let _ = write.send(Message::Close(None)).await;
                    return Closure::Shutdown;
                }
            },
            inbound = read.next() => match inbound {
                Some(Ok(message)) => match message {
                    Message::Text(_) | Message::Binary(_) => dispatch(shared, message),
                    Message::Ping(data) => {
                        // Auto-respond to pings at transport level
                        if let Err(e) = write.send(Message::Pong(data)).await {
                            warn!("Failed to send pong response: {}", e);
                        }
                    }
                    Message::Close(frame) => {
                        let abnormal = frame
                            .as_ref()
                            .is_some_and(|f| f.code == CloseCode::Abnormal);
                        return if abnormal {
                            Closure::Abnormal
                        } else {
                            Closure::Deliberate
                        };
                    }
                    _ => {}
                },
                Some(Err(e)) => {
                    warn!("WebSocket transport error: {}", e);
                    return Closure::Abnormal;
                }
                None => return Closure::Abnormal,
            },
        }
    }
}

/// Forward a data frame, verbatim, to every registered handler.
fn dispatch(shared: &Shared, message: Message) {
    // Snapshot outside the lock so a handler may itself subscribe.
    let handlers: Vec<MessageHandler> = {
        let subs = shared.subscriptions.read().unwrap();
        subs.iter().filter_map(|sub| sub.handler.clone()).collect()
    };
    for handler in handlers {
        handler(message.clone());
    }
}
