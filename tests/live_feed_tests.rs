use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use helmsman::channel::{
    ChannelError, ChannelMessage, FeedEvent, FeedExit, Link, LiveFeed, ParseError,
    ReconnectPolicy, Transport, WsTransport,
};
use helmsman::session::Session;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use url::Url;

// ============================================================================
// In-memory transport
// ============================================================================

/// The far end of a fake link, handed to the test on every accepted connect.
struct ServerEnd {
    to_client: UnboundedSender<String>,
    from_client: UnboundedReceiver<String>,
}

struct FakeTransport {
    supported: bool,
    refuse: bool,
    /// When set, each connect waits for a permit before answering
    gate: Option<Arc<Notify>>,
    connects: Arc<AtomicU32>,
    accepted: UnboundedSender<ServerEnd>,
}

#[async_trait]
impl Transport for FakeTransport {
    fn name(&self) -> &str {
        "fake"
    }

    fn supports(&self, _endpoint: &Url) -> bool {
        self.supported
    }

    async fn connect(&self, _endpoint: &Url) -> Result<Link, ChannelError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.refuse {
            return Err(ChannelError::Connect("connection refused".to_string()));
        }

        let (to_client, inbound) = mpsc::unbounded_channel();
        let (outbound, from_client) = mpsc::unbounded_channel();
        let _ = self.accepted.send(ServerEnd {
            to_client,
            from_client,
        });
        Ok(Link { inbound, outbound })
    }
}

struct Harness {
    connects: Arc<AtomicU32>,
    accepted: UnboundedReceiver<ServerEnd>,
    events: UnboundedReceiver<FeedEvent>,
    chat_tx: UnboundedSender<ChannelMessage>,
    handle: JoinHandle<FeedExit>,
}

fn fast_policy(max_attempts: u32) -> ReconnectPolicy {
    ReconnectPolicy {
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        max_attempts,
    }
}

fn start_feed(supported: bool, refuse: bool, policy: ReconnectPolicy) -> Harness {
    start_gated_feed(supported, refuse, None, policy)
}

fn start_gated_feed(
    supported: bool,
    refuse: bool,
    gate: Option<Arc<Notify>>,
    policy: ReconnectPolicy,
) -> Harness {
    let connects = Arc::new(AtomicU32::new(0));
    let (accepted_tx, accepted) = mpsc::unbounded_channel();
    let transport = FakeTransport {
        supported,
        refuse,
        gate,
        connects: connects.clone(),
        accepted: accepted_tx,
    };

    let endpoint = Url::parse("ws://localhost:8083/chat").unwrap();
    let feed = LiveFeed::new(endpoint, Arc::new(transport), policy);

    let (events_tx, events) = mpsc::unbounded_channel();
    let (chat_tx, chat_rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(feed.run(events_tx, chat_rx));

    Harness {
        connects,
        accepted,
        events,
        chat_tx,
        handle,
    }
}

async fn next_event(events: &mut UnboundedReceiver<FeedEvent>) -> FeedEvent {
    timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("timed out waiting for feed event")
        .expect("feed event channel closed")
}

async fn next_accept(accepted: &mut UnboundedReceiver<ServerEnd>) -> ServerEnd {
    timeout(Duration::from_secs(2), accepted.recv())
        .await
        .expect("timed out waiting for connect")
        .expect("transport dropped")
}

fn frame(author: &str, message: &str) -> String {
    format!(r#"{{"msgdate":"[14:05:09]","author":"{author}","message":"{message}"}}"#)
}

// ============================================================================
// Inbound frames
// ============================================================================

#[tokio::test]
async fn test_frames_arrive_in_order_and_bad_ones_are_rejected() {
    let mut h = start_feed(true, false, fast_policy(3));
    let server = next_accept(&mut h.accepted).await;
    assert_eq!(next_event(&mut h.events).await, FeedEvent::Opened);

    server.to_client.send(frame("bob", "first")).unwrap();
    server.to_client.send("not json at all".to_string()).unwrap();
    server.to_client.send(r#"{"author":"x","message":"y"}"#.to_string()).unwrap();
    server.to_client.send(frame("carol", "second")).unwrap();

    match next_event(&mut h.events).await {
        FeedEvent::Message(m) => {
            assert_eq!(m.author, "bob");
            assert_eq!(m.message, "first");
        }
        other => panic!("Expected message, got {:?}", other),
    }
    assert!(matches!(
        next_event(&mut h.events).await,
        FeedEvent::Rejected(ParseError::NotJson(_))
    ));
    assert_eq!(
        next_event(&mut h.events).await,
        FeedEvent::Rejected(ParseError::MissingField("msgdate"))
    );
    match next_event(&mut h.events).await {
        FeedEvent::Message(m) => assert_eq!(m.author, "carol"),
        other => panic!("Expected message, got {:?}", other),
    }

    h.handle.abort();
}

// ============================================================================
// Outbound messages
// ============================================================================

#[tokio::test]
async fn test_outgoing_message_wire_format() {
    let mut h = start_feed(true, false, fast_policy(3));
    let mut server = next_accept(&mut h.accepted).await;
    assert_eq!(next_event(&mut h.events).await, FeedEvent::Opened);

    h.chat_tx
        .send(ChannelMessage {
            msgdate: "[14:05:09]".to_string(),
            author: "alice".to_string(),
            message: "hi".to_string(),
        })
        .unwrap();

    let sent = timeout(Duration::from_secs(2), server.from_client.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        sent,
        r#"{"msgdate":"[14:05:09]","author":"alice","message":"hi"}"#
    );

    h.handle.abort();
}

async fn wait_for_connects(connects: &AtomicU32, n: u32) {
    timeout(Duration::from_secs(2), async {
        while connects.load(Ordering::SeqCst) < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("timed out waiting for connect attempt");
}

#[tokio::test]
async fn test_messages_sent_while_connecting_are_dropped() {
    let gate = Arc::new(Notify::new());
    let mut h = start_gated_feed(true, false, Some(gate.clone()), fast_policy(3));
    wait_for_connects(&h.connects, 1).await;

    // Handshake still pending
    h.chat_tx
        .send(ChannelMessage {
            msgdate: "[14:05:08]".to_string(),
            author: "alice".to_string(),
            message: "too early".to_string(),
        })
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    gate.notify_one();
    let mut server = next_accept(&mut h.accepted).await;
    assert_eq!(next_event(&mut h.events).await, FeedEvent::Opened);

    h.chat_tx
        .send(ChannelMessage {
            msgdate: "[14:05:09]".to_string(),
            author: "alice".to_string(),
            message: "hi".to_string(),
        })
        .unwrap();

    let sent = timeout(Duration::from_secs(2), server.from_client.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        sent,
        r#"{"msgdate":"[14:05:09]","author":"alice","message":"hi"}"#
    );

    h.handle.abort();
}

#[tokio::test]
async fn test_feed_detaches_while_connecting() {
    let gate = Arc::new(Notify::new());
    let h = start_gated_feed(true, false, Some(gate), fast_policy(3));
    wait_for_connects(&h.connects, 1).await;

    drop(h.chat_tx);

    let exit = timeout(Duration::from_secs(2), h.handle).await.unwrap().unwrap();
    assert_eq!(exit, FeedExit::Detached);
}

// ============================================================================
// Reconnect
// ============================================================================

#[tokio::test]
async fn test_close_triggers_exactly_one_reopen() {
    let mut h = start_feed(true, false, fast_policy(5));
    let server = next_accept(&mut h.accepted).await;
    assert_eq!(next_event(&mut h.events).await, FeedEvent::Opened);

    // Remote side hangs up
    drop(server);

    assert_eq!(next_event(&mut h.events).await, FeedEvent::Closed);
    match next_event(&mut h.events).await {
        FeedEvent::Retrying { attempt, .. } => assert_eq!(attempt, 1),
        other => panic!("Expected retry, got {:?}", other),
    }
    let _second = next_accept(&mut h.accepted).await;
    assert_eq!(next_event(&mut h.events).await, FeedEvent::Opened);

    // The second link stays open, so no further connects happen
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(h.connects.load(Ordering::SeqCst), 2);
    assert!(h.events.try_recv().is_err());

    h.handle.abort();
}

#[tokio::test]
async fn test_retry_counter_resets_after_successful_open() {
    let mut h = start_feed(true, false, fast_policy(5));

    for _ in 0..3 {
        let server = next_accept(&mut h.accepted).await;
        assert_eq!(next_event(&mut h.events).await, FeedEvent::Opened);
        drop(server);
        assert_eq!(next_event(&mut h.events).await, FeedEvent::Closed);
        match next_event(&mut h.events).await {
            FeedEvent::Retrying { attempt, .. } => assert_eq!(attempt, 1),
            other => panic!("Expected retry, got {:?}", other),
        }
    }

    h.handle.abort();
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let mut h = start_feed(true, true, fast_policy(3));

    for expected in 1..=3 {
        match next_event(&mut h.events).await {
            FeedEvent::Retrying { attempt, delay } => {
                assert_eq!(attempt, expected);
                assert!(delay <= Duration::from_millis(5));
            }
            other => panic!("Expected retry, got {:?}", other),
        }
    }
    assert_eq!(
        next_event(&mut h.events).await,
        FeedEvent::GaveUp { attempts: 3 }
    );

    let exit = timeout(Duration::from_secs(2), h.handle).await.unwrap().unwrap();
    assert_eq!(exit, FeedExit::GaveUp);
    // The first connect plus one per retry
    assert_eq!(h.connects.load(Ordering::SeqCst), 4);
}

// ============================================================================
// Exit conditions
// ============================================================================

#[tokio::test]
async fn test_unsupported_endpoint_reports_once_and_never_connects() {
    let mut h = start_feed(false, false, fast_policy(3));

    let exit = timeout(Duration::from_secs(2), h.handle).await.unwrap().unwrap();
    assert_eq!(exit, FeedExit::Unavailable);

    assert!(matches!(
        h.events.recv().await,
        Some(FeedEvent::Unavailable(_))
    ));
    // The feed is gone, so the channel is drained and closed
    assert_eq!(h.events.recv().await, None);
    assert_eq!(h.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_feed_detaches_when_ui_goes_away() {
    let mut h = start_feed(true, false, fast_policy(3));
    let _server = next_accept(&mut h.accepted).await;
    assert_eq!(next_event(&mut h.events).await, FeedEvent::Opened);

    drop(h.chat_tx);

    let exit = timeout(Duration::from_secs(2), h.handle).await.unwrap().unwrap();
    assert_eq!(exit, FeedExit::Detached);
}

// ============================================================================
// WebSocket transport
// ============================================================================

#[tokio::test]
async fn test_ws_transport_carries_cookies_and_frames() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut cookie = None;
        let mut ws = tokio_tungstenite::accept_hdr_async(stream, |req: &Request, resp: Response| {
            cookie = req
                .headers()
                .get("cookie")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Ok::<_, ErrorResponse>(resp)
        })
        .await
        .unwrap();

        ws.send(Message::Text(frame("bob", "hello").into()))
            .await
            .unwrap();

        let reply = loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => break text.to_string(),
                Some(Ok(_)) => continue,
                other => panic!("Expected text frame, got {:?}", other),
            }
        };
        (cookie, reply)
    });

    let session = Session::new(&format!("http://{addr}")).unwrap();
    session
        .jar()
        .add_cookie_str("player=owner-session; Path=/", session.base_url());
    let endpoint = session.chat_endpoint().unwrap();
    assert_eq!(endpoint.scheme(), "ws");

    let transport = WsTransport::new(session);
    let mut link = transport.connect(&endpoint).await.unwrap();

    let inbound = timeout(Duration::from_secs(2), link.inbound.recv())
        .await
        .unwrap()
        .unwrap();
    let decoded = ChannelMessage::decode(&inbound).unwrap();
    assert_eq!(decoded.author, "bob");
    assert_eq!(decoded.message, "hello");

    link.outbound.send(frame("alice", "hi back")).unwrap();

    let (cookie, reply) = timeout(Duration::from_secs(2), server)
        .await
        .unwrap()
        .unwrap();
    assert!(cookie.unwrap().contains("player=owner-session"));
    assert_eq!(reply, frame("alice", "hi back"));
}

#[tokio::test]
async fn test_ws_transport_connect_failure() {
    let transport = WsTransport::new(Session::new("http://127.0.0.1:9").unwrap());
    let endpoint = Url::parse("ws://127.0.0.1:9/chat").unwrap();

    assert!(matches!(
        transport.connect(&endpoint).await,
        Err(ChannelError::Connect(_))
    ));
}
