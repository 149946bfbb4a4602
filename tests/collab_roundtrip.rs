//! End-to-end collaboration tests over a real WebSocket server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use collabnote::client::channel::CollabChannel;
use collabnote::client::session::{CollabSession, SessionState};
use collabnote::models::{ClientMessage, PingMessage, ServerMessage};
use collabnote::routes::build_app;
use collabnote::ws::registry::RoomRegistry;

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE_TIMEOUT: Duration = Duration::from_millis(250);

async fn start_server() -> SocketAddr {
    let registry = Arc::new(RoomRegistry::new());
    let app = build_app(registry);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn raw_client(addr: SocketAddr) -> WsClient {
    let (stream, _response) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    stream
}

async fn send_json(client: &mut WsClient, json: serde_json::Value) {
    client.send(Message::text(json.to_string())).await.unwrap();
}

async fn recv_json(client: &mut WsClient) -> serde_json::Value {
    loop {
        let frame = timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a message")
            .expect("connection closed")
            .unwrap();
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Assert that nothing arrives on this client for a short interval.
async fn assert_silent(client: &mut WsClient) {
    let res = timeout(SILENCE_TIMEOUT, client.next()).await;
    assert!(res.is_err(), "expected silence, got {:?}", res);
}

/// Join a room and wait for the server to acknowledge processing via a
/// ping/pong exchange, so later broadcasts cannot race the join.
async fn join_and_sync(client: &mut WsClient, note_id: &str, session_id: &str) {
    send_json(
        client,
        serde_json::json!({"type": "join", "noteId": note_id, "sessionId": session_id}),
    )
    .await;
    send_json(client, serde_json::json!({"type": "ping"})).await;
    let pong = recv_json(client).await;
    assert_eq!(pong["type"], "pong");
}

#[tokio::test]
async fn content_change_reaches_the_room_and_only_the_room() {
    let addr = start_server().await;

    let mut alice = raw_client(addr).await;
    let mut bob = raw_client(addr).await;
    let mut carol = raw_client(addr).await;

    join_and_sync(&mut alice, "note-42", "alice-session").await;
    join_and_sync(&mut bob, "note-42", "bob-session").await;
    join_and_sync(&mut carol, "note-7", "carol-session").await;

    send_json(
        &mut alice,
        serde_json::json!({"type": "contentChange", "noteId": "note-42", "title": "Hello", "body": "World"}),
    )
    .await;

    let received = recv_json(&mut bob).await;
    assert_eq!(
        received,
        serde_json::json!({"type": "contentChange", "title": "Hello", "body": "World"})
    );

    // The sender gets no echo and the other room sees nothing.
    assert_silent(&mut alice).await;
    assert_silent(&mut carol).await;
}

#[tokio::test]
async fn cursor_change_fans_out_with_the_session_id() {
    let addr = start_server().await;

    let mut alice = raw_client(addr).await;
    let mut bob = raw_client(addr).await;

    join_and_sync(&mut alice, "note-42", "alice-session").await;
    join_and_sync(&mut bob, "note-42", "bob-session").await;

    send_json(
        &mut alice,
        serde_json::json!({"type": "cursorChange", "noteId": "note-42", "sessionId": "alice-session", "position": 11}),
    )
    .await;

    let received = recv_json(&mut bob).await;
    assert_eq!(
        received,
        serde_json::json!({"type": "cursorChange", "sessionId": "alice-session", "position": 11})
    );
    assert_silent(&mut alice).await;
}

#[tokio::test]
async fn rejoining_a_different_note_moves_the_connection() {
    let addr = start_server().await;

    let mut alice = raw_client(addr).await;
    let mut bob = raw_client(addr).await;
    let mut carol = raw_client(addr).await;

    join_and_sync(&mut alice, "note-42", "alice-session").await;
    join_and_sync(&mut bob, "note-42", "bob-session").await;
    join_and_sync(&mut carol, "note-7", "carol-session").await;

    // Alice switches to note-7.
    join_and_sync(&mut alice, "note-7", "alice-session").await;

    // Traffic in the old room no longer reaches her...
    send_json(
        &mut bob,
        serde_json::json!({"type": "contentChange", "noteId": "note-42", "title": "Old", "body": "room"}),
    )
    .await;
    assert_silent(&mut alice).await;

    // ...but traffic in the new room does.
    send_json(
        &mut carol,
        serde_json::json!({"type": "contentChange", "noteId": "note-7", "title": "New", "body": "room"}),
    )
    .await;
    let received = recv_json(&mut alice).await;
    assert_eq!(received["title"], "New");
}

#[tokio::test]
async fn last_delivered_content_change_wins_under_a_fixed_order() {
    let addr = start_server().await;

    let mut alice = raw_client(addr).await;
    let mut bob = raw_client(addr).await;
    let mut observer = raw_client(addr).await;

    join_and_sync(&mut alice, "note-42", "alice-session").await;
    join_and_sync(&mut bob, "note-42", "bob-session").await;
    join_and_sync(&mut observer, "note-42", "observer-session").await;

    // Fix the delivery order by letting Alice's change land before Bob
    // sends his.
    send_json(
        &mut alice,
        serde_json::json!({"type": "contentChange", "noteId": "note-42", "title": "A", "body": "from alice"}),
    )
    .await;
    let first = recv_json(&mut observer).await;
    assert_eq!(first["title"], "A");

    send_json(
        &mut bob,
        serde_json::json!({"type": "contentChange", "noteId": "note-42", "title": "B", "body": "from bob"}),
    )
    .await;
    let second = recv_json(&mut observer).await;
    assert_eq!(second["title"], "B");

    // Alice's editor, overwritten in delivery order, ends on Bob's text.
    let on_alice = recv_json(&mut alice).await;
    assert_eq!(on_alice["title"], "B");
}

#[tokio::test]
async fn client_session_and_channel_round_trip() {
    let addr = start_server().await;

    // A raw peer already in the room.
    let mut peer = raw_client(addr).await;
    join_and_sync(&mut peer, "note-42", "peer-session").await;

    // The library client joins through the session state machine.
    let mut session = CollabSession::new("lib-session");
    session.open_note("note-42", "", "");
    let mut channel = CollabChannel::connect(&format!("ws://{addr}/ws")).await.unwrap();
    session.on_connected();
    assert_eq!(session.state(), SessionState::Joined);
    channel.flush_session(&mut session).await.unwrap();

    // Barrier so the join is processed before the peer broadcasts.
    channel.send(&ClientMessage::Ping(PingMessage {})).await.unwrap();
    match channel.recv().await {
        Some(ServerMessage::Pong(_)) => {}
        other => panic!("expected pong, got {other:?}"),
    }

    send_json(
        &mut peer,
        serde_json::json!({"type": "contentChange", "noteId": "note-42", "title": "Hello", "body": "World"}),
    )
    .await;
    send_json(
        &mut peer,
        serde_json::json!({"type": "cursorChange", "noteId": "note-42", "sessionId": "peer-session", "position": 5}),
    )
    .await;

    match channel.recv().await {
        Some(msg @ ServerMessage::ContentChange(_)) => session.apply(msg),
        other => panic!("expected content change, got {other:?}"),
    }
    match channel.recv().await {
        Some(msg @ ServerMessage::CursorChange(_)) => session.apply(msg),
        other => panic!("expected cursor change, got {other:?}"),
    }

    assert_eq!(session.title(), "Hello");
    assert_eq!(session.body(), "World");
    assert_eq!(session.remote_carets().get("peer-session"), Some(&5));

    // Local edits flow back out to the peer as full documents.
    session.edit("Hello!", "World!");
    channel.flush_session(&mut session).await.unwrap();
    let on_peer = recv_json(&mut peer).await;
    assert_eq!(
        on_peer,
        serde_json::json!({"type": "contentChange", "title": "Hello!", "body": "World!"})
    );

    channel.close().await;
}

#[tokio::test]
async fn disconnecting_removes_the_participant_from_the_room() {
    let addr = start_server().await;

    let mut alice = raw_client(addr).await;
    let mut bob = raw_client(addr).await;

    join_and_sync(&mut alice, "note-42", "alice-session").await;
    join_and_sync(&mut bob, "note-42", "bob-session").await;

    bob.close(None).await.unwrap();
    // Give the server a moment to observe the close.
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Broadcasting into a room where everyone else left is a no-op.
    send_json(
        &mut alice,
        serde_json::json!({"type": "contentChange", "noteId": "note-42", "title": "x", "body": "y"}),
    )
    .await;
    assert_silent(&mut alice).await;

    // The connection is still healthy.
    send_json(&mut alice, serde_json::json!({"type": "ping"})).await;
    assert_eq!(recv_json(&mut alice).await["type"], "pong");
}
