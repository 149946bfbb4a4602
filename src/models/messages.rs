
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JoinMessage {
    pub note_id: String,
    pub session_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentChangeMessage {
    pub note_id: String,
    pub title: String,
    pub body: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CursorChangeMessage {
    pub note_id: String,
    pub session_id: String,
    pub position: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PingMessage {}

/// Messages received from clients over the collaboration socket.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ClientMessage {
    #[serde(rename = "join")]
    Join(JoinMessage),
    #[serde(rename = "contentChange")]
    ContentChange(ContentChangeMessage),
    #[serde(rename = "cursorChange")]
    CursorChange(CursorChangeMessage),
    #[serde(rename = "ping")]
    Ping(PingMessage),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdateMessage {
    pub title: String,
    pub body: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CursorUpdateMessage {
    pub session_id: String,
    pub position: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PongMessage {
    pub date: String,
}

/// Messages fanned out to the other participants of a room, plus pong replies.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "contentChange")]
    ContentChange(ContentUpdateMessage),
    #[serde(rename = "cursorChange")]
    CursorChange(CursorUpdateMessage),
    #[serde(rename = "pong")]
    Pong(PongMessage),
}
