//! axum `WebSocket` adapters for the channel traits.
//!
//! The upgraded socket is split in two: the stream becomes the session's
//! [`WebSocketInbound`], the sink is owned by a writer task fed through the
//! unbounded queue behind [`WebSocketOutbound`]. Sending only enqueues, so a peer
//! that stops reading never blocks the session or the registry's broadcast.

use std::fmt::Display;

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{Sink, SinkExt, StreamExt, stream::SplitStream};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::domain::{ChannelError, Inbound, Outbound};

/// Split an upgraded socket into its receive half, its send half and the writer
/// task that drains the send half into the socket.
pub fn split(socket: WebSocket) -> (WebSocketInbound, WebSocketOutbound, JoinHandle<()>) {
    let (sink, stream) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_frames(rx, sink));
    (
        WebSocketInbound { stream },
        WebSocketOutbound { tx },
        writer,
    )
}

/// Push queued frames into `sink` until the queue ends, a close frame has been
/// written, or the sink fails. The sink is closed afterwards.
async fn write_frames<S>(mut rx: mpsc::UnboundedReceiver<Message>, mut sink: S)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(message) = rx.recv().await {
        let closing = matches!(message, Message::Close(_));
        if let Err(e) = sink.send(message).await {
            tracing::debug!("Writer stopped: {}", e);
            break;
        }
        if closing {
            break;
        }
    }
    if let Err(e) = sink.close().await {
        tracing::debug!("Sink not closed cleanly: {}", e);
    }
}

/// Receive half over an axum WebSocket.
pub struct WebSocketInbound {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl Inbound for WebSocketInbound {
    async fn receive(&mut self) -> Result<String, ChannelError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
                Some(Ok(Message::Close(_))) | None => return Err(ChannelError::Closed),
                // Binary frames carry no chat text and do not count as activity
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!("Ignoring binary frame ({} bytes)", data.len());
                }
                // Ping/pong is handled by the WebSocket protocol layer
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(ChannelError::Transport(e.to_string())),
            }
        }
    }
}

/// Send half over an axum WebSocket.
///
/// Frames are queued in order and written by the connection's writer task.
pub struct WebSocketOutbound {
    tx: mpsc::UnboundedSender<Message>,
}

impl WebSocketOutbound {
    /// Queue a close frame. The writer stops after writing it.
    pub fn close(&self) {
        if self.tx.send(Message::Close(None)).is_err() {
            tracing::debug!("Close frame not queued: writer already stopped");
        }
    }
}

#[async_trait]
impl Outbound for WebSocketOutbound {
    async fn send(&self, text: &str) -> Result<(), ChannelError> {
        self.tx
            .send(Message::Text(text.to_owned().into()))
            .map_err(|_| ChannelError::Closed)
    }
}
