//! WebSocket client session: connect, then run the input and display loops together.

use std::fmt::Display;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, error::ProtocolError, protocol::Message},
};

use crate::{
    error::ClientError,
    input::spawn_line_reader,
    runner::{FirstFinished, run_until_first_finishes},
    ui,
};

/// Why the local-input loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalEnd {
    /// The user closed the input (Ctrl+C / Ctrl+D)
    InputClosed,
}

/// Why the remote-message loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEnd {
    /// The server closed the connection
    Closed,
}

/// Forward every local input line verbatim as a text frame.
///
/// When the input ends the sink is closed, which sends a close frame to the server.
pub async fn forward_input<S>(
    mut lines: mpsc::UnboundedReceiver<String>,
    mut sink: S,
) -> Result<LocalEnd, ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    while let Some(line) = lines.recv().await {
        sink.send(Message::Text(line.into()))
            .await
            .map_err(|e| ClientError::Connection(format!("failed to send message: {}", e)))?;
    }

    if let Err(e) = sink.close().await {
        tracing::debug!("Failed to close connection cleanly: {}", e);
    }
    Ok(LocalEnd::InputClosed)
}

/// Hand every received text frame to `display` until the server closes the channel.
pub async fn display_remote<St, D>(mut stream: St, mut display: D) -> Result<RemoteEnd, ClientError>
where
    St: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
    D: FnMut(&str),
{
    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Text(text)) => display(text.as_str()),
            Ok(Message::Close(frame)) => {
                tracing::info!("Server closed the connection: {:?}", frame);
                return Ok(RemoteEnd::Closed);
            }
            // Binary and control frames carry no chat lines
            Ok(_) => {}
            Err(e) if is_closure(&e) => {
                tracing::info!("Connection dropped: {}", e);
                return Ok(RemoteEnd::Closed);
            }
            Err(e) => return Err(ClientError::Connection(e.to_string())),
        }
    }
    Ok(RemoteEnd::Closed)
}

/// Only I/O failures mean the server could not be reached. Anything else happened
/// after the server answered.
fn handshake_error(url: &str, error: tungstenite::Error) -> ClientError {
    match error {
        tungstenite::Error::Io(e) => ClientError::Unreachable {
            url: url.to_string(),
            reason: e.to_string(),
        },
        other => ClientError::Connection(format!("handshake with {} failed: {}", url, other)),
    }
}

/// Errors that only mean the peer has gone away.
fn is_closure(error: &tungstenite::Error) -> bool {
    matches!(
        error,
        tungstenite::Error::ConnectionClosed
            | tungstenite::Error::AlreadyClosed
            | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    )
}

/// WebSocket URL of the chat endpoint for `username`, with the name
/// percent-encoded as a single path segment.
pub fn chat_url(host: &str, port: u16, username: &str) -> String {
    format!("ws://{}:{}/ws/{}", host, port, urlencoding::encode(username))
}

/// Run one chat session against `url` as `username`.
///
/// Returns once the user exits or the server closes the connection.
///
/// # Errors
///
/// * `ClientError::Unreachable` - No connection to the server could be opened
/// * `ClientError::Connection` - The server rejected the handshake, or the
///   connection broke while chatting
pub async fn run_client_session(url: &str, username: &str) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| handshake_error(url, e))?;

    tracing::info!("Connected to chat server at {}", url);
    ui::print_connected(username);

    let prompt = ui::prompt(username);
    let (write, read) = ws_stream.split();
    let lines = spawn_line_reader(prompt.clone());

    let local = forward_input(lines, write);
    let remote = display_remote(read, move |text| ui::print_incoming(text, &prompt));

    match run_until_first_finishes(local, remote).await? {
        FirstFinished::Local(result) => {
            result?;
            tracing::info!("Input closed, leaving the chat");
        }
        FirstFinished::Remote(result) => {
            result?;
            ui::print_closed();
        }
    }

    Ok(())
}
