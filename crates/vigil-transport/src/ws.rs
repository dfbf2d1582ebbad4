//! Adapter between the axum WebSocket and the session transport seam.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{
    SinkExt, StreamExt,
    stream::{SplitSink, SplitStream},
};
use vigil_session::{MessageSink, MessageStream, SessionTransport, TransportError};

/// One accepted WebSocket connection.
pub struct WsTransport {
    socket: WebSocket,
}

impl WsTransport {
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl SessionTransport for WsTransport {
    type Tx = WsSink;
    type Rx = WsStream;

    fn split(self) -> (Self::Tx, Self::Rx) {
        let (sink, stream) = self.socket.split();
        (WsSink { sink }, WsStream { stream })
    }
}

/// Sending half of the socket.
pub struct WsSink {
    sink: SplitSink<WebSocket, Message>,
}

impl MessageSink for WsSink {
    async fn send(&mut self, text: String) -> Result<(), TransportError> {
        self.sink
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| TransportError::Write(e.to_string()))
    }

    async fn close(&mut self) {
        // Sends the close frame; an already-gone peer is fine.
        let _ = self.sink.close().await;
    }
}

/// Receiving half of the socket.
pub struct WsStream {
    stream: SplitStream<WebSocket>,
}

impl MessageStream for WsStream {
    async fn recv(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text.to_string())),
                // Peers may speak binary; treat it as any other message.
                Some(Ok(Message::Binary(data))) => {
                    return Some(Ok(String::from_utf8_lossy(&data).into_owned()));
                }
                // Control frames are not activity.
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | None => return None,
                Some(Err(e)) => return Some(Err(TransportError::Read(e.to_string()))),
            }
        }
    }
}
