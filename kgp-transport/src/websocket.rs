use crate::{LineReader, LineTransport, LineWriter};
use futures::SinkExt;
use futures::StreamExt;
use futures::stream::{SplitSink, SplitStream};
use tokio::net::TcpStream;
use tokio_tungstenite::MaybeTlsStream;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A WebSocket connection where each inbound frame is one command line
/// (§6b) — selected when the configured host starts with `ws`.
pub struct WebSocketTransport {
    stream: WsStream,
}

impl WebSocketTransport {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let (stream, _response) = tokio_tungstenite::connect_async(url).await?;
        Ok(WebSocketTransport { stream })
    }
}

impl LineTransport for WebSocketTransport {
    fn split(self: Box<Self>) -> (Box<dyn LineReader>, Box<dyn LineWriter>) {
        let (sink, stream) = self.stream.split();
        (
            Box::new(WebSocketReader { inner: stream }),
            Box::new(WebSocketWriter { inner: sink }),
        )
    }
}

struct WebSocketReader {
    inner: SplitStream<WsStream>,
}

#[async_trait::async_trait]
impl LineReader for WebSocketReader {
    async fn read_line(&mut self) -> Option<String> {
        loop {
            match self.inner.next().await? {
                Ok(Message::Text(text)) => return Some(text.to_string()),
                Ok(Message::Close(_)) => return None,
                Ok(_) => continue, // binary/ping/pong frames carry no command lines
                Err(_) => return None,
            }
        }
    }
}

struct WebSocketWriter {
    inner: SplitSink<WsStream, Message>,
}

#[async_trait::async_trait]
impl LineWriter for WebSocketWriter {
    async fn write_line(&mut self, line: &str) -> bool {
        self.inner.send(Message::Text(line.to_string().into())).await.is_ok()
    }
}
