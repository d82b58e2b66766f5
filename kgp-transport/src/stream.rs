use crate::{LineReader, LineTransport, LineWriter};
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};

/// A raw TCP stream socket, ASCII with `\r\n` framing (§6a). Default
/// port 2671.
pub struct StreamTransport {
    stream: TcpStream,
}

impl StreamTransport {
    pub async fn connect(host: &str, port: u16) -> std::io::Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        Ok(StreamTransport { stream })
    }
}

impl LineTransport for StreamTransport {
    fn split(self: Box<Self>) -> (Box<dyn LineReader>, Box<dyn LineWriter>) {
        let (read, write) = self.stream.into_split();
        (
            Box::new(StreamReader {
                inner: BufReader::new(read),
            }),
            Box::new(StreamWriter { inner: write }),
        )
    }
}

struct StreamReader {
    inner: BufReader<OwnedReadHalf>,
}

#[async_trait::async_trait]
impl LineReader for StreamReader {
    async fn read_line(&mut self) -> Option<String> {
        let mut buf = String::new();
        match self.inner.read_line(&mut buf).await {
            Ok(0) => None,
            Ok(_) => {
                while buf.ends_with('\n') || buf.ends_with('\r') {
                    buf.pop();
                }
                Some(buf)
            }
            Err(_) => None,
        }
    }
}

struct StreamWriter {
    inner: OwnedWriteHalf,
}

#[async_trait::async_trait]
impl LineWriter for StreamWriter {
    async fn write_line(&mut self, line: &str) -> bool {
        if self.inner.write_all(line.as_bytes()).await.is_err() {
            return false;
        }
        if self.inner.write_all(b"\r\n").await.is_err() {
            return false;
        }
        self.inner.flush().await.is_ok()
    }
}
