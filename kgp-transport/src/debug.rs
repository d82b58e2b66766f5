use crate::{LineReader, LineWriter};

/// Wraps a [`LineReader`], logging every inbound line at `debug` level
/// prefixed `<`, matching the protocol's debug-mode wire tracing (§6).
///
/// Implemented as a `log::debug!` tap rather than a bespoke tracing
/// stream, the same way the teacher logs actor traffic
/// (`log::debug!("[actor P{}] ...")`) instead of building a dedicated
/// event bus for it.
pub struct DebugLineReader<R> {
    inner: R,
}

impl<R> DebugLineReader<R> {
    pub fn new(inner: R) -> Self {
        DebugLineReader { inner }
    }
}

#[async_trait::async_trait]
impl<R: LineReader> LineReader for DebugLineReader<R> {
    async fn read_line(&mut self) -> Option<String> {
        let line = self.inner.read_line().await;
        if let Some(ref l) = line {
            log::debug!("< {}", l);
        }
        line
    }
}

/// Wraps a [`LineWriter`], logging every outbound line at `debug` level
/// prefixed `>`.
pub struct DebugLineWriter<W> {
    inner: W,
}

impl<W> DebugLineWriter<W> {
    pub fn new(inner: W) -> Self {
        DebugLineWriter { inner }
    }
}

#[async_trait::async_trait]
impl<W: LineWriter> LineWriter for DebugLineWriter<W> {
    async fn write_line(&mut self, line: &str) -> bool {
        log::debug!("> {}", line);
        self.inner.write_line(line).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedReader {
        lines: Vec<String>,
    }

    #[async_trait::async_trait]
    impl LineReader for FixedReader {
        async fn read_line(&mut self) -> Option<String> {
            if self.lines.is_empty() {
                None
            } else {
                Some(self.lines.remove(0))
            }
        }
    }

    struct NullWriter;

    #[async_trait::async_trait]
    impl LineWriter for NullWriter {
        async fn write_line(&mut self, _line: &str) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn debug_reader_passes_lines_through() {
        let mut r = DebugLineReader::new(FixedReader {
            lines: vec!["kgp 1 0 0".to_string()],
        });
        assert_eq!(r.read_line().await, Some("kgp 1 0 0".to_string()));
        assert_eq!(r.read_line().await, None);
    }

    #[tokio::test]
    async fn debug_writer_passes_through() {
        let mut w = DebugLineWriter::new(NullWriter);
        assert!(w.write_line("1 mode freeplay").await);
    }
}
