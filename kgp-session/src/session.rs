use crate::agent::Agent;
use crate::outbox::Outbox;
use crate::worker::run_worker;
use kgp_codec::{Command, Value};
use kgp_core::{Error, RequestId};
use kgp_transport::{LineReader, LineWriter};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Client identity announced during the handshake (§4.3).
///
/// Mirrors the teacher's preference for a plain struct built by field
/// construction over a config-file layer (robopoker's binaries take
/// `clap` args, never a config file, for the same reason).
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub name: Option<String>,
    pub authors: Vec<String>,
    pub token: Option<String>,
}

struct InFlight {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

/// Runs one KGP session end to end: handshake, dispatch loop, worker
/// lifecycle, until a fatal transition (§4.3, §7).
///
/// Owns the request table exclusively — no other task ever touches it,
/// matching §3's ownership rule ("The request table is owned by the
/// dispatcher and accessed from no other task").
pub struct Session {
    config: SessionConfig,
    agent: Arc<dyn Agent>,
}

impl Session {
    pub fn new<A: Agent>(config: SessionConfig, agent: A) -> Self {
        Session {
            config,
            agent: Arc::new(agent),
        }
    }

    /// Drive the session to completion over an already-connected
    /// transport pair. Returns once a fatal transition occurs
    /// (`goodbye`, `fail`, transport closed, or unsupported protocol
    /// version) — never due to a recoverable per-line error.
    pub async fn run(
        self,
        reader: Box<dyn LineReader>,
        writer: Box<dyn LineWriter>,
    ) -> Result<(), Error> {
        let (tx, rx) = mpsc::unbounded_channel::<Command>();
        let outbox = Outbox::new(tx);

        let sender = tokio::spawn(run_sender(writer, rx));

        let result = dispatch_loop(reader, outbox, self.agent, self.config).await;

        // Sender exits once every Outbox clone (ours, and every
        // worker's) has been dropped and the channel drains.
        let _ = sender.await;

        result
    }
}

async fn run_sender(mut writer: Box<dyn LineWriter>, mut rx: mpsc::UnboundedReceiver<Command>) {
    while let Some(cmd) = rx.recv().await {
        if !writer.write_line(&cmd.to_string()).await {
            break;
        }
    }
}

async fn dispatch_loop(
    mut reader: Box<dyn LineReader>,
    outbox: Outbox,
    agent: Arc<dyn Agent>,
    config: SessionConfig,
) -> Result<(), Error> {
    let mut requests: HashMap<RequestId, InFlight> = HashMap::new();
    let mut handshaken = false;

    let result = loop {
        let line = match reader.read_line().await {
            Some(l) => l,
            None => break Err(Error::TransportClosed),
        };

        let Some(cmd) = Command::parse(&line) else {
            continue;
        };

        match cmd.name.as_str() {
            "kgp" if !handshaken => match parse_version(&cmd.args) {
                Some((1, _, _)) => {
                    handshaken = true;
                    send_handshake_reply(&outbox, &config);
                }
                Some((major, minor, patch)) => {
                    outbox.send(
                        cmd.id,
                        "error",
                        vec![Value::Str("protocol not supported".to_string())],
                    );
                    break Err(Error::UnsupportedVersion { major, minor, patch });
                }
                None => continue,
            },
            "state" => {
                let Some(id) = cmd.id else { continue };
                let Some(Value::Board(board)) = cmd.args.first() else {
                    continue;
                };
                // Duplicate ids are ignored, not errors (§3 Request lifecycle).
                requests.entry(id).or_insert_with(|| {
                    let cancel = CancellationToken::new();
                    let handle = tokio::spawn(run_worker(
                        id,
                        board.clone(),
                        agent.clone(),
                        outbox.clone(),
                        cancel.clone(),
                    ));
                    InFlight { handle, cancel }
                });
            }
            "stop" => {
                if let Some(r) = cmd.reference {
                    if let Some(w) = requests.remove(&r) {
                        w.cancel.cancel();
                        w.handle.abort();
                    }
                    // Subsequent stop @r for the same id: no-op, already absent.
                }
            }
            "ping" => {
                let args = match cmd.args.first() {
                    Some(arg) => vec![arg.clone()],
                    None => Vec::new(),
                };
                outbox.send(cmd.id, "pong", args);
            }
            "ok" | "error" => {
                log::debug!("received {}: {}", cmd.name, line);
            }
            "goodbye" => break Ok(()),
            "fail" => break Err(Error::Fail),
            // Unknown commands, and a re-sent "kgp" after handshake, are
            // silently ignored (§4.3 dispatch table, §7 malformed line policy).
            _ => {}
        }
    };

    for (_, w) in requests {
        w.cancel.cancel();
        w.handle.abort();
    }

    result
}

fn parse_version(args: &[Value]) -> Option<(u32, u32, u32)> {
    let [Value::Int(major), Value::Int(minor), Value::Int(patch)] = args else {
        return None;
    };
    let major = u32::try_from(*major).ok()?;
    let minor = u32::try_from(*minor).ok()?;
    let patch = u32::try_from(*patch).ok()?;
    Some((major, minor, patch))
}

fn send_handshake_reply(outbox: &Outbox, config: &SessionConfig) {
    if let Some(name) = &config.name {
        outbox.send(
            None,
            "set",
            vec![Value::Raw("info:name".to_string()), Value::Str(name.clone())],
        );
    }
    if !config.authors.is_empty() {
        outbox.send(
            None,
            "set",
            vec![
                Value::Raw("info:authors".to_string()),
                Value::Str(config.authors.join(", ")),
            ],
        );
    }
    if let Some(token) = &config.token {
        outbox.send(
            None,
            "set",
            vec![Value::Raw("auth:token".to_string()), Value::Str(token.clone())],
        );
    }
    outbox.send(None, "mode", vec![Value::Raw("freeplay".to_string())]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::stream;
    use std::sync::Mutex;

    struct ScriptReader {
        lines: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LineReader for ScriptReader {
        async fn read_line(&mut self) -> Option<String> {
            // Give spawned worker tasks a scheduling turn between each
            // scripted line, so natural-completion sends land before a
            // following `stop`/`goodbye` would abort them.
            tokio::task::yield_now().await;
            let mut lines = self.lines.lock().unwrap();
            if lines.is_empty() {
                None
            } else {
                Some(lines.remove(0))
            }
        }
    }

    struct RecordingWriter {
        sent: mpsc::UnboundedSender<String>,
    }

    #[async_trait]
    impl LineWriter for RecordingWriter {
        async fn write_line(&mut self, line: &str) -> bool {
            self.sent.send(line.to_string()).is_ok()
        }
    }

    fn reader(lines: &[&str]) -> Box<dyn LineReader> {
        Box::new(ScriptReader {
            lines: Mutex::new(lines.iter().map(|s| s.to_string()).collect()),
        })
    }

    struct NullAgent;
    impl Agent for NullAgent {
        fn search(&self, _board: kgp_board::Board) -> crate::agent::MoveStream {
            Box::pin(stream::iter(std::iter::empty()))
        }
    }

    #[tokio::test]
    async fn handshake_then_goodbye() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let writer = Box::new(RecordingWriter { sent: tx });
        let session = Session::new(
            SessionConfig {
                name: Some("magenta".to_string()),
                authors: vec![],
                token: None,
            },
            NullAgent,
        );
        let r = reader(&["kgp 1 0 0", "goodbye"]);
        let result = session.run(r, writer).await;
        assert!(result.is_ok());

        let mut lines = Vec::new();
        while let Ok(l) = rx.try_recv() {
            lines.push(l);
        }
        assert_eq!(lines[0], "1 set info:name \"magenta\"");
        assert_eq!(lines[1], "3 mode freeplay");
    }

    #[tokio::test]
    async fn unsupported_version_rejects_and_terminates() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let writer = Box::new(RecordingWriter { sent: tx });
        let session = Session::new(SessionConfig::default(), NullAgent);
        let r = reader(&["5 kgp 2 0 0"]);
        let result = session.run(r, writer).await;
        assert!(matches!(result, Err(Error::UnsupportedVersion { major: 2, .. })));

        let mut lines = Vec::new();
        while let Ok(l) = rx.try_recv() {
            lines.push(l);
        }
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "1@5 error \"protocol not supported\"");
    }

    #[tokio::test]
    async fn ping_echoes_with_reference() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let writer = Box::new(RecordingWriter { sent: tx });
        let session = Session::new(SessionConfig::default(), NullAgent);
        let r = reader(&["kgp 1 0 0", "3 ping \"hello\"", "goodbye"]);
        session.run(r, writer).await.unwrap();

        let mut lines = Vec::new();
        while let Ok(l) = rx.try_recv() {
            lines.push(l);
        }
        assert!(lines.contains(&"3@3 pong \"hello\"".to_string()));
    }

    #[tokio::test]
    async fn transport_closed_is_reported() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let writer = Box::new(RecordingWriter { sent: tx });
        let session = Session::new(SessionConfig::default(), NullAgent);
        let r = reader(&["kgp 1 0 0"]);
        let result = session.run(r, writer).await;
        assert!(matches!(result, Err(Error::TransportClosed)));
    }

    #[tokio::test]
    async fn fail_terminates_without_reply() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let writer = Box::new(RecordingWriter { sent: tx });
        let session = Session::new(SessionConfig::default(), NullAgent);
        let r = reader(&["kgp 1 0 0", "fail"]);
        let result = session.run(r, writer).await;
        assert!(matches!(result, Err(Error::Fail)));
        let mut lines = Vec::new();
        while let Ok(l) = rx.try_recv() {
            lines.push(l);
        }
        assert_eq!(lines.len(), 1); // only the mode freeplay line
    }

    #[tokio::test]
    async fn duplicate_state_ids_spawn_one_worker() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let writer = Box::new(RecordingWriter { sent: tx });
        let session = Session::new(SessionConfig::default(), NullAgent);
        let r = reader(&[
            "kgp 1 0 0",
            "7 state <3,0,0,1,1,1,1,1,1>",
            "7 state <3,0,0,1,1,1,1,1,1>",
            "goodbye",
        ]);
        session.run(r, writer).await.unwrap();

        let mut lines = Vec::new();
        while let Ok(l) = rx.try_recv() {
            lines.push(l);
        }
        let yields = lines.iter().filter(|l| l.contains("yield")).count();
        assert_eq!(yields, 1);
    }
}
