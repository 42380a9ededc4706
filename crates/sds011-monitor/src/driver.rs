//! Sensor driver: byte pump between a transport and a protocol session.
//!
//! The driver owns the read/write halves of a transport (serial device node,
//! TCP bridge, in-memory pipe in tests) and a protocol session. Received
//! chunks are fed to the session and every decoded value is emitted on an
//! event channel; encoded command frames are queued through a handle and
//! written out by the same task.
//!
//! There is no request/response correlation and no retry: commands are
//! fire-and-forget, and the caller matches replies by their tag.

use sds011_protocol::{Command, CommandSession, Reading, Response, StreamSession};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Events emitted by a running driver.
#[derive(Debug)]
pub enum Event {
    /// The transport is open; commands may be issued.
    Ready,
    /// A decoded response (command/response mode).
    Response(Response),
    /// A decoded reading (streaming mode).
    Reading(Reading),
}

/// Handle for queueing commands to a command-mode driver.
#[derive(Clone)]
pub struct SensorHandle {
    cmd_tx: mpsc::Sender<Vec<u8>>,
}

impl SensorHandle {
    /// Queue a command for transmission.
    ///
    /// Fails only if the driver task has shut down.
    pub async fn send(&self, command: &Command) -> Result<(), mpsc::error::SendError<Vec<u8>>> {
        self.cmd_tx.send(command.encode()).await
    }
}

/// Spawn a command/response-mode driver over the given transport halves.
///
/// Returns a command handle and the event stream. The driver emits
/// [`Event::Ready`] once and then runs until the transport closes, the
/// event receiver is dropped, or the handle is dropped.
pub fn spawn_command_mode<R, W>(mut reader: R, mut writer: W) -> (SensorHandle, mpsc::Receiver<Event>)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Vec<u8>>(32);
    let (event_tx, event_rx) = mpsc::channel::<Event>(256);

    tokio::spawn(async move {
        let mut session = CommandSession::new();
        let mut read_buf = [0u8; 1024];

        if event_tx.send(Event::Ready).await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                result = reader.read(&mut read_buf) => {
                    match result {
                        Ok(0) => {
                            tracing::debug!("transport closed");
                            return;
                        }
                        Ok(n) => {
                            session.feed(&read_buf[..n]);
                            while let Some(response) = session.try_decode() {
                                if event_tx.send(Event::Response(response)).await.is_err() {
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            tracing::error!("transport read failed: {}", e);
                            return;
                        }
                    }
                }

                cmd = cmd_rx.recv() => {
                    let Some(bytes) = cmd else { return };
                    if let Err(e) = writer.write_all(&bytes).await {
                        tracing::error!("transport write failed: {}", e);
                        return;
                    }
                    if let Err(e) = writer.flush().await {
                        tracing::error!("transport flush failed: {}", e);
                        return;
                    }
                }
            }
        }
    });

    (SensorHandle { cmd_tx }, event_rx)
}

/// Spawn a streaming-mode driver over the given read half.
///
/// Streaming sensors emit readout frames continuously and take no commands,
/// so there is no handle; only the event stream is returned.
pub fn spawn_stream_mode<R>(mut reader: R) -> mpsc::Receiver<Event>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (event_tx, event_rx) = mpsc::channel::<Event>(256);

    tokio::spawn(async move {
        let mut session = StreamSession::new();
        let mut read_buf = [0u8; 1024];

        if event_tx.send(Event::Ready).await.is_err() {
            return;
        }

        loop {
            match reader.read(&mut read_buf).await {
                Ok(0) => {
                    tracing::debug!("transport closed");
                    return;
                }
                Ok(n) => {
                    session.feed(&read_buf[..n]);
                    while let Some(reading) = session.try_decode() {
                        if event_tx.send(Event::Reading(reading)).await.is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("transport read failed: {}", e);
                    return;
                }
            }
        }
    });

    event_rx
}
