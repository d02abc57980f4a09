//! TCP link to the controller
//!
//! Each event is one JSON object terminated by `\n`. Outgoing events go
//! through a queue drained by a writer task, so `send` never waits on the
//! socket. A reader task parses incoming lines and broadcasts them.

use std::net::SocketAddr;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{ControllerEvent, ControllerLink, LinkError};
use crate::config::TcpLinkConfig;

pub struct TcpLink {
    peer: SocketAddr,
    outgoing: mpsc::UnboundedSender<ControllerEvent>,
    incoming_tx: broadcast::Sender<ControllerEvent>,
    connected: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl TcpLink {
    /// Connect to the controller and start the reader/writer tasks
    pub async fn connect(config: &TcpLinkConfig) -> Result<Self, LinkError> {
        let stream = tokio::time::timeout(
            config.connect_timeout(),
            TcpStream::connect(&config.address),
        )
        .await
        .map_err(|_| {
            LinkError::ConnectionFailed(format!(
                "Timed out connecting to {} after {:?}",
                config.address,
                config.connect_timeout()
            ))
        })?
        .map_err(|e| LinkError::ConnectionFailed(format!("{}: {}", config.address, e)))?;

        Self::from_stream(stream)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self, LinkError> {
        let peer = stream
            .peer_addr()
            .map_err(|e| LinkError::ConnectionFailed(e.to_string()))?;
        stream
            .set_nodelay(true)
            .map_err(|e| LinkError::InvalidConfig(e.to_string()))?;

        let (read_half, write_half) = stream.into_split();
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let (incoming_tx, _) = broadcast::channel(256);
        let (connected, _) = watch::channel(true);

        let writer = tokio::spawn(Self::write_loop(
            write_half,
            outgoing_rx,
            connected.clone(),
        ));
        let reader = tokio::spawn(Self::read_loop(
            read_half,
            incoming_tx.clone(),
            connected.clone(),
        ));

        info!(%peer, "Connected to controller");

        Ok(Self {
            peer,
            outgoing,
            incoming_tx,
            connected,
            tasks: Mutex::new(vec![writer, reader]),
        })
    }

    /// Address of the controller
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    async fn write_loop(
        mut socket: OwnedWriteHalf,
        mut queue: mpsc::UnboundedReceiver<ControllerEvent>,
        connected: watch::Sender<bool>,
    ) {
        while let Some(event) = queue.recv().await {
            let mut frame = match serde_json::to_vec(&event) {
                Ok(frame) => frame,
                Err(e) => {
                    error!(event = %event.event, error = %e, "Failed to encode event");
                    continue;
                }
            };
            frame.push(b'\n');

            if let Err(e) = socket.write_all(&frame).await {
                error!(event = %event.event, error = %e, "Failed to write to controller");
                connected.send_replace(false);
                break;
            }
            debug!(event = %event.event, "Sent event to controller");
        }
    }

    async fn read_loop(
        socket: OwnedReadHalf,
        incoming_tx: broadcast::Sender<ControllerEvent>,
        connected: watch::Sender<bool>,
    ) {
        let mut lines = BufReader::new(socket).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match parse_frame(line) {
                        Ok(event) => {
                            debug!(event = %event.event, "Received event from controller");
                            let _ = incoming_tx.send(event);
                        }
                        Err(e) => warn!(error = %e, "Skipping malformed frame"),
                    }
                }
                Ok(None) => {
                    info!("Controller closed the connection");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Failed to read from controller");
                    break;
                }
            }
        }
        connected.send_replace(false);
    }
}

fn parse_frame(line: &str) -> Result<ControllerEvent, LinkError> {
    serde_json::from_str(line).map_err(|e| LinkError::InvalidFrame(e.to_string()))
}

#[async_trait]
impl ControllerLink for TcpLink {
    async fn send(&self, event: &ControllerEvent) -> Result<(), LinkError> {
        if !*self.connected.borrow() {
            return Err(LinkError::ConnectionClosed);
        }
        self.outgoing
            .send(event.clone())
            .map_err(|_| LinkError::ConnectionClosed)
    }

    fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.incoming_tx.subscribe()
    }

    fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    async fn closed(&self) {
        let mut rx = self.connected.subscribe();
        let _ = rx.wait_for(|connected| !*connected).await;
    }
}

impl Drop for TcpLink {
    fn drop(&mut self) {
        for handle in self.tasks.lock().drain(..) {
            handle.abort();
        }
    }
}
