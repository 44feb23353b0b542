//! WebSocket client feeding the engine.
//!
//! Each text frame carries one JSON record. Frames are forwarded in arrival order; anything that
//! fails to decode is dropped here and never reaches the engine.

use crate::engine::Inbound;
use crate::error::TransportError;
use futures_util::{Stream, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{info, warn};

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub endpoint: String,
    pub reconnect_delay: Duration,
}

pub fn decode_frame(payload: &[u8]) -> Result<Value, TransportError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Connects to the endpoint and forwards records until the engine goes away. A dropped
/// connection is re-dialled after `reconnect_delay`; the engine is told about every reconnect.
pub async fn run(config: TransportConfig, tx: mpsc::Sender<Inbound>) -> Result<(), TransportError> {
    let mut connected_before = false;

    loop {
        match connect_async(config.endpoint.as_str()).await {
            Ok((stream, response)) => {
                info!(
                    endpoint = %config.endpoint,
                    status = %response.status(),
                    "transport connected"
                );
                if connected_before {
                    tx.send(Inbound::Reconnected)
                        .await
                        .map_err(|_| TransportError::ChannelClosed)?;
                }
                connected_before = true;

                match pump(stream, &tx).await {
                    Ok(forwarded) => info!(forwarded, "transport closed by peer"),
                    Err(TransportError::ChannelClosed) => {
                        return Err(TransportError::ChannelClosed)
                    }
                    Err(e) => warn!(error = %e, "transport connection lost"),
                }
            }
            Err(e) => warn!(endpoint = %config.endpoint, error = %e, "transport connect failed"),
        }

        tokio::time::sleep(config.reconnect_delay).await;
    }
}

/// Forwards decoded frames from one connection. Returns the number of records forwarded when the
/// peer closes the stream.
pub async fn pump<S>(mut stream: S, tx: &mpsc::Sender<Inbound>) -> Result<u64, TransportError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    let mut forwarded = 0;

    while let Some(frame) = stream.next().await {
        let payload = match frame? {
            Message::Text(text) => text.into_bytes(),
            Message::Binary(bytes) => bytes,
            Message::Close(_) => break,
            _ => continue,
        };

        match decode_frame(&payload) {
            Ok(record) => {
                tx.send(Inbound::Record(record))
                    .await
                    .map_err(|_| TransportError::ChannelClosed)?;
                forwarded += 1;
            }
            Err(e) => warn!(error = %e, bytes = payload.len(), "dropping undecodable frame"),
        }
    }

    Ok(forwarded)
}
