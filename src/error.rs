use thiserror::Error;

/// Why a decoded record was not applied to the dashboard state.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("topology snapshot rejected: {0}")]
    Topology(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("frame is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("engine channel closed")]
    ChannelClosed,
}
