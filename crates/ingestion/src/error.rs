//! Ingestion error types

use thiserror::Error;

/// Packet decoding error
///
/// Local to one packet: the caller drops the packet and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Payload shorter than the smallest decodable packet
    #[error("packet too small: {len} bytes (need at least {required})")]
    PacketTooShort {
        /// Observed payload length
        len: usize,
        /// Minimum accepted length
        required: usize,
    },
}

/// Ingestion error
#[derive(Debug, Error)]
pub enum IngestionError {
    /// A configured port could not be bound
    #[error("failed to bind UDP listener on {addr}: {source}")]
    ListenerBind {
        /// Address that failed
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// bind_address is not an IP address
    #[error("invalid bind address {addr:?}: {message}")]
    InvalidBindAddress {
        /// Offending address
        addr: String,
        /// Parse error
        message: String,
    },

    /// Listeners were already started
    #[error("listeners already started")]
    AlreadyStarted,
}

/// Ingestion Result type alias
pub type Result<T> = std::result::Result<T, IngestionError>;
