//! Error types for the chat server
//!
//! Defines application-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers fatal connection errors only. Command-level problems (malformed
/// `to` syntax, duplicate names, empty broadcasts) are not errors; they are
/// reply lines sent back to the offending client.
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,
}

/// Message send errors
///
/// Occurs when attempting to deliver a line to a client's outbound channel.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// Delivery did not complete within the per-recipient timeout
    #[error("Delivery timed out")]
    Timeout,
}
