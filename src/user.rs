//! User struct definition
//!
//! Represents a connected user's session state and outbound message channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::error::SendError;

/// Maximum time one delivery may wait on a full outbound buffer.
///
/// Bounds the cost of a single unresponsive client so a broadcast to
/// everyone else is never stalled indefinitely.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(1);

/// Connected user information
///
/// Holds the session state for one connection: the peer address (unique per
/// live connection), the display name (unique among registered users), and
/// the channel used to deliver text lines to this client.
#[derive(Debug, Clone)]
pub struct User {
    /// Peer address, unique per live connection
    pub addr: String,
    /// Display name, unique among currently registered users
    pub name: String,
    /// Server → client outbound sink
    pub sender: mpsc::Sender<String>,
}

impl User {
    /// Create a new user. The initial display name is the peer address.
    pub fn new(addr: String, sender: mpsc::Sender<String>) -> Self {
        Self {
            name: addr.clone(),
            addr,
            sender,
        }
    }

    /// Deliver one line of text to this user.
    ///
    /// Returns an error if the channel is closed (client disconnected) or
    /// the delivery does not complete within [`DELIVERY_TIMEOUT`].
    pub async fn send(&self, line: impl Into<String>) -> Result<(), SendError> {
        match timeout(DELIVERY_TIMEOUT, self.sender.send(line.into())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(SendError::ChannelClosed),
            Err(_) => Err(SendError::Timeout),
        }
    }
}
