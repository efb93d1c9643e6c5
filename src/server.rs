//! ChatServer Actor implementation
//!
//! The central actor that owns the online registry and the command table.
//! Uses the Actor pattern with mpsc channels for message passing; every
//! registry mutation runs on this one task, so register, unregister, and
//! rename are linearized without locks.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::command::CommandTable;
use crate::registry::Registry;
use crate::user::User;

/// Commands sent from connection handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        addr: String,
        sender: mpsc::Sender<String>,
    },
    /// Client disconnected
    Disconnect {
        addr: String,
    },
    /// One parsed line of client input
    Input {
        addr: String,
        command: String,
        context: String,
    },
}

/// The main ChatServer actor
///
/// Owns all shared state and processes commands from connection handlers.
pub struct ChatServer {
    /// Directory of online users
    registry: Registry,
    /// Command name -> handler table, immutable after construction
    commands: CommandTable,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            registry: Registry::new(),
            commands: CommandTable::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd).await;
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    async fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect { addr, sender } => {
                self.handle_connect(addr, sender);
            }
            ServerCommand::Disconnect { addr } => {
                self.handle_disconnect(&addr);
            }
            ServerCommand::Input {
                addr,
                command,
                context,
            } => {
                self.commands
                    .dispatch(&mut self.registry, &addr, &command, &context)
                    .await;
            }
        }
    }

    /// Handle new client connection
    fn handle_connect(&mut self, addr: String, sender: mpsc::Sender<String>) {
        info!("Client {} connected", addr);

        let user = User::new(addr, sender);
        let name = user.name.clone();
        if !self.registry.register(user) {
            // Possible only when another user renamed themselves to this
            // peer address.
            warn!("Registration refused for {}: name already taken", name);
        }

        debug!("Online users: {}", self.registry.len());
    }

    /// Handle client disconnection
    fn handle_disconnect(&mut self, addr: &str) {
        info!("Client {} disconnected", addr);

        self.registry.unregister_addr(addr);

        debug!("Online users: {}", self.registry.len());
    }
}
