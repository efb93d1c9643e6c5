//! Command strategies
//!
//! One handler per chat command, routed by name through a table built once
//! at startup. Unknown commands are dropped without a reply; that is the
//! protocol's contract, not an oversight.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::registry::{Registry, RenameOutcome};
use crate::user::User;

/// One command strategy
///
/// Handlers are stateless; all state lives in the registry and the users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// `who` - list everyone online
    Who,
    /// `bc <message>` - broadcast to all other users
    Broadcast,
    /// `rename <newName>` - change display name
    Rename,
    /// `to <target> <message>` - direct message to one user
    DirectMessage,
}

impl Handler {
    /// Apply this strategy for `user` with the raw context argument.
    pub async fn apply(&self, registry: &mut Registry, user: &User, context: &str) {
        match self {
            Handler::Who => who(registry, user).await,
            Handler::Broadcast => broadcast(registry, user, context).await,
            Handler::Rename => rename(registry, user, context).await,
            Handler::DirectMessage => direct_message(registry, user, context).await,
        }
    }
}

/// Command name -> handler table
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug)]
pub struct CommandTable {
    handlers: HashMap<&'static str, Handler>,
}

impl CommandTable {
    /// Build the table with all recognized commands
    pub fn new() -> Self {
        let mut handlers = HashMap::new();
        handlers.insert("who", Handler::Who);
        handlers.insert("bc", Handler::Broadcast);
        handlers.insert("rename", Handler::Rename);
        handlers.insert("to", Handler::DirectMessage);
        Self { handlers }
    }

    /// Resolve a command name, case-insensitively.
    pub fn resolve(&self, command: &str) -> Option<Handler> {
        self.handlers
            .get(command.to_ascii_lowercase().as_str())
            .copied()
    }

    /// Route one line of input from the connection at `addr`.
    ///
    /// An empty command is a no-op; an unrecognized command is dropped
    /// without a reply.
    pub async fn dispatch(
        &self,
        registry: &mut Registry,
        addr: &str,
        command: &str,
        context: &str,
    ) {
        if command.is_empty() {
            return;
        }
        let Some(handler) = self.resolve(command) else {
            debug!("Ignoring unknown command '{}' from {}", command, addr);
            return;
        };
        let Some(user) = registry.lookup_addr(addr).cloned() else {
            debug!("Dropping command from unregistered connection {}", addr);
            return;
        };
        handler.apply(registry, &user, context).await;
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::new()
    }
}

/// List every registered user to the requester, marking the requester's
/// own entry with `*`.
async fn who(registry: &Registry, user: &User) {
    for entry in registry.snapshot() {
        let marker = if entry.addr == user.addr { '*' } else { ' ' };
        let line = format!("{}[{}][{}]:online", marker, entry.addr, entry.name);
        if user.send(line).await.is_err() {
            break;
        }
    }
}

/// Fan a message out to every registered user except the sender.
async fn broadcast(registry: &Registry, user: &User, context: &str) {
    if context.is_empty() {
        let _ = user.send("Cannot send an empty message").await;
        return;
    }

    let line = format!("[{}][{}]:{}", user.addr, user.name, context);
    for recipient in registry.snapshot() {
        if recipient.addr == user.addr {
            continue;
        }
        if let Err(e) = recipient.send(line.clone()).await {
            warn!("Dropping broadcast to {}: {}", recipient.name, e);
        }
    }
}

/// Change the sender's display name, refusing duplicates.
async fn rename(registry: &mut Registry, user: &User, context: &str) {
    let reply = match registry.rename(&user.name, context) {
        RenameOutcome::Unchanged => "No modification required".to_string(),
        RenameOutcome::Conflict => "User name already exists".to_string(),
        RenameOutcome::Renamed => format!("Your user name is changed to : {}", context),
    };
    let _ = user.send(reply).await;
}

/// Deliver a message to exactly one named user.
///
/// The context is `<target> <message>`; the message keeps any further
/// spaces verbatim.
async fn direct_message(registry: &Registry, user: &User, context: &str) {
    let Some((target, message)) = context.split_once(' ') else {
        let _ = user.send("The sending message format is illegal").await;
        return;
    };
    if message.is_empty() {
        let _ = user.send("The sending message format is illegal").await;
        return;
    }

    let Some(recipient) = registry.lookup(target) else {
        let _ = user.send(format!("User '{}' not found", target)).await;
        return;
    };

    let line = format!("[{}][{}]:{}", user.addr, user.name, message);
    if let Err(e) = recipient.send(line).await {
        warn!("Dropping direct message to {}: {}", target, e);
    }
}
