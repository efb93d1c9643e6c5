//! Online user registry
//!
//! The shared directory of currently connected users, keyed by display name
//! with a peer-address index. The registry is owned by the `ChatServer`
//! actor, so every operation runs serialized on one task and needs no lock.

use std::collections::HashMap;

use crate::user::User;

/// Outcome of a rename attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The requested name equals the current name
    Unchanged,
    /// Another user already holds the requested name
    Conflict,
    /// Old key removed, name updated, new key inserted
    Renamed,
}

/// Directory of currently registered users
///
/// Invariant: every key in `by_name` equals the `name` field of its value,
/// no two entries share a name, and `by_addr` maps each live connection's
/// address to its current name.
#[derive(Debug, Default)]
pub struct Registry {
    /// Display name -> user
    by_name: HashMap<String, User>,
    /// Peer address -> current display name
    by_addr: HashMap<String, String>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user under its current name.
    ///
    /// Returns false and leaves the registry unchanged if the name is taken.
    pub fn register(&mut self, user: User) -> bool {
        if self.by_name.contains_key(&user.name) {
            return false;
        }
        self.by_addr.insert(user.addr.clone(), user.name.clone());
        self.by_name.insert(user.name.clone(), user);
        true
    }

    /// Remove and return the user for the given connection address.
    pub fn unregister_addr(&mut self, addr: &str) -> Option<User> {
        let name = self.by_addr.remove(addr)?;
        self.by_name.remove(&name)
    }

    /// Look up a user by display name.
    pub fn lookup(&self, name: &str) -> Option<&User> {
        self.by_name.get(name)
    }

    /// Look up a user by connection address.
    pub fn lookup_addr(&self, addr: &str) -> Option<&User> {
        let name = self.by_addr.get(addr)?;
        self.by_name.get(name)
    }

    /// Point-in-time copy of all registered users, sorted by name.
    ///
    /// The map itself has no useful iteration order; sorting keeps `who`
    /// output stable.
    pub fn snapshot(&self) -> Vec<User> {
        let mut users: Vec<User> = self.by_name.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        users
    }

    /// Rename the user currently registered as `old_name` to `new_name`.
    ///
    /// The duplicate check and the key swap happen within this one call, so
    /// two racing renames to the same target can never both succeed.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> RenameOutcome {
        if old_name == new_name {
            return RenameOutcome::Unchanged;
        }
        if self.by_name.contains_key(new_name) {
            return RenameOutcome::Conflict;
        }
        let Some(mut user) = self.by_name.remove(old_name) else {
            return RenameOutcome::Conflict;
        };
        user.name = new_name.to_string();
        self.by_addr.insert(user.addr.clone(), new_name.to_string());
        self.by_name.insert(new_name.to_string(), user);
        RenameOutcome::Renamed
    }

    /// Number of registered users
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Check whether no users are registered
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn user(addr: &str, name: &str) -> User {
        let (tx, _rx) = mpsc::channel(32);
        let mut user = User::new(addr.to_string(), tx);
        user.name = name.to_string();
        user
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = Registry::new();

        assert!(registry.register(user("127.0.0.1:1000", "alice")));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.lookup("alice").unwrap().addr, "127.0.0.1:1000");
        assert_eq!(registry.lookup_addr("127.0.0.1:1000").unwrap().name, "alice");
        assert!(registry.lookup("bob").is_none());
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut registry = Registry::new();

        assert!(registry.register(user("127.0.0.1:1000", "alice")));
        assert!(!registry.register(user("127.0.0.1:2000", "alice")));

        // The original entry is untouched.
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("alice").unwrap().addr, "127.0.0.1:1000");
    }

    #[test]
    fn test_unregister() {
        let mut registry = Registry::new();
        registry.register(user("127.0.0.1:1000", "alice"));

        let removed = registry.unregister_addr("127.0.0.1:1000").unwrap();
        assert_eq!(removed.name, "alice");
        assert!(registry.is_empty());
        assert!(registry.lookup("alice").is_none());

        // Unknown address is a no-op.
        assert!(registry.unregister_addr("127.0.0.1:9999").is_none());
    }

    #[test]
    fn test_rename_outcomes() {
        let mut registry = Registry::new();
        registry.register(user("127.0.0.1:1000", "alice"));
        registry.register(user("127.0.0.1:2000", "bob"));

        assert_eq!(registry.rename("alice", "alice"), RenameOutcome::Unchanged);
        assert_eq!(registry.rename("alice", "bob"), RenameOutcome::Conflict);
        assert_eq!(registry.rename("alice", "carol"), RenameOutcome::Renamed);

        // Old key gone, new key present, addr index follows.
        assert!(registry.lookup("alice").is_none());
        assert_eq!(registry.lookup("carol").unwrap().addr, "127.0.0.1:1000");
        assert_eq!(registry.lookup_addr("127.0.0.1:1000").unwrap().name, "carol");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_rename_keeps_keys_consistent() {
        let mut registry = Registry::new();
        registry.register(user("127.0.0.1:1000", "alice"));
        registry.rename("alice", "carol");

        for entry in registry.snapshot() {
            assert_eq!(registry.lookup(&entry.name).unwrap().addr, entry.addr);
        }
    }

    #[test]
    fn test_snapshot_sorted_by_name() {
        let mut registry = Registry::new();
        registry.register(user("127.0.0.1:3000", "carol"));
        registry.register(user("127.0.0.1:1000", "alice"));
        registry.register(user("127.0.0.1:2000", "bob"));

        let names: Vec<String> = registry
            .snapshot()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, ["alice", "bob", "carol"]);
    }
}
