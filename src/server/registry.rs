use std::collections::HashMap;
use std::net::SocketAddr;

use crate::reliability::{ReceiveState, MAX_NUM_CLIENTS};

/// Why a `join` was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinError {
    ServerFull,
    UsernameUnavailable,
}

/// The server's authoritative client directory plus per-endpoint receive-sequence state.
///
/// Per SPEC_FULL.md §9 ("cyclic lookups"), there is a single `addr -> username` map;
/// username -> addr lookups scan it directly rather than maintaining a second synchronized
/// index, since the population is small and bounded by MAX_NUM_CLIENTS.
#[derive(Debug, Default)]
pub struct Registry {
    clients: HashMap<SocketAddr, String>,
    recv_state: HashMap<SocketAddr, ReceiveState>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    /// Returns the receive-sequence state for `addr`, creating it (at `last_in_order == -1`)
    /// on first contact.
    pub fn recv_state_mut(&mut self, addr: SocketAddr) -> &mut ReceiveState {
        self.recv_state.entry(addr).or_insert_with(ReceiveState::new)
    }

    /// Drops `addr`'s receive-sequence state (an `end` packet).
    pub fn forget(&mut self, addr: &SocketAddr) {
        self.recv_state.remove(addr);
    }

    pub fn username(&self, addr: &SocketAddr) -> Option<&String> {
        self.clients.get(addr)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn join(&mut self, addr: SocketAddr, username: String) -> Result<(), JoinError> {
        if self.clients.len() >= MAX_NUM_CLIENTS {
            return Err(JoinError::ServerFull);
        }
        if self.clients.values().any(|existing| existing == &username) {
            return Err(JoinError::UsernameUnavailable);
        }
        self.clients.insert(addr, username);
        Ok(())
    }

    /// Removes `addr`'s registration, returning the former username if it was registered.
    pub fn disconnect(&mut self, addr: &SocketAddr) -> Option<String> {
        self.clients.remove(addr)
    }

    /// All registered usernames, ASCII-sorted ascending.
    pub fn sorted_usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.clients.values().cloned().collect();
        names.sort();
        names
    }

    /// Every endpoint registered under `username` (ordinarily zero or one, but a name may in
    /// principle map to multiple endpoints — see SPEC_FULL.md §4.3).
    pub fn addrs_for_username(&self, username: &str) -> Vec<SocketAddr> {
        self.clients
            .iter()
            .filter(|(_, name)| name.as_str() == username)
            .map(|(addr, _)| *addr)
            .collect()
    }

    /// Every registered endpoint except `exclude` (the `all` broadcast set).
    pub fn broadcast_targets(&self, exclude: &SocketAddr) -> Vec<SocketAddr> {
        self.clients
            .keys()
            .filter(|&&addr| addr != *exclude)
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn join_then_lookup() {
        let mut registry = Registry::new();
        registry.join(addr(1), "alice".to_string()).unwrap();
        assert_eq!(registry.username(&addr(1)), Some(&"alice".to_string()));
        assert_eq!(registry.addrs_for_username("alice"), vec![addr(1)]);
    }

    #[test]
    fn rejects_duplicate_username() {
        let mut registry = Registry::new();
        registry.join(addr(1), "alice".to_string()).unwrap();
        let result = registry.join(addr(2), "alice".to_string());
        assert_eq!(result, Err(JoinError::UsernameUnavailable));
    }

    #[test]
    fn rejects_join_past_capacity() {
        let mut registry = Registry::new();
        for i in 0..MAX_NUM_CLIENTS {
            registry.join(addr(i as u16), format!("user{i}")).unwrap();
        }
        let result = registry.join(addr(999), "one-too-many".to_string());
        assert_eq!(result, Err(JoinError::ServerFull));
    }

    #[test]
    fn sorted_usernames_is_ascending() {
        let mut registry = Registry::new();
        registry.join(addr(1), "carol".to_string()).unwrap();
        registry.join(addr(2), "alice".to_string()).unwrap();
        registry.join(addr(3), "bob".to_string()).unwrap();
        assert_eq!(registry.sorted_usernames(), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn broadcast_excludes_sender() {
        let mut registry = Registry::new();
        registry.join(addr(1), "alice".to_string()).unwrap();
        registry.join(addr(2), "bob".to_string()).unwrap();
        let targets = registry.broadcast_targets(&addr(1));
        assert_eq!(targets, vec![addr(2)]);
    }

    #[test]
    fn disconnect_removes_registration() {
        let mut registry = Registry::new();
        registry.join(addr(1), "alice".to_string()).unwrap();
        assert_eq!(registry.disconnect(&addr(1)), Some("alice".to_string()));
        assert_eq!(registry.disconnect(&addr(1)), None);
    }
}
