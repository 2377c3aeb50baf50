//! Panel participants and their registry
//!
//! The registry is fixed at startup: a set of expert keys plus exactly one
//! moderator. The only mutable piece is each participant's upstream session
//! handle, refreshed by session resets and by gateway replies that carry a
//! new handle.

use serde::{Deserialize, Serialize};

/// Opaque per-participant conversation identifier issued by the agent
/// service (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandle(String);

impl SessionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SessionHandle {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A panel member (Entity)
#[derive(Debug, Clone)]
pub struct Participant {
    pub key: String,
    pub display_name: String,
    pub session: Option<SessionHandle>,
}

impl Participant {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            session: None,
        }
    }
}

/// Fixed mapping of participant key to display metadata and session handle
///
/// Expert iteration order is the registration order; the moderator is kept
/// last so broadcasts over [`expert_keys`](Self::expert_keys) never reach it.
#[derive(Debug, Clone)]
pub struct ParticipantRegistry {
    experts: Vec<Participant>,
    moderator: Participant,
}

impl ParticipantRegistry {
    pub fn new(experts: Vec<Participant>, moderator: Participant) -> Self {
        Self { experts, moderator }
    }

    /// Resolve a target string against registered keys, case-insensitively.
    ///
    /// Returns the canonical key as registered. The moderator key resolves
    /// too, so a moderator asking itself is caught by callers, not here.
    pub fn resolve(&self, target: &str) -> Option<&str> {
        let target = target.trim();
        self.all()
            .find(|p| p.key.eq_ignore_ascii_case(target))
            .map(|p| p.key.as_str())
    }

    pub fn display_name(&self, key: &str) -> Option<&str> {
        self.all()
            .find(|p| p.key == key)
            .map(|p| p.display_name.as_str())
    }

    pub fn session(&self, key: &str) -> Option<&SessionHandle> {
        self.all().find(|p| p.key == key)?.session.as_ref()
    }

    /// Replace a participant's session handle. A `None` handle clears it.
    pub fn set_session(&mut self, key: &str, session: Option<SessionHandle>) {
        if let Some(p) = self.all_mut().find(|p| p.key == key) {
            p.session = session;
        }
    }

    /// Expert keys in registration order (moderator excluded)
    pub fn expert_keys(&self) -> impl Iterator<Item = &str> {
        self.experts.iter().map(|p| p.key.as_str())
    }

    /// Every participant key, moderator last
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.all().map(|p| p.key.as_str())
    }

    pub fn moderator_key(&self) -> &str {
        &self.moderator.key
    }

    pub fn len(&self) -> usize {
        self.experts.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    fn all(&self) -> impl Iterator<Item = &Participant> {
        self.experts.iter().chain(std::iter::once(&self.moderator))
    }

    fn all_mut(&mut self) -> impl Iterator<Item = &mut Participant> {
        self.experts
            .iter_mut()
            .chain(std::iter::once(&mut self.moderator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ParticipantRegistry {
        ParticipantRegistry::new(
            vec![
                Participant::new("general", "General Geology Expert"),
                Participant::new("geophysical", "Geophysics Expert"),
            ],
            Participant::new("host", "Moderator"),
        )
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let reg = registry();
        assert_eq!(reg.resolve("GEOPHYSICAL"), Some("geophysical"));
        assert_eq!(reg.resolve("GeoPhysical"), Some("geophysical"));
        assert_eq!(reg.resolve(" general "), Some("general"));
        assert_eq!(reg.resolve("seismic"), None);
    }

    #[test]
    fn test_expert_keys_exclude_moderator() {
        let reg = registry();
        let keys: Vec<_> = reg.expert_keys().collect();
        assert_eq!(keys, vec!["general", "geophysical"]);
        assert_eq!(reg.keys().count(), 3);
    }

    #[test]
    fn test_session_handle_mutation() {
        let mut reg = registry();
        assert!(reg.session("general").is_none());
        reg.set_session("general", Some(SessionHandle::new("s-1")));
        assert_eq!(reg.session("general").unwrap().as_str(), "s-1");
        reg.set_session("general", None);
        assert!(reg.session("general").is_none());
    }

    #[test]
    fn test_set_session_unknown_key_is_noop() {
        let mut reg = registry();
        reg.set_session("seismic", Some(SessionHandle::new("s-9")));
        assert!(reg.keys().all(|k| reg.session(k).is_none()));
    }
}
