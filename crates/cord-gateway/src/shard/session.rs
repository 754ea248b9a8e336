//! Resumable session state

use crate::protocol::ResumePayload;

/// What a shard remembers between connections
///
/// A session can be resumed once READY has produced a session id and at
/// least one dispatch sequence has been seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    session_id: Option<String>,
    sequence: Option<u64>,
    resume_url: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the identity handed out by READY
    pub fn start(&mut self, session_id: impl Into<String>, resume_url: Option<String>) {
        self.session_id = Some(session_id.into());
        self.resume_url = resume_url.filter(|url| !url.is_empty());
    }

    /// Remember the newest dispatch sequence
    pub fn record_sequence(&mut self, sequence: u64) {
        if self.sequence.map_or(true, |current| sequence > current) {
            self.sequence = Some(sequence);
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn sequence(&self) -> Option<u64> {
        self.sequence
    }

    pub fn resume_url(&self) -> Option<&str> {
        self.resume_url.as_deref()
    }

    pub fn is_resumable(&self) -> bool {
        self.session_id.is_some() && self.sequence.is_some()
    }

    /// Payload for op 6, if the session can be resumed
    pub fn resume_payload(&self, token: &str) -> Option<ResumePayload> {
        Some(ResumePayload {
            token: token.to_string(),
            session_id: self.session_id.clone()?,
            seq: self.sequence?,
        })
    }

    /// Forget the session; the next connection identifies from scratch
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_not_resumable() {
        let session = SessionState::new();
        assert!(!session.is_resumable());
        assert!(session.resume_payload("token").is_none());
    }

    #[test]
    fn test_resume_requires_sequence() {
        let mut session = SessionState::new();
        session.start("abc", Some("wss://resume.example".to_string()));
        assert!(!session.is_resumable());

        session.record_sequence(3);
        let payload = session.resume_payload("token").unwrap();
        assert_eq!(payload.session_id, "abc");
        assert_eq!(payload.seq, 3);
        assert_eq!(session.resume_url(), Some("wss://resume.example"));
    }

    #[test]
    fn test_sequence_never_goes_backwards() {
        let mut session = SessionState::new();
        session.record_sequence(5);
        session.record_sequence(4);
        assert_eq!(session.sequence(), Some(5));
    }

    #[test]
    fn test_reset() {
        let mut session = SessionState::new();
        session.start("abc", Some(String::new()));
        session.record_sequence(1);
        assert_eq!(session.resume_url(), None);

        session.reset();
        assert_eq!(session, SessionState::default());
    }
}
