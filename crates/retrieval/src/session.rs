//! Explicit session state owned by the hosting shell.
//!
//! A [`Session`] exclusively owns its similarity index and chat history;
//! nothing is shared across sessions and nothing is persisted. The shell
//! creates a session, passes it by mutable reference to every operation,
//! and clears it wholesale on logout.

use crate::index::InMemoryIndex;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of conversation. Append-only, session-scoped, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Whether the session has an indexed document.
///
/// A tagged variant rather than a nullable index, so the two answer paths
/// are exhaustive and type-checked.
pub enum SessionMode {
    /// No document uploaded; questions go to the model ungrounded
    NoDocument,
    /// A document has been chunked, embedded and indexed
    DocumentIndexed(InMemoryIndex),
}

/// Per-user session: authentication flag, current index, chat history.
pub struct Session {
    id: Uuid,
    authenticated: bool,
    mode: SessionMode,
    history: Vec<ChatTurn>,
}

impl Session {
    /// Create a fresh, unauthenticated session with no document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            authenticated: false,
            mode: SessionMode::NoDocument,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Attempt to log in against the shell's credential map.
    ///
    /// An empty credential map means the gate is disabled and any login
    /// succeeds. Passwords are compared exactly; a failed attempt leaves
    /// the session unauthenticated.
    pub fn login(&mut self, username: &str, password: &str, credentials: &HashMap<String, String>) -> bool {
        self.authenticated = credentials.is_empty()
            || credentials.get(username).map(String::as_str) == Some(password);

        if self.authenticated {
            tracing::info!("Session {} authenticated as '{}'", self.id, username);
        } else {
            tracing::warn!("Failed login attempt for '{}'", username);
        }

        self.authenticated
    }

    /// Clear the session entirely: authentication, index, and history.
    pub fn logout(&mut self) {
        tracing::info!("Session {} logged out, clearing state", self.id);
        self.authenticated = false;
        self.mode = SessionMode::NoDocument;
        self.history.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    /// True when a document has been indexed in this session.
    pub fn has_document(&self) -> bool {
        matches!(self.mode, SessionMode::DocumentIndexed(_))
    }

    /// Install a fully built index, replacing any previous one wholesale.
    ///
    /// The single assignment here is what makes index replacement atomic
    /// from the session's point of view: a build that fails earlier never
    /// reaches this call, so the prior mode survives intact.
    pub fn install_index(&mut self, index: InMemoryIndex) {
        self.mode = SessionMode::DocumentIndexed(index);
    }

    /// Append a chat turn.
    pub fn push_turn(&mut self, role: Role, text: impl Into<String>) {
        self.history.push(ChatTurn {
            role,
            text: text.into(),
            at: Utc::now(),
        });
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
