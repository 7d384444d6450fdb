use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SEQ: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Opaque message identifier, unique within the process
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MessageId(String);

impl MessageId {
    fn next(prefix: &str) -> Self {
        let seq = NEXT_SEQ.fetch_add(1, Ordering::Relaxed);
        MessageId(format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(text: &str) -> Self {
        Self::with_role(Role::User, "u", text)
    }

    pub fn assistant(text: &str) -> Self {
        Self::with_role(Role::Assistant, "a", text)
    }

    pub fn assistant_error(text: &str) -> Self {
        Self::with_role(Role::Assistant, "err", text)
    }

    fn with_role(role: Role, prefix: &str, text: &str) -> Self {
        Self {
            id: MessageId::next(prefix),
            role,
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_even_within_one_millisecond() {
        let ids: Vec<MessageId> = (0..50).map(|_| Message::user("x").id).collect();
        for (i, a) in ids.iter().enumerate() {
            assert!(ids[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn test_constructors_set_role() {
        assert_eq!(Message::user("hi").role, Role::User);
        assert_eq!(Message::assistant("").role, Role::Assistant);
        let err = Message::assistant_error("boom");
        assert_eq!(err.role, Role::Assistant);
        assert!(err.id.as_str().starts_with("err-"));
    }
}
