//! Todo entity and its validated input types

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Minimum length for todo content, in characters
pub const MIN_CONTENT_LEN: usize = 3;

/// Maximum length for todo content, in characters
pub const MAX_CONTENT_LEN: usize = 54;

/// Persisted todo row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Todo {
    pub id: i32,
    pub content: String,
    pub is_completed: bool,
}

/// Request body for create and update.
///
/// A client-supplied `id` is ignored; `is_completed` falls back to `false`
/// when absent, which makes update a full replace of both fields.
#[derive(Debug, Clone, Deserialize)]
pub struct TodoPayload {
    pub content: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl TodoPayload {
    /// Check the payload and turn it into an insertable todo.
    pub fn validate(self) -> Result<NewTodo, ValidationError> {
        Ok(NewTodo {
            content: TodoContent::new(&self.content)?,
            is_completed: self.is_completed,
        })
    }
}

/// Validated todo content (3 to 54 characters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoContent(String);

impl TodoContent {
    /// Create todo content, validating its length.
    ///
    /// Length is counted in characters, not bytes.
    ///
    /// # Example
    /// ```
    /// use dailydo_server::models::TodoContent;
    ///
    /// assert!(TodoContent::new("buy milk").is_ok());
    /// assert!(TodoContent::new("hi").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let len = s.chars().count();

        if len < MIN_CONTENT_LEN {
            return Err(ValidationError::TooShort {
                field: "content",
                min: MIN_CONTENT_LEN,
            });
        }

        if len > MAX_CONTENT_LEN {
            return Err(ValidationError::TooLong {
                field: "content",
                max: MAX_CONTENT_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A todo that passed validation but has no id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub content: TodoContent,
    pub is_completed: bool,
}

impl NewTodo {
    /// Overwrite both mutable fields of an existing row, keeping its id.
    pub fn apply_to(self, todo: &mut Todo) {
        todo.content = self.content.into_string();
        todo.is_completed = self.is_completed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_bounds() {
        assert!(TodoContent::new("abc").is_ok());
        assert!(TodoContent::new(&"a".repeat(54)).is_ok());

        let err = TodoContent::new("ab").unwrap_err();
        assert!(matches!(err, ValidationError::TooShort { min: 3, .. }));

        let err = TodoContent::new(&"a".repeat(55)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 54, .. }));
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 3 characters, 9 bytes
        assert!(TodoContent::new("日本語").is_ok());
        // 54 characters, well over 54 bytes
        assert!(TodoContent::new(&"é".repeat(54)).is_ok());
        assert!(TodoContent::new(&"é".repeat(55)).is_err());
    }

    #[test]
    fn payload_defaults_is_completed() {
        let payload: TodoPayload = serde_json::from_str(r#"{"content": "walk dog"}"#).unwrap();
        assert!(!payload.is_completed);

        let new = payload.validate().unwrap();
        assert_eq!(new.content.as_str(), "walk dog");
        assert!(!new.is_completed);
    }

    #[test]
    fn payload_ignores_client_id() {
        let payload: TodoPayload =
            serde_json::from_str(r#"{"id": 99, "content": "walk dog", "is_completed": true}"#)
                .unwrap();
        assert!(payload.is_completed);
    }

    #[test]
    fn payload_requires_content() {
        assert!(serde_json::from_str::<TodoPayload>(r#"{"is_completed": true}"#).is_err());
    }

    #[test]
    fn apply_keeps_id() {
        let mut todo = Todo {
            id: 7,
            content: "old content".into(),
            is_completed: false,
        };
        let new = TodoPayload {
            content: "new content".into(),
            is_completed: true,
        }
        .validate()
        .unwrap();

        new.apply_to(&mut todo);
        assert_eq!(todo.id, 7);
        assert_eq!(todo.content, "new content");
        assert!(todo.is_completed);
    }
}
