use crate::keys::KeyGenerator;
use crate::{ErrorReport, Validator};

use super::field_key;

/// Records a message when a byte field is empty.
///
/// # Example
///
/// ```rust
/// use fieldcheck::validators::BytesArePresent;
/// use fieldcheck::{ErrorReport, Validator};
///
/// let errors = ErrorReport::new();
/// BytesArePresent::new("Name", b"").is_valid(&errors);
/// assert_eq!(errors.get("name"), vec!["Name can not be blank."]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesArePresent {
    name: String,
    field: Vec<u8>,
    message: Option<String>,
    key: Option<String>,
}

impl BytesArePresent {
    /// Check that `field` holds at least one byte.
    pub fn new(name: impl Into<String>, field: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            message: None,
            key: None,
        }
    }

    /// Record `message` instead of the default "`<name>` can not be blank.".
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Record under `key` instead of the key derived from the name.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Resolve the record key through `keys`.
    pub fn with_keys(self, keys: &KeyGenerator) -> Self {
        let key = keys.generate(&self.name);
        self.with_key(key)
    }
}

impl Validator for BytesArePresent {
    fn is_valid(&self, errors: &ErrorReport) {
        if !self.field.is_empty() {
            return;
        }

        let message = match &self.message {
            Some(message) => message.clone(),
            None => format!("{} can not be blank.", self.name),
        };
        errors.add(field_key(&self.name, self.key.as_deref()), message);
    }
}
