use crate::keys::KeyGenerator;
use crate::{ErrorReport, Validator};

use super::field_key;

/// Records a message when two integers differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntsAreEqual {
    name: String,
    value_one: i64,
    value_two: i64,
    message: Option<String>,
    key: Option<String>,
}

impl IntsAreEqual {
    /// Check that `value_one == value_two`.
    pub fn new(name: impl Into<String>, value_one: i64, value_two: i64) -> Self {
        Self {
            name: name.into(),
            value_one,
            value_two,
            message: None,
            key: None,
        }
    }

    /// Record `message` instead of the default "`<one>` is not equal to `<two>`".
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

impl Validator for IntsAreEqual {
    fn is_valid(&self, errors: &ErrorReport) {
        if self.value_one == self.value_two {
            return;
        }

        let message = match &self.message {
            Some(message) => message.clone(),
            None => format!("{} is not equal to {}", self.value_one, self.value_two),
        };
        errors.add(field_key(&self.name, self.key.as_deref()), message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_ints_pass() {
        let errors = ErrorReport::new();
        IntsAreEqual::new("Number", 1, 1).is_valid(&errors);
        assert_eq!(errors.count(), 0);
    }

    #[test]
    fn test_unequal_ints() {
        let errors = ErrorReport::new();
        IntsAreEqual::new("Number", 1, 2).is_valid(&errors);
        assert_eq!(errors.count(), 1);
        assert_eq!(errors.get("number"), vec!["1 is not equal to 2"]);
    }

    #[test]
    fn test_negative_values_in_message() {
        let errors = ErrorReport::new();
        IntsAreEqual::new("Balance", -5, 0).is_valid(&errors);
        assert_eq!(errors.get("balance"), vec!["-5 is not equal to 0"]);
    }

    #[test]
    fn test_custom_message() {
        let errors = ErrorReport::new();
        IntsAreEqual::new("Retry Count", 3, 4)
            .with_message("Retries must match.")
            .is_valid(&errors);
        assert_eq!(errors.get("retry_count"), vec!["Retries must match."]);
    }
}
