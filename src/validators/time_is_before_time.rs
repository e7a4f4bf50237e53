use chrono::{DateTime, Utc};

use crate::keys::KeyGenerator;
use crate::{ErrorReport, Validator};

use super::field_key;

/// Records a message when the first time is later than the second.
///
/// Equal times pass. The message is keyed on the first field.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use fieldcheck::validators::TimeIsBeforeTime;
/// use fieldcheck::{ErrorReport, Validator};
///
/// let opens = Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap();
/// let closes = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
///
/// let errors = ErrorReport::new();
/// TimeIsBeforeTime::new("Opens At", opens, "Closes At", closes).is_valid(&errors);
/// assert_eq!(errors.get("opens_at"), vec!["Opens At must be before Closes At."]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeIsBeforeTime {
    first_name: String,
    first_time: DateTime<Utc>,
    second_name: String,
    second_time: DateTime<Utc>,
    message: Option<String>,
    key: Option<String>,
}

impl TimeIsBeforeTime {
    /// Check that `first_time` is not after `second_time`.
    pub fn new(
        first_name: impl Into<String>,
        first_time: DateTime<Utc>,
        second_name: impl Into<String>,
        second_time: DateTime<Utc>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            first_time,
            second_name: second_name.into(),
            second_time,
            message: None,
            key: None,
        }
    }

    /// Record `message` instead of the default "`<first>` must be before `<second>`.".
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Record under `key` instead of the key derived from the first name.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Resolve the record key through `keys`.
    pub fn with_keys(self, keys: &KeyGenerator) -> Self {
        let key = keys.generate(&self.first_name);
        self.with_key(key)
    }
}

impl Validator for TimeIsBeforeTime {
    fn is_valid(&self, errors: &ErrorReport) {
        if self.first_time <= self.second_time {
            return;
        }

        let message = match &self.message {
            Some(message) => message.clone(),
            None => format!("{} must be before {}.", self.first_name, self.second_name),
        };
        errors.add(field_key(&self.first_name, self.key.as_deref()), message);
    }
}
