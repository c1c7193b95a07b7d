use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use thiserror::Error;

use crate::{email_address::EmailAddress, RecaptchaResponse};

/// URL fragment the client script reacts to after a message has been sent.
pub const SENT_FRAGMENT: &str = "emailSent";
/// URL fragment the client script reacts to after a submission was refused.
pub const FAILED_FRAGMENT: &str = "emailFailed";

/// Address grammar accepted by the contact form.
///
/// Top level domains are limited to two or three letters, so `a@b.info` is
/// rejected even though it is a valid address.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[_a-z0-9-]+(\.[_a-z0-9-]+)*@[a-z0-9-]+(\.[a-z0-9-]+)*(\.[a-z]{2,3})$")
        .unwrap()
});

/// The raw fields of a single contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmissionForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub recaptcha_response: Option<RecaptchaResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: EmailAddress,
}

#[nutype(
    sanitize(with = single_line),
    validate(len_char_max = 256),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    validate(len_char_max = 10000),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct ContactMessageContent(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("Error: name is required")]
    NameMissing,
    #[error("Error: name is too long")]
    NameTooLong,
    #[error("Error: email is required")]
    EmailMissing,
    #[error("Error: Invalid email address")]
    EmailInvalid,
    #[error("Error: message is required")]
    MessageMissing,
    #[error("Error: message is too long")]
    MessageTooLong,
}

/// All problems found in a single submission, in the order they were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactValidationErrors(pub Vec<ContactValidationError>);

impl ContactValidationErrors {
    pub fn contains(&self, error: ContactValidationError) -> bool {
        self.0.contains(&error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContactValidationError> {
        self.0.iter()
    }

    fn push(&mut self, error: ContactValidationError) {
        self.0.push(error);
    }
}

impl std::fmt::Display for ContactValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl ContactMessage {
    /// Validates the raw form fields.
    ///
    /// Every check runs independently, so the returned errors contain all
    /// problems at once. An empty email fails both the presence and the
    /// format check.
    pub fn validate(
        name: &str,
        email: &str,
        message: &str,
    ) -> Result<Self, ContactValidationErrors> {
        let mut errors = ContactValidationErrors::default();

        let name = match ContactMessageAuthorName::try_new(name.to_owned()) {
            Ok(name) if name.is_empty() => {
                errors.push(ContactValidationError::NameMissing);
                None
            }
            Ok(name) => Some(name),
            Err(_) => {
                errors.push(ContactValidationError::NameTooLong);
                None
            }
        };

        if email.is_empty() {
            errors.push(ContactValidationError::EmailMissing);
        }
        let email = CONTACT_EMAIL_REGEX
            .is_match(email)
            .then(|| email.parse::<EmailAddress>().ok())
            .flatten();
        if email.is_none() {
            errors.push(ContactValidationError::EmailInvalid);
        }

        let content = match ContactMessageContent::try_new(message.to_owned()) {
            Ok(content) if content.trim().is_empty() => {
                errors.push(ContactValidationError::MessageMissing);
                None
            }
            Ok(content) => Some(content),
            Err(_) => {
                errors.push(ContactValidationError::MessageTooLong);
                None
            }
        };

        match (name, email, content) {
            (Some(name), Some(email), Some(content)) if errors.is_empty() => Ok(Self {
                author: ContactMessageAuthor { name, email },
                content,
            }),
            _ => Err(errors),
        }
    }
}

/// Collapses the input into a single line so it can safely be used in a mail
/// header.
fn single_line(input: String) -> String {
    input
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
