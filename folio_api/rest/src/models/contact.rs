use folio_models::{contact::ContactSubmissionForm, RecaptchaResponse};
use serde::Deserialize;

/// The urlencoded body posted by the contact form.
///
/// Every field is optional, the contact service decides how to deal with
/// missing values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    #[serde(alias = "g-recaptcha-response")]
    pub recaptcha_response: Option<String>,
}

/// The captcha response exceeds the maximum length and cannot be genuine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecaptchaResponseTooLong;

impl TryFrom<ApiContactForm> for ContactSubmissionForm {
    type Error = RecaptchaResponseTooLong;

    fn try_from(value: ApiContactForm) -> Result<Self, Self::Error> {
        let recaptcha_response = value
            .recaptcha_response
            .map(RecaptchaResponse::try_new)
            .transpose()
            .map_err(|_| RecaptchaResponseTooLong)?;

        Ok(Self {
            name: value.name,
            email: value.email,
            message: value.message,
            recaptcha_response,
        })
    }
}
