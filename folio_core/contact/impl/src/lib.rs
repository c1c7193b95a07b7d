use std::sync::Arc;

use folio_core_contact_contracts::{
    ContactFeatureService, ContactSubmitError, ContactSubmitOutcome,
};
use folio_email_contracts::{Email, EmailService};
use folio_models::{
    contact::{ContactMessage, ContactSubmissionForm},
    email_address::EmailAddress,
};
use folio_shared_contracts::captcha::{CaptchaCheckError, CaptchaService};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ContactFeatureServiceImpl<Captcha, Mail> {
    captcha: Captcha,
    email: Mail,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Recipient of all contact form messages.
    pub email: Arc<EmailAddress>,
}

impl<Captcha, Mail> ContactFeatureServiceImpl<Captcha, Mail> {
    pub fn new(captcha: Captcha, email: Mail, config: ContactFeatureConfig) -> Self {
        Self {
            captcha,
            email,
            config,
        }
    }
}

impl<Captcha, Mail> ContactFeatureService for ContactFeatureServiceImpl<Captcha, Mail>
where
    Captcha: CaptchaService,
    Mail: EmailService,
{
    async fn submit(
        &self,
        form: ContactSubmissionForm,
    ) -> Result<ContactSubmitOutcome, ContactSubmitError> {
        let ContactSubmissionForm {
            name,
            email: Some(email),
            message,
            recaptcha_response: Some(recaptcha_response),
        } = form
        else {
            debug!("ignoring submission without email or captcha response");
            return Ok(ContactSubmitOutcome::Ignored);
        };

        self.captcha
            .check(&recaptcha_response)
            .await
            .map_err(|err| match err {
                CaptchaCheckError::Failed => ContactSubmitError::CaptchaFailed,
                CaptchaCheckError::Unavailable(err) => {
                    ContactSubmitError::VerificationUnavailable(err)
                }
            })?;

        let message = ContactMessage::validate(
            name.as_deref().unwrap_or_default(),
            &email,
            message.as_deref().unwrap_or_default(),
        )
        .map_err(ContactSubmitError::Invalid)?;

        let email = Email {
            recipient: (*self.config.email).clone().into(),
            subject: format!("Contact form submission: {}", *message.author.name),
            body: format!(
                "You have received a new message. Here are the details:\n\nName: {}\nEmail: \
                 {}\nMessage:\n{}",
                *message.author.name, message.author.email, *message.content
            ),
            reply_to: Some(message.author.email.into()),
        };

        if !self.email.send(email).await? {
            return Err(ContactSubmitError::Send);
        }

        Ok(ContactSubmitOutcome::Sent)
    }
}
