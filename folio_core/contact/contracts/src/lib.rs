use std::future::Future;

use folio_models::contact::{ContactSubmissionForm, ContactValidationErrors};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Verifies, validates and forwards a contact form submission to the site
    /// owner.
    ///
    /// Submissions without an email address or captcha response are ignored.
    fn submit(
        &self,
        form: ContactSubmissionForm,
    ) -> impl Future<Output = Result<ContactSubmitOutcome, ContactSubmitError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSubmitOutcome {
    /// Required fields were missing, nothing has been done.
    Ignored,
    /// The message has been accepted by the mail transport.
    Sent,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("The captcha check failed.")]
    CaptchaFailed,
    #[error("The captcha could not be verified: {0:#}")]
    VerificationUnavailable(anyhow::Error),
    #[error("The submission is invalid:\n{0}")]
    Invalid(ContactValidationErrors),
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        form: ContactSubmissionForm,
        result: Result<ContactSubmitOutcome, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(form))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}
