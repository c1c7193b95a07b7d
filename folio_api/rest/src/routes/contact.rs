use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing, Form, Router,
};
use folio_core_contact_contracts::{
    ContactFeatureService, ContactSubmitError, ContactSubmitOutcome,
};
use folio_models::contact::{ContactSubmissionForm, FAILED_FRAGMENT, SENT_FRAGMENT};
use tracing::{debug, error, info};

use crate::models::contact::ApiContactForm;

pub fn router(service: Arc<impl ContactFeatureService>, redirect_base: Arc<str>) -> Router<()> {
    Router::new()
        .route("/email", routing::post(submit))
        .route("/email.php", routing::post(submit))
        .with_state((service, redirect_base))
}

async fn submit(
    State((service, redirect_base)): State<(Arc<impl ContactFeatureService>, Arc<str>)>,
    Form(form): Form<ApiContactForm>,
) -> Response {
    let email_missing = form.email.is_none();
    let Ok(form) = ContactSubmissionForm::try_from(form) else {
        if email_missing {
            debug!("ignoring submission without email");
            return StatusCode::OK.into_response();
        }
        info!("rejected contact form submission with oversized captcha response");
        return redirect(StatusCode::OK, &redirect_base, FAILED_FRAGMENT, None);
    };

    match service.submit(form).await {
        Ok(ContactSubmitOutcome::Ignored) => StatusCode::OK.into_response(),
        Ok(ContactSubmitOutcome::Sent) => {
            info!("contact message sent");
            redirect(StatusCode::OK, &redirect_base, SENT_FRAGMENT, None)
        }
        Err(ContactSubmitError::CaptchaFailed) => {
            info!("rejected contact form submission: captcha check failed");
            redirect(StatusCode::OK, &redirect_base, FAILED_FRAGMENT, None)
        }
        Err(ContactSubmitError::VerificationUnavailable(err)) => {
            error!("Failed to verify captcha: {err:#}");
            redirect(
                StatusCode::BAD_GATEWAY,
                &redirect_base,
                FAILED_FRAGMENT,
                None,
            )
        }
        Err(ContactSubmitError::Invalid(errors)) => {
            info!(%errors, "rejected invalid contact form submission");
            redirect(
                StatusCode::UNPROCESSABLE_ENTITY,
                &redirect_base,
                FAILED_FRAGMENT,
                Some(&errors.to_string()),
            )
        }
        Err(ContactSubmitError::Send) => {
            error!("Mail transport refused the contact message");
            redirect(
                StatusCode::INTERNAL_SERVER_ERROR,
                &redirect_base,
                FAILED_FRAGMENT,
                None,
            )
        }
        Err(ContactSubmitError::Other(err)) => {
            error!("Failed to send contact message: {err:#}");
            redirect(
                StatusCode::INTERNAL_SERVER_ERROR,
                &redirect_base,
                FAILED_FRAGMENT,
                None,
            )
        }
    }
}

/// Sends the browser back to `{base}#{fragment}` where the client script
/// shows the outcome.
fn redirect(status: StatusCode, base: &str, fragment: &str, details: Option<&str>) -> Response {
    let mut body = format!(
        r#"<script type="text/javascript">window.location="{base}#{fragment}";</script>"#
    );
    if let Some(details) = details {
        body.push_str("\n<pre>");
        body.push_str(&escape_html(details));
        body.push_str("</pre>");
    }
    (status, Html(body)).into_response()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
