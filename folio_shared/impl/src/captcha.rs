use std::sync::Arc;

use anyhow::anyhow;
use folio_extern_contracts::recaptcha::RecaptchaApiService;
use folio_shared_contracts::captcha::{CaptchaCheckError, CaptchaService};
use tracing::{debug, info};

/// Error codes with which siteverify blames our own configuration rather
/// than the client's response.
const SECRET_ERROR_CODES: &[&str] = &["missing-input-secret", "invalid-input-secret"];

#[derive(Debug, Clone)]
pub struct CaptchaServiceImpl<RecaptchaApi> {
    recaptcha_api: RecaptchaApi,
    config: CaptchaServiceConfig,
}

#[derive(Clone)]
pub struct CaptchaServiceConfig {
    pub secret: Arc<str>,
    pub min_score: f64,
}

impl std::fmt::Debug for CaptchaServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptchaServiceConfig")
            .field("secret", &"[redacted]")
            .field("min_score", &self.min_score)
            .finish()
    }
}

impl<RecaptchaApi> CaptchaServiceImpl<RecaptchaApi> {
    pub fn new(recaptcha_api: RecaptchaApi, config: CaptchaServiceConfig) -> Self {
        Self {
            recaptcha_api,
            config,
        }
    }
}

impl<RecaptchaApi> CaptchaService for CaptchaServiceImpl<RecaptchaApi>
where
    RecaptchaApi: RecaptchaApiService,
{
    async fn check(&self, response: &str) -> Result<(), CaptchaCheckError> {
        let result = self
            .recaptcha_api
            .siteverify(response, &self.config.secret)
            .await
            .map_err(CaptchaCheckError::Unavailable)?;

        if let Some(code) = result
            .error_codes
            .iter()
            .find(|code| SECRET_ERROR_CODES.contains(&code.as_str()))
        {
            return Err(CaptchaCheckError::Unavailable(anyhow!(
                "siteverify rejected the configured secret: {code}"
            )));
        }

        if !result.success {
            info!(error_codes = ?result.error_codes, "recaptcha response rejected");
            return Err(CaptchaCheckError::Failed);
        }

        // a successful verification without a score means we are not talking
        // to a v3 endpoint
        let score = result.score.ok_or_else(|| {
            CaptchaCheckError::Unavailable(anyhow!("siteverify response did not contain a score"))
        })?;

        if score < self.config.min_score {
            info!(score, min_score = self.config.min_score, "recaptcha score too low");
            return Err(CaptchaCheckError::Failed);
        }

        debug!(score, "recaptcha check passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use folio_extern_contracts::recaptcha::{
        MockRecaptchaApiService, RecaptchaSiteverifyResponse,
    };
    use folio_utils::assert_matches;

    use super::*;

    fn config(min_score: f64) -> CaptchaServiceConfig {
        CaptchaServiceConfig {
            secret: "recaptcha secret".into(),
            min_score,
        }
    }

    fn siteverify_response(success: bool, score: Option<f64>) -> RecaptchaSiteverifyResponse {
        RecaptchaSiteverifyResponse {
            success,
            score,
            error_codes: Vec::new(),
        }
    }

    #[tokio::test]
    async fn ok() {
        // Arrange
        let recaptcha_api = MockRecaptchaApiService::new().with_siteverify(
            "captcha response".into(),
            "recaptcha secret".into(),
            siteverify_response(true, Some(0.7)),
        );

        let sut = CaptchaServiceImpl::new(recaptcha_api, config(0.5));

        // Act
        let result = sut.check("captcha response").await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn ok_exact_threshold() {
        // Arrange
        let recaptcha_api = MockRecaptchaApiService::new().with_siteverify(
            "captcha response".into(),
            "recaptcha secret".into(),
            siteverify_response(true, Some(0.5)),
        );

        let sut = CaptchaServiceImpl::new(recaptcha_api, config(0.5));

        // Act
        let result = sut.check("captcha response").await;

        // Assert
        result.unwrap();
    }

    #[tokio::test]
    async fn failed_insufficient_score() {
        for score in [0.0, 0.1, 0.49] {
            // Arrange
            let recaptcha_api = MockRecaptchaApiService::new().with_siteverify(
                "captcha response".into(),
                "recaptcha secret".into(),
                siteverify_response(true, Some(score)),
            );

            let sut = CaptchaServiceImpl::new(recaptcha_api, config(0.5));

            // Act
            let result = sut.check("captcha response").await;

            // Assert
            assert_matches!(result, Err(CaptchaCheckError::Failed));
        }
    }

    #[tokio::test]
    async fn failed_no_success() {
        // Arrange
        let recaptcha_api = MockRecaptchaApiService::new().with_siteverify(
            "captcha response".into(),
            "recaptcha secret".into(),
            RecaptchaSiteverifyResponse {
                success: false,
                score: None,
                error_codes: vec!["invalid-input-response".into()],
            },
        );

        let sut = CaptchaServiceImpl::new(recaptcha_api, config(0.5));

        // Act
        let result = sut.check("captcha response").await;

        // Assert
        assert_matches!(result, Err(CaptchaCheckError::Failed));
    }

    #[tokio::test]
    async fn unavailable_no_score() {
        // Arrange
        let recaptcha_api = MockRecaptchaApiService::new().with_siteverify(
            "captcha response".into(),
            "recaptcha secret".into(),
            siteverify_response(true, None),
        );

        let sut = CaptchaServiceImpl::new(recaptcha_api, config(0.5));

        // Act
        let result = sut.check("captcha response").await;

        // Assert
        assert_matches!(result, Err(CaptchaCheckError::Unavailable(_)));
    }

    #[tokio::test]
    async fn unavailable_api_error() {
        // Arrange
        let recaptcha_api = MockRecaptchaApiService::new()
            .with_siteverify_error("captcha response".into(), "recaptcha secret".into());

        let sut = CaptchaServiceImpl::new(recaptcha_api, config(0.5));

        // Act
        let result = sut.check("captcha response").await;

        // Assert
        assert_matches!(result, Err(CaptchaCheckError::Unavailable(_)));
    }

    #[tokio::test]
    async fn unavailable_secret_error_codes() {
        for code in ["missing-input-secret", "invalid-input-secret"] {
            // Arrange
            let recaptcha_api = MockRecaptchaApiService::new().with_siteverify(
                "captcha response".into(),
                "recaptcha secret".into(),
                RecaptchaSiteverifyResponse {
                    success: false,
                    score: None,
                    error_codes: vec![code.into()],
                },
            );

            let sut = CaptchaServiceImpl::new(recaptcha_api, config(0.5));

            // Act
            let result = sut.check("captcha response").await;

            // Assert
            assert_matches!(result, Err(CaptchaCheckError::Unavailable(_)));
        }
    }
}
