use folio_api_rest::RestServerConfig;
use folio_config::Config;
use folio_core_contact_impl::ContactFeatureConfig;
use folio_core_health_impl::HealthFeatureConfig;
use folio_extern_impl::{recaptcha::RecaptchaApiServiceConfig, HttpClient};
use folio_shared_impl::captcha::CaptchaServiceConfig;
use types::{Captcha, ContactFeature, Email, HealthFeature, RecaptchaApi, RestServer, Time};

pub mod types;

/// Wires the services together.
#[derive(Debug, Clone)]
pub struct Provider {
    config: ConfigProvider,
    email: Email,
}

impl Provider {
    pub fn new(config: ConfigProvider, email: Email) -> Self {
        Self { config, email }
    }

    pub fn rest_server(&self) -> anyhow::Result<RestServer> {
        Ok(RestServer::new(
            self.health_feature(),
            self.contact_feature()?,
            self.config.rest_server_config.clone(),
        ))
    }

    fn contact_feature(&self) -> anyhow::Result<ContactFeature> {
        Ok(ContactFeature::new(
            self.captcha()?,
            self.email.clone(),
            self.config.contact_feature_config.clone(),
        ))
    }

    fn health_feature(&self) -> HealthFeature {
        HealthFeature::new(
            Time::default(),
            self.email.clone(),
            self.config.health_feature_config.clone(),
        )
    }

    fn captcha(&self) -> anyhow::Result<Captcha> {
        Ok(Captcha::new(
            self.recaptcha_api()?,
            self.config.captcha_service_config.clone(),
        ))
    }

    fn recaptcha_api(&self) -> anyhow::Result<RecaptchaApi> {
        let client = HttpClient::new(self.config.http_client_timeout)?;
        Ok(RecaptchaApi::new(
            self.config.recaptcha_api_service_config.clone(),
            client,
        ))
    }
}

/// Everything derived from the [`Config`] that services need at construction.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    // API
    rest_server_config: RestServerConfig,

    // Extern
    recaptcha_api_service_config: RecaptchaApiServiceConfig,
    http_client_timeout: std::time::Duration,

    // Shared
    captcha_service_config: CaptchaServiceConfig,

    // Core
    contact_feature_config: ContactFeatureConfig,
    health_feature_config: HealthFeatureConfig,
}

impl ConfigProvider {
    pub fn new(config: &Config) -> Self {
        // API
        let rest_server_config = RestServerConfig {
            redirect_base: config.http.redirect_base.as_str().into(),
            static_dir: config.http.static_dir.clone(),
        };

        // Extern
        let recaptcha_api_service_config =
            RecaptchaApiServiceConfig::new(config.recaptcha.siteverify_endpoint_override.clone());
        let http_client_timeout = config.recaptcha.timeout.into();

        // Shared
        let captcha_service_config = CaptchaServiceConfig {
            secret: config.recaptcha.secret.as_str().into(),
            min_score: config.recaptcha.min_score,
        };

        // Core
        let contact_feature_config = ContactFeatureConfig {
            email: config.contact.email.clone().into(),
        };

        let health_feature_config = HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        };

        Self {
            // API
            rest_server_config,

            // Extern
            recaptcha_api_service_config,
            http_client_timeout,

            // Shared
            captcha_service_config,

            // Core
            contact_feature_config,
            health_feature_config,
        }
    }
}
