use std::{
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context};
use config::{Environment, File, FileFormat};
pub use duration::Duration;
use folio_models::email_address::{EmailAddress, EmailAddressWithName};
use serde::Deserialize;
use url::Url;

mod duration;

/// The configuration shipped with the binary. Always loaded first.
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Environment variable containing a colon separated list of additional
/// config files.
pub const CONFIG_PATHS_ENV: &str = "FOLIO_CONFIG";

/// Prefix of environment variables overriding single config values, e.g.
/// `FOLIO__RECAPTCHA__SECRET`.
pub const ENV_PREFIX: &str = "FOLIO";

/// Development overrides pointing to the local fake reCAPTCHA server.
pub const DEV_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.dev.toml");

pub fn load() -> anyhow::Result<Config> {
    let paths = std::env::var_os(CONFIG_PATHS_ENV)
        .map(|paths| std::env::split_paths(&paths).collect::<Vec<PathBuf>>())
        .unwrap_or_default();
    load_with_override(&paths, &[])
}

pub fn load_dev_config() -> anyhow::Result<Config> {
    load_with_override(&[DEV_CONFIG_PATH], &[])
}

/// Loads the default config, then the given files in order, then the inline
/// TOML `overrides` and finally the `FOLIO__*` environment variables.
pub fn load_with_override(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder =
        config::Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths.iter().try_fold(builder, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        anyhow::Ok(builder.add_source(File::from_str(&content, FileFormat::Toml)))
    })?;

    let builder = overrides.iter().fold(builder, |builder, &item| {
        builder.add_source(File::from_str(item, FileFormat::Toml))
    });

    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<Config>()
        .context("Failed to load config")?;

    config.validate()?;

    Ok(config)
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub contact: ContactConfig,
    pub recaptcha: RecaptchaConfig,
    pub health: HealthConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub redirect_base: String,
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from: EmailAddressWithName,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub email: EmailAddress,
}

#[derive(Deserialize)]
pub struct RecaptchaConfig {
    pub siteverify_endpoint_override: Option<Url>,
    pub secret: String,
    pub min_score: f64,
    pub timeout: Duration,
}

impl std::fmt::Debug for RecaptchaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecaptchaConfig")
            .field(
                "siteverify_endpoint_override",
                &self.siteverify_endpoint_override,
            )
            .field("secret", &"[redacted]")
            .field("min_score", &self.min_score)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (0.0..=1.0).contains(&self.recaptcha.min_score),
            "recaptcha.min_score must be between 0 and 1"
        );
        ensure!(
            !self.recaptcha.secret.is_empty(),
            "recaptcha.secret must not be empty"
        );
        ensure!(
            !self.http.redirect_base.contains(['"', '<', '>', '\\', '\n', '\r']),
            "http.redirect_base contains forbidden characters"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_config() {
        let config = load_dev_config().unwrap();
        assert_eq!(config.http.redirect_base, "index.html");
        assert_eq!(config.recaptcha.min_score, 0.5);
        assert_eq!(*config.recaptcha.timeout, std::time::Duration::from_secs(10));
        assert_eq!(config.contact.email.as_str(), "contact@example.com");
    }

    #[test]
    fn inline_override() {
        let config = load_with_override(
            &[DEV_CONFIG_PATH],
            &["recaptcha.min_score = 0.7", "http.static_dir = \"/srv/www\""],
        )
        .unwrap();
        assert_eq!(config.recaptcha.min_score, 0.7);
        assert_eq!(config.http.static_dir, Some(PathBuf::from("/srv/www")));
    }

    #[test]
    fn invalid_min_score() {
        let result = load_with_override(&[DEV_CONFIG_PATH], &["recaptcha.min_score = 1.5"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_file() {
        let result = load_with_override(&[Path::new("/nonexistent/folio.toml")], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn secret_is_not_printed() {
        let config = load_dev_config().unwrap();
        let debug = format!("{:?}", config.recaptcha);
        assert!(!debug.contains("test-secret"));
    }

    #[test]
    fn secret_is_required() {
        let result = load_with_override(&[] as &[&Path], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn empty_secret() {
        let result = load_with_override(&[] as &[&Path], &["recaptcha.secret = \"\""]);
        assert!(result.is_err());
    }

    #[test]
    fn default_endpoint_is_not_overridden() {
        let config =
            load_with_override(&[] as &[&Path], &["recaptcha.secret = \"prod-secret\""]).unwrap();
        assert_eq!(config.recaptcha.siteverify_endpoint_override, None);
        assert_eq!(config.recaptcha.secret, "prod-secret");
    }
}
