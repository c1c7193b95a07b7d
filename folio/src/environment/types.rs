use folio_core_contact_impl::ContactFeatureServiceImpl;
use folio_core_health_impl::HealthFeatureServiceImpl;
use folio_email_impl::EmailServiceImpl;
use folio_extern_impl::recaptcha::RecaptchaApiServiceImpl;
use folio_shared_impl::{captcha::CaptchaServiceImpl, time::TimeServiceImpl};

// API
pub type RestServer = folio_api_rest::RestServer<HealthFeature, ContactFeature>;

// Email
pub type Email = EmailServiceImpl;

// Extern
pub type RecaptchaApi = RecaptchaApiServiceImpl;

// Shared
pub type Captcha = CaptchaServiceImpl<RecaptchaApi>;
pub type Time = TimeServiceImpl;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<Captcha, Email>;
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;
