mod http;
pub mod recaptcha;

pub use http::HttpClient;
