pub mod captcha;
pub mod time;
