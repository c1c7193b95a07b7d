use nutype::nutype;

pub mod contact;
pub mod email_address;

/// Opaque token produced by the reCAPTCHA widget on the client.
#[nutype(
    validate(len_char_max = 2048),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize, Deserialize)
)]
pub struct RecaptchaResponse(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recaptcha_response_length() {
        assert!(RecaptchaResponse::try_new("token".to_owned()).is_ok());
        assert!(RecaptchaResponse::try_new("x".repeat(2048)).is_ok());
        assert!(RecaptchaResponse::try_new("x".repeat(2049)).is_err());
    }

    #[test]
    fn recaptcha_response_deserialize_too_long() {
        let value = serde_json::Value::String("x".repeat(4096));
        assert!(serde_json::from_value::<RecaptchaResponse>(value).is_err());
    }
}
