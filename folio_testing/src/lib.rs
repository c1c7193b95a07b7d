//! Local stand-ins for the third party services used by the folio backend.

pub mod recaptcha;
