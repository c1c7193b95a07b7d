//! Static assets embedded into the binary.

use folio_models::contact::{FAILED_FRAGMENT, SENT_FRAGMENT};

include!(env!("FOLIO_ASSETS"));

/// Returns the client script with the submission fragments filled in.
pub fn main_js() -> String {
    js::MAIN_JS
        .replace("{{SENT_FRAGMENT}}", SENT_FRAGMENT)
        .replace("{{FAILED_FRAGMENT}}", FAILED_FRAGMENT)
}
