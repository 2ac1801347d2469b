//! Integrity tag for the identity/request-secret pair carried in the callback URL.
//!
//! Binds the identity to the request secret, so a callback cannot be replayed with
//! a different identity attached.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use relay_core::Identity;
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Query parameter that carries the tag.
pub const SIGNATURE_PARAM: &str = "sig";

#[derive(Clone)]
pub struct CallbackGuard {
    key: Vec<u8>,
}

impl CallbackGuard {
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
        }
    }

    fn mac(&self, identity: Identity, request_secret: &str) -> HmacSha1 {
        let mut mac = HmacSha1::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(format!("{}&{}", identity, request_secret).as_bytes());
        mac
    }

    /// base64url (no padding) HMAC-SHA1 over `"<identity>&<request_secret>"`.
    pub fn sign(&self, identity: Identity, request_secret: &str) -> String {
        URL_SAFE_NO_PAD.encode(self.mac(identity, request_secret).finalize().into_bytes())
    }

    /// Constant-time check of a tag received in the callback.
    pub fn verify(&self, identity: Identity, request_secret: &str, signature: &str) -> bool {
        let Ok(raw) = URL_SAFE_NO_PAD.decode(signature.as_bytes()) else {
            return false;
        };
        self.mac(identity, request_secret).verify_slice(&raw).is_ok()
    }
}
