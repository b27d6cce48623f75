//! VAPID key handling (RFC 8292).
//!
//! The P-256 private key lives on disk as PKCS8 PEM so that browser
//! subscriptions stay deliverable across restarts. The public key is
//! derived from it and handed to browsers as `applicationServerKey`.

use std::{fmt, fs, path::Path};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use jsonwebtoken::EncodingKey;
use p256::{
    ecdsa::SigningKey,
    elliptic_curve::rand_core::OsRng,
    pkcs8::{DecodePrivateKey, EncodePrivateKey, LineEnding},
};
use tracing::{info, warn};

use crate::error::Error;

pub struct VapidKeys {
    pem: String,
    public_key: String,
    encoding_key: EncodingKey,
}

impl VapidKeys {
    pub fn generate() -> Result<VapidKeys, Error> {
        let signing_key = SigningKey::random(&mut OsRng);
        let pem = signing_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|e| Error::VapidKey(e.to_string()))?;

        Self::from_signing_key(&signing_key, pem.as_str().to_owned())
    }

    pub fn from_pem(pem: &str) -> Result<VapidKeys, Error> {
        let signing_key = SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| Error::VapidKey(e.to_string()))?;

        Self::from_signing_key(&signing_key, pem.to_owned())
    }

    fn from_signing_key(
        signing_key: &SigningKey,
        pem: String,
    ) -> Result<VapidKeys, Error> {
        // Uncompressed SEC1 point: 0x04 || x || y
        let point = signing_key.verifying_key().to_encoded_point(false);
        let public_key = BASE64_URL.encode(point.as_bytes());
        let encoding_key = EncodingKey::from_ec_pem(pem.as_bytes())?;

        Ok(VapidKeys {
            pem,
            public_key,
            encoding_key,
        })
    }

    /// Loads the key from `path`, or generates one and stores it there.
    pub fn load_or_generate(path: &Path) -> Result<VapidKeys, Error> {
        if path.exists() {
            let pem = fs::read_to_string(path)?;
            let keys = Self::from_pem(&pem)?;
            info!("VAPID key loaded from {}", path.display());
            return Ok(keys);
        }

        warn!(
            "VAPID key not found at {}, generating a new key pair",
            path.display()
        );
        let keys = Self::generate()?;
        keys.write(path)?;

        Ok(keys)
    }

    pub fn write(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.pem.as_bytes())?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        info!("VAPID key written to {}", path.display());
        Ok(())
    }

    /// Base64url uncompressed public key (65 bytes decoded).
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }
}

impl fmt::Debug for VapidKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VapidKeys")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
