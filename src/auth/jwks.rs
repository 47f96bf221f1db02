use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::jwt::{self, Claims};

const JWKS_URL_TEMPLATE: &str = "https://{}.supabase.co/auth/v1/.well-known/jwks.json";
const KEY_TTL: Duration = Duration::from_secs(3600);

/// One entry of the published key set. Only EC keys are used.
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    x: Option<String>,
    y: Option<String>,
    alg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Clone)]
struct SigningKey {
    x: String,
    y: String,
    algorithm: Algorithm,
}

impl TryFrom<Jwk> for SigningKey {
    type Error = String;

    fn try_from(jwk: Jwk) -> Result<Self, String> {
        let algorithm = match jwk.alg.as_deref() {
            Some("ES384") => Algorithm::ES384,
            _ => Algorithm::ES256,
        };
        Ok(Self {
            x: jwk.x.ok_or("Missing 'x' in JWK")?,
            y: jwk.y.ok_or("Missing 'y' in JWK")?,
            algorithm,
        })
    }
}

/// Signing keys of the identity provider, fetched on demand and kept by `kid`.
#[derive(Clone)]
pub struct JwksCache {
    keys: Arc<Cache<String, SigningKey>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(project_ref: &str, anon_key: &str) -> Self {
        Self {
            keys: Arc::new(Cache::builder().time_to_live(KEY_TTL).max_capacity(10).build()),
            jwks_url: JWKS_URL_TEMPLATE.replace("{}", project_ref),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_key_set(&self) -> Result<JwkSet, String> {
        debug!(url = %self.jwks_url, "fetching signing keys");

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "signing key fetch rejected");
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn signing_key(&self, kid: &str) -> Result<SigningKey, String> {
        if let Some(cached) = self.keys.get(kid).await {
            return Ok(cached);
        }

        let jwk = self
            .fetch_key_set()
            .await?
            .keys
            .into_iter()
            .find(|k| k.kid == kid)
            .ok_or(format!("Key with kid={kid} not found in JWKS"))?;

        let key = SigningKey::try_from(jwk)?;
        self.keys.insert(kid.to_string(), key.clone()).await;
        Ok(key)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Claims, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key = self.signing_key(&kid).await?;
        let decoding_key = DecodingKey::from_ec_components(&key.x, &key.y)
            .map_err(|e| format!("Failed to create decoding key: {e}"))?;

        let mut validation = Validation::new(key.algorithm);
        validation.validate_aud = false;

        jwt::decode_claims(token, &decoding_key, &validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_set_and_defaults_algorithm() {
        let set: JwkSet = serde_json::from_value(serde_json::json!({
            "keys": [
                { "kid": "a", "kty": "EC", "x": "xx", "y": "yy" },
                { "kid": "b", "kty": "EC", "x": "xx", "y": "yy", "alg": "ES384" },
            ]
        }))
        .unwrap();

        let keys: Vec<SigningKey> = set
            .keys
            .into_iter()
            .map(|k| SigningKey::try_from(k).unwrap())
            .collect();
        assert_eq!(keys[0].algorithm, Algorithm::ES256);
        assert_eq!(keys[1].algorithm, Algorithm::ES384);
    }

    #[test]
    fn key_without_coordinates_is_rejected() {
        let jwk = Jwk {
            kid: "a".into(),
            x: None,
            y: Some("yy".into()),
            alg: None,
        };
        assert!(SigningKey::try_from(jwk).is_err());
    }
}
