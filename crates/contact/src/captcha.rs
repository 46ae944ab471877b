//! CAPTCHA verification collaborator.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tozemoon_config::CaptchaConfig;

/// Body returned by the verification endpoint. Only `success` matters to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Verdict {
    #[serde(default)]
    pub success: bool,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("verification request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("verification response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// Redeem `token` for the requester at `remote_ip`.
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<Verdict, CaptchaError>;
}

/// hCaptcha `siteverify` client.
#[derive(Debug, Clone)]
pub struct HCaptchaVerifier {
    client: Client,
    verify_url: String,
    secret: String,
    site_key: String,
}

impl HCaptchaVerifier {
    pub fn new(client: Client, config: &CaptchaConfig) -> Self {
        Self {
            client,
            verify_url: config.verify_url.clone(),
            secret: config.secret.clone(),
            site_key: config.site_key.clone(),
        }
    }
}

#[async_trait]
impl CaptchaVerifier for HCaptchaVerifier {
    async fn verify(&self, token: &str, remote_ip: &str) -> Result<Verdict, CaptchaError> {
        let form = [
            ("secret", self.secret.as_str()),
            ("response", token),
            ("sitekey", self.site_key.as_str()),
            ("remoteip", remote_ip),
        ];
        let response = self.client.post(&self.verify_url).form(&form).send().await?;
        // Non-2xx answers still carry a JSON verdict; only the body decides.
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_defaults_to_failure() {
        let verdict: Verdict = serde_json::from_str("{}").unwrap();
        assert!(!verdict.success);
        let body = r#"{"success":false,"error-codes":["invalid-input-response"]}"#;
        let verdict: Verdict = serde_json::from_str(body).unwrap();
        assert_eq!(
            verdict.error_codes,
            vec!["invalid-input-response".to_string()]
        );
    }
}
