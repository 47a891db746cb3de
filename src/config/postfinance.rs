//! PostFinance configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::payment::{GatewayMode, ShaAlgorithm};

use super::error::ValidationError;

/// PostFinance merchant account configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PostfinanceConfig {
    /// Merchant id (PSPID)
    pub pspid: String,

    /// Send customers to the production hosted page
    #[serde(default)]
    pub live: bool,

    /// Secret appended to outbound request signatures (SHA-IN)
    pub sha1_in: SecretString,

    /// Secret appended to IPN callback signatures (SHA-OUT)
    pub sha1_out: SecretString,

    /// Digest configured in the provider back office
    #[serde(default)]
    pub hash_algorithm: ShaAlgorithm,

    /// Where customers go when their order is already paid
    #[serde(default = "default_already_paid_url")]
    pub already_paid_url: String,

    /// Return URL after an accepted payment
    pub accept_url: Option<String>,

    /// Return URL after a declined payment
    pub decline_url: Option<String>,

    /// Return URL when the payment outcome is uncertain
    pub exception_url: Option<String>,

    /// Return URL when the customer cancels
    pub cancel_url: Option<String>,

    /// Hosted page language, e.g. `de_CH`
    pub language: Option<String>,
}

impl PostfinanceConfig {
    /// Creates a test-mode configuration with the given credentials.
    pub fn new(
        pspid: impl Into<String>,
        sha1_in: impl Into<String>,
        sha1_out: impl Into<String>,
    ) -> Self {
        Self {
            pspid: pspid.into(),
            live: false,
            sha1_in: SecretString::new(sha1_in.into()),
            sha1_out: SecretString::new(sha1_out.into()),
            hash_algorithm: ShaAlgorithm::default(),
            already_paid_url: default_already_paid_url(),
            accept_url: None,
            decline_url: None,
            exception_url: None,
            cancel_url: None,
            language: None,
        }
    }

    /// Mode sent to the provider
    pub fn mode(&self) -> GatewayMode {
        GatewayMode::from_live_flag(self.live)
    }

    /// Unsigned optional form fields that are configured, as (name, value)
    pub fn optional_form_fields(&self) -> Vec<(&'static str, String)> {
        [
            ("ACCEPTURL", &self.accept_url),
            ("DECLINEURL", &self.decline_url),
            ("EXCEPTIONURL", &self.exception_url),
            ("CANCELURL", &self.cancel_url),
            ("language", &self.language),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name, v.clone())))
        .collect()
    }

    /// Validate PostFinance configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.pspid.trim().is_empty() {
            return Err(ValidationError::MissingRequired("POSTFINANCE_PSPID"));
        }
        if self.sha1_in.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("POSTFINANCE_SHA1_IN"));
        }
        if self.sha1_out.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("POSTFINANCE_SHA1_OUT"));
        }
        if self.sha1_in.expose_secret() == self.sha1_out.expose_secret() {
            return Err(ValidationError::IdenticalSignatureSecrets);
        }
        if self.already_paid_url.is_empty() {
            return Err(ValidationError::MissingRequired("POSTFINANCE_ALREADY_PAID_URL"));
        }
        Ok(())
    }
}

fn default_already_paid_url() -> String {
    "/order/already-paid/".to_string()
}
