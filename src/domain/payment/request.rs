//! Outbound request to the provider's hosted payment page.

use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::domain::foundation::to_minor_units;

use super::order_reference::OrderReference;
use super::signature::ShaAlgorithm;

/// Hosted page endpoint in test mode.
pub const TEST_GATEWAY_URL: &str = "https://e-payment.postfinance.ch/ncol/test/orderstandard.asp";

/// Hosted page endpoint in production mode.
pub const PROD_GATEWAY_URL: &str = "https://e-payment.postfinance.ch/ncol/prod/orderstandard.asp";

/// Account mode sent in the `mode` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayMode {
    Prod,
    Test,
}

impl GatewayMode {
    pub fn from_live_flag(live: bool) -> Self {
        if live {
            GatewayMode::Prod
        } else {
            GatewayMode::Test
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMode::Prod => "prod",
            GatewayMode::Test => "test",
        }
    }

    /// Hosted page the form posts to.
    pub fn gateway_url(&self) -> &'static str {
        match self {
            GatewayMode::Prod => PROD_GATEWAY_URL,
            GatewayMode::Test => TEST_GATEWAY_URL,
        }
    }
}

/// Signed parameter set for the hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// `orderID`
    pub order_reference: String,
    /// `amount`, integer minor units
    pub amount: String,
    pub currency: String,
    /// `PSPID`
    pub pspid: String,
    pub mode: GatewayMode,
    /// `SHASign`, lowercase hex
    pub signature: String,
    /// Unsigned optional fields (return URLs, language).
    pub extra_fields: Vec<(&'static str, String)>,
}

impl PaymentRequest {
    /// Builds and signs the request.
    ///
    /// The signature covers `orderID`, `amount`, `currency` and `PSPID`, in
    /// that order, followed by the outbound secret.
    pub fn signed(
        reference: OrderReference,
        amount: &BigDecimal,
        currency: &str,
        pspid: &str,
        mode: GatewayMode,
        algorithm: ShaAlgorithm,
        secret: &str,
    ) -> Self {
        let order_reference = reference.to_string();
        let amount = to_minor_units(amount);
        let signature = algorithm.sign(
            &[order_reference.as_str(), amount.as_str(), currency, pspid],
            secret,
        );

        Self {
            order_reference,
            amount,
            currency: currency.to_string(),
            pspid: pspid.to_string(),
            mode,
            signature,
            extra_fields: Vec::new(),
        }
    }

    /// Adds an unsigned hidden field.
    pub fn with_extra_field(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.extra_fields.push((name, value.into()));
        self
    }

    /// Hosted page the form posts to.
    pub fn gateway_url(&self) -> &'static str {
        self.mode.gateway_url()
    }

    /// Form fields in rendering order.
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("orderID", self.order_reference.as_str()),
            ("amount", self.amount.as_str()),
            ("currency", self.currency.as_str()),
            ("PSPID", self.pspid.as_str()),
            ("mode", self.mode.as_str()),
        ];
        fields.extend(self.extra_fields.iter().map(|(name, value)| (*name, value.as_str())));
        fields.push(("SHASign", self.signature.as_str()));
        fields
    }
}
