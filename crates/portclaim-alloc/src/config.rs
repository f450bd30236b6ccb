//! Allocator configuration

use crate::error::ConfigError;
use portclaim_lifecycle::{ProductType, SubscriptionStatus};
use serde::{Deserialize, Serialize};

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Plain,
    /// One JSON object per event
    Json,
}

/// Logging section of the configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
        }
    }
}

/// Allocator configuration
///
/// Which products and statuses count as holding a VLAN claim, which product
/// pair forms the NSI reservation tier, and whether validation serializes on
/// a per-port lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Products whose SAPs claim VLANs on a port
    pub claim_products: Vec<ProductType>,
    /// Statuses in which a claim is held
    pub claim_statuses: Vec<SubscriptionStatus>,
    /// Statuses in which a reservation counts towards the budget
    pub reservation_statuses: Vec<SubscriptionStatus>,
    /// Product that reserves a VLAN budget on a port
    pub reservation_product: ProductType,
    /// Product that consumes the reserved budget
    pub consumer_product: ProductType,
    /// Serialize validation per port
    pub lock_ports: bool,
    /// Logging section
    pub logging: LoggingConfig,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            claim_products: vec![ProductType::L2vpn, ProductType::Nsistp, ProductType::Nsip2p],
            claim_statuses: vec![
                SubscriptionStatus::Provisioning,
                SubscriptionStatus::Active,
                SubscriptionStatus::Migrating,
            ],
            reservation_statuses: vec![SubscriptionStatus::Provisioning, SubscriptionStatus::Active],
            reservation_product: ProductType::Nsistp,
            consumer_product: ProductType::Nsip2p,
            lock_ports: true,
            logging: LoggingConfig::default(),
        }
    }
}

impl AllocatorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a TOML document; missing keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the values are consistent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.claim_products.is_empty() {
            return Err(ConfigError::Invalid("claim_products must not be empty".into()));
        }
        if self.claim_statuses.is_empty() {
            return Err(ConfigError::Invalid("claim_statuses must not be empty".into()));
        }
        if let Some(status) = self
            .claim_statuses
            .iter()
            .chain(&self.reservation_statuses)
            .find(|status| !status.holds_claim())
        {
            return Err(ConfigError::Invalid(format!(
                "status {status} never holds a claim"
            )));
        }
        if self.reservation_product == self.consumer_product {
            return Err(ConfigError::Invalid(
                "reservation_product and consumer_product must differ".into(),
            ));
        }
        Ok(())
    }

    /// Set the claiming products
    #[inline]
    #[must_use]
    pub fn with_claim_products(mut self, products: Vec<ProductType>) -> Self {
        self.claim_products = products;
        self
    }

    /// Set the claiming statuses
    #[inline]
    #[must_use]
    pub fn with_claim_statuses(mut self, statuses: Vec<SubscriptionStatus>) -> Self {
        self.claim_statuses = statuses;
        self
    }

    /// Set the reservation statuses
    #[inline]
    #[must_use]
    pub fn with_reservation_statuses(mut self, statuses: Vec<SubscriptionStatus>) -> Self {
        self.reservation_statuses = statuses;
        self
    }

    /// Set the reservation and consumer product pair
    #[inline]
    #[must_use]
    pub fn with_nsi_products(mut self, reservation: ProductType, consumer: ProductType) -> Self {
        self.reservation_product = reservation;
        self.consumer_product = consumer;
        self
    }

    /// Enable or disable the per-port lock
    #[inline]
    #[must_use]
    pub fn with_lock_ports(mut self, lock_ports: bool) -> Self {
        self.lock_ports = lock_ports;
        self
    }

    /// Set the logging section
    #[inline]
    #[must_use]
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Claiming products for a request, leaving out the NSI pair when `nsi`
    #[must_use]
    pub fn claim_family(&self, nsi: bool) -> Vec<ProductType> {
        self.claim_products
            .iter()
            .copied()
            .filter(|product| {
                !nsi || (*product != self.reservation_product && *product != self.consumer_product)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_is_default() {
        let config = AllocatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, AllocatorConfig::default());
        assert!(config.lock_ports);
    }

    #[test]
    fn test_partial_document() {
        let config = AllocatorConfig::from_toml_str(
            r#"
            lock_ports = false
            claim_statuses = ["provisioning", "active"]

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert!(!config.lock_ports);
        assert_eq!(config.claim_statuses.len(), 2);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.reservation_product, ProductType::Nsistp);
    }

    #[test]
    fn test_rejects_terminated_claims() {
        let err = AllocatorConfig::from_toml_str(r#"claim_statuses = ["terminated"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_same_nsi_products() {
        let config =
            AllocatorConfig::new().with_nsi_products(ProductType::Nsistp, ProductType::Nsistp);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = AllocatorConfig::from_toml_str("lock_ports = maybe").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_nsi_family_drops_reservation_pair() {
        let config = AllocatorConfig::default();
        assert_eq!(config.claim_family(true), vec![ProductType::L2vpn]);
        assert_eq!(config.claim_family(false).len(), 3);
    }
}
