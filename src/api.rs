//! Access to the PrivatBank exchange rate archive.

use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::Deserialize;
use ureq::Agent;
use ureq::config::Config;
use ureq::tls::TlsConfig;

use crate::error::FetchError;
use crate::format_date;

pub const PRIVAT_BASE_URL: &str = "https://api.privatbank.ua/p24api";

/// Anything that can produce the archived rates for a single day.
pub trait RateSource {
    fn fetch(&self, date: Date) -> Result<ExchangeRates, FetchError>;
}

/// Blocking client for `/exchange_rates`.
///
/// Every call opens its own agent, so no connection is kept between days.
pub struct PrivatClient {
    base_url: String,
    verify_tls: bool,
}

impl PrivatClient {
    pub fn new() -> Self {
        Self::with_base_url(PRIVAT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            verify_tls: true,
        }
    }

    /// Skip certificate verification for every request made by this client.
    pub fn insecure(mut self) -> Self {
        self.verify_tls = false;
        self
    }

    pub fn verifies_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn url_for(&self, date: Date) -> String {
        format!(
            "{}/exchange_rates?json&date={}",
            self.base_url.trim_end_matches('/'),
            format_date(date)
        )
    }

    fn agent(&self) -> Agent {
        Agent::new_with_config(self.config())
    }

    fn config(&self) -> Config {
        Agent::config_builder()
            // Status is checked by hand so non-200 replies are not reported as transport errors
            .http_status_as_error(false)
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(!self.verify_tls)
                    .build(),
            )
            .build()
    }
}

impl Default for PrivatClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RateSource for PrivatClient {
    fn fetch(&self, date: Date) -> Result<ExchangeRates, FetchError> {
        let url = self.url_for(date);
        log::debug!("GET {url}");

        let mut resp = self.agent().get(&url).call()?;
        let status = resp.status().as_u16();
        if status != 200 {
            return Err(FetchError::Status(status));
        }

        let body = resp.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Body of an `/exchange_rates` reply
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRates {
    pub date: Option<String>,
    pub bank: Option<String>,
    pub base_currency_lit: Option<String>,
    pub exchange_rate: Option<Vec<RateEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    pub base_currency: Option<String>,
    /// Absent on the leading entry describing the base currency itself
    pub currency: Option<String>,
    /// Price of 1 unit of `currency` when sold to a customer, in the base currency
    pub sale_rate: Option<Decimal>,
    /// Price of 1 unit of `currency` when bought from a customer, in the base currency
    pub purchase_rate: Option<Decimal>,
    #[serde(rename = "saleRateNB")]
    pub sale_rate_nb: Option<Decimal>,
    #[serde(rename = "purchaseRateNB")]
    pub purchase_rate_nb: Option<Decimal>,
}
