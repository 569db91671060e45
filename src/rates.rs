use jiff::ToSpan;
use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::api::{RateEntry, RateSource};
use crate::error::FetchError;

/// Rates for every requested currency on one day
#[derive(Debug, PartialEq)]
pub struct DayRates {
    pub date: Date,
    /// In request order, one entry per distinct currency code
    pub currencies: Vec<CurrencyRates>,
}

#[derive(Debug, PartialEq)]
pub struct CurrencyRates {
    pub currency: String,
    pub sale: Option<Decimal>,
    pub purchase: Option<Decimal>,
}

/// Retrieve rates for `days` consecutive days ending with `today`, newest first.
///
/// Requests are issued one after another. Days that fail or carry no rate list are logged and
/// left out, so the result may hold fewer than `days` entries.
pub fn collect_rates(
    source: &impl RateSource,
    today: Date,
    days: u8,
    currencies: &[String],
) -> Vec<DayRates> {
    let mut collected = Vec::with_capacity(usize::from(days));

    for i in 0..days {
        let date = today - i64::from(i).days();
        match source.fetch(date) {
            Ok(response) => match response.exchange_rate {
                Some(entries) => collected.push(DayRates {
                    date,
                    currencies: extract_rates(&entries, currencies),
                }),
                None => log::warn!("No data available for {}", crate::format_date(date)),
            },
            Err(FetchError::Status(status)) => {
                log::warn!(
                    "No data available for {} (HTTP {status})",
                    crate::format_date(date)
                )
            }
            Err(e) => log::warn!("Error fetching data for {}: {e}", crate::format_date(date)),
        }
    }

    collected
}

/// Pick the sale and purchase rates of each requested currency out of one day's list
fn extract_rates(entries: &[RateEntry], currencies: &[String]) -> Vec<CurrencyRates> {
    let mut rates: Vec<CurrencyRates> = Vec::with_capacity(currencies.len());

    for currency in currencies {
        if rates.iter().any(|r| &r.currency == currency) {
            continue;
        }

        // First match wins
        let entry = entries
            .iter()
            .find(|e| e.currency.as_deref() == Some(currency.as_str()));
        rates.push(CurrencyRates {
            currency: currency.clone(),
            sale: entry.and_then(|e| e.sale_rate),
            purchase: entry.and_then(|e| e.purchase_rate),
        });
    }

    rates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ExchangeRates;
    use jiff::civil::date;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::str::FromStr;

    /// Serves canned replies and remembers which dates were asked for.
    #[derive(Default)]
    struct StubSource {
        statuses: HashMap<Date, u16>,
        empty: Vec<Date>,
        requested: RefCell<Vec<Date>>,
    }

    impl RateSource for StubSource {
        fn fetch(&self, date: Date) -> Result<ExchangeRates, FetchError> {
            self.requested.borrow_mut().push(date);
            if let Some(&status) = self.statuses.get(&date) {
                return Err(FetchError::Status(status));
            }
            if self.empty.contains(&date) {
                return Ok(ExchangeRates::default());
            }
            Ok(ExchangeRates {
                exchange_rate: Some(sample_entries()),
                ..Default::default()
            })
        }
    }

    fn entry(currency: Option<&str>, sale: Option<&str>, purchase: Option<&str>) -> RateEntry {
        RateEntry {
            base_currency: Some("UAH".to_string()),
            currency: currency.map(str::to_string),
            sale_rate: sale.map(dec),
            purchase_rate: purchase.map(dec),
            ..Default::default()
        }
    }

    fn sample_entries() -> Vec<RateEntry> {
        vec![
            entry(None, None, None),
            entry(Some("EUR"), Some("45.1"), Some("44.4")),
            entry(Some("USD"), Some("41.7"), Some("41.1")),
            entry(Some("PLN"), None, None),
            entry(Some("USD"), Some("99"), Some("99")),
        ]
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn codes(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_zero_days() {
        let source = StubSource::default();
        let rates = collect_rates(&source, date(2026, 10, 18), 0, &codes(&["EUR", "USD"]));
        assert!(rates.is_empty());
        assert!(source.requested.borrow().is_empty());
    }

    #[test]
    fn test_consecutive_days_newest_first() {
        let source = StubSource::default();
        let rates = collect_rates(&source, date(2026, 3, 2), 4, &codes(&["EUR", "USD"]));

        let expected = vec![
            date(2026, 3, 2),
            date(2026, 3, 1),
            date(2026, 2, 28),
            date(2026, 2, 27),
        ];
        assert_eq!(rates.iter().map(|r| r.date).collect::<Vec<_>>(), expected);
        assert_eq!(*source.requested.borrow(), expected);
    }

    #[test]
    fn test_max_days() {
        let source = StubSource::default();
        let rates = collect_rates(&source, date(2026, 1, 5), 10, &codes(&["EUR"]));
        assert_eq!(rates.len(), 10);
        assert_eq!(rates.first().unwrap().date, date(2026, 1, 5));
        assert_eq!(rates.last().unwrap().date, date(2025, 12, 27));
    }

    #[test]
    fn test_extracted_values() {
        let source = StubSource::default();
        let rates = collect_rates(&source, date(2026, 10, 18), 1, &codes(&["USD", "EUR"]));

        assert_eq!(
            rates,
            vec![DayRates {
                date: date(2026, 10, 18),
                currencies: vec![
                    CurrencyRates {
                        currency: "USD".to_string(),
                        sale: Some(dec("41.7")),
                        purchase: Some(dec("41.1")),
                    },
                    CurrencyRates {
                        currency: "EUR".to_string(),
                        sale: Some(dec("45.1")),
                        purchase: Some(dec("44.4")),
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_missing_currency_is_null() {
        let source = StubSource::default();
        let rates = collect_rates(&source, date(2026, 10, 18), 1, &codes(&["XYZ", "PLN"]));

        assert_eq!(
            rates[0].currencies,
            vec![
                CurrencyRates {
                    currency: "XYZ".to_string(),
                    sale: None,
                    purchase: None,
                },
                // Listed, but without commercial rates
                CurrencyRates {
                    currency: "PLN".to_string(),
                    sale: None,
                    purchase: None,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_request_keeps_first_position() {
        let source = StubSource::default();
        let rates = collect_rates(
            &source,
            date(2026, 10, 18),
            1,
            &codes(&["EUR", "USD", "EUR"]),
        );
        let currencies: Vec<&str> = rates[0]
            .currencies
            .iter()
            .map(|c| c.currency.as_str())
            .collect();
        assert_eq!(currencies, vec!["EUR", "USD"]);
    }

    #[test]
    fn test_failed_day_is_skipped() {
        let source = StubSource {
            statuses: HashMap::from([(date(2026, 10, 17), 404)]),
            ..Default::default()
        };
        let rates = collect_rates(&source, date(2026, 10, 18), 4, &codes(&["EUR"]));

        assert_eq!(
            rates.iter().map(|r| r.date).collect::<Vec<_>>(),
            vec![date(2026, 10, 18), date(2026, 10, 16), date(2026, 10, 15)]
        );
        // The loop keeps going after a failure
        assert_eq!(source.requested.borrow().len(), 4);
    }

    #[test]
    fn test_day_without_rate_list_is_skipped() {
        let source = StubSource {
            empty: vec![date(2026, 10, 18)],
            ..Default::default()
        };
        let rates = collect_rates(&source, date(2026, 10, 18), 2, &codes(&["EUR"]));
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].date, date(2026, 10, 17));
    }

    #[test]
    fn test_case_sensitive_match() {
        let source = StubSource::default();
        let rates = collect_rates(&source, date(2026, 10, 18), 1, &codes(&["eur"]));
        assert_eq!(rates[0].currencies[0].sale, None);
    }
}
