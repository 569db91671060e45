use std::error::Error as _;
use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use jiff::civil::Date;

use crate::error::DaysError;

pub mod api;
pub mod error;
pub mod rates;
pub mod report;

pub use api::{PrivatClient, RateSource};
pub use rates::{CurrencyRates, DayRates, collect_rates};
pub use report::{print_rates, write_rates};

/// Upper bound on how far back a single run may look
pub const MAX_DAYS: u8 = 10;

/// Currencies reported when none are requested
pub const DEFAULT_CURRENCIES: [&str; 2] = ["EUR", "USD"];

const DATE_FORMAT: &str = "%d.%m.%Y";

/// Get PrivatBank sale and purchase rates for the last few days.
///
/// Days are queried one at a time, starting with today. Days the archive has no data for are
/// skipped.
#[derive(Parser, Debug)]
#[command(version)]
pub struct Cli {
    /// Number of days to look back, today included (at most 10)
    #[arg(value_name = "DAYS", value_parser = parse_days)]
    pub days: u8,
    /// Currency codes to report (default: EUR USD)
    #[arg(value_name = "CURRENCY")]
    pub currencies: Vec<String>,

    /// Do not verify the server's TLS certificate
    #[clap(short = 'k', long)]
    pub insecure: bool,
}

impl Cli {
    /// Requested currencies, falling back to [`DEFAULT_CURRENCIES`]
    pub fn currencies(&self) -> Vec<String> {
        if self.currencies.is_empty() {
            DEFAULT_CURRENCIES.iter().map(|c| c.to_string()).collect()
        } else {
            self.currencies.clone()
        }
    }

    /// Parse `args`, making sure a rejected `DAYS` value is reported together with the usage line.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args).map_err(with_usage)
    }

    /// Client for this invocation's TLS settings
    pub fn client(&self) -> PrivatClient {
        match self.insecure {
            false => PrivatClient::new(),
            true => {
                log::warn!("TLS certificate verification is disabled");
                PrivatClient::new().insecure()
            }
        }
    }
}

fn with_usage(err: clap::Error) -> clap::Error {
    if err.kind() != ErrorKind::ValueValidation {
        return err;
    }
    match err.source().and_then(|e| e.downcast_ref::<DaysError>()) {
        Some(days_err) => clap::Error::raw(
            ErrorKind::ValueValidation,
            format!("{days_err}\n\n{}\n", Cli::command().render_usage()),
        ),
        None => err,
    }
}

/// Parse the `DAYS` argument. Only plain digits are accepted.
pub fn parse_days(arg: &str) -> Result<u8, DaysError> {
    if arg.is_empty() || !arg.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DaysError::NotANumber);
    }

    // All digits, so the only way parsing fails is overflow
    match arg.parse::<u64>() {
        Ok(days) if days <= u64::from(MAX_DAYS) => Ok(days as u8),
        _ => Err(DaysError::TooMany { max: MAX_DAYS }),
    }
}

/// Format a date the way the archive expects it (`dd.mm.yyyy`)
pub fn format_date(date: Date) -> String {
    date.strftime(DATE_FORMAT).to_string()
}
