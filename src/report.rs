use std::io::{self, Write};

use rust_decimal::Decimal;

use crate::format_date;
use crate::rates::DayRates;

/// Stand-in for a rate the archive did not report
const MISSING: &str = "n/a";

/// Print the collected rates to stdout
pub fn print_rates(rates: &[DayRates]) -> io::Result<()> {
    let stdout = io::stdout();
    write_rates(&mut stdout.lock(), rates)
}

/// Render one block per day: the date, then each currency with its sale and purchase rate.
pub fn write_rates(out: &mut impl Write, rates: &[DayRates]) -> io::Result<()> {
    for day in rates {
        writeln!(out, "{}:", format_date(day.date))?;
        for rate in &day.currencies {
            writeln!(out, "  {}:", rate.currency)?;
            writeln!(out, "    Sale: {}", or_missing(rate.sale))?;
            writeln!(out, "    Purchase: {}", or_missing(rate.purchase))?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Whole numbers keep one decimal place, so `20.0` on the wire prints as `20.0`
fn or_missing(value: Option<Decimal>) -> String {
    match value {
        None => MISSING.to_string(),
        Some(v) if v.scale() == 0 => format!("{v:.1}"),
        Some(v) => v.to_string(),
    }
}
