use crate::error::ReadError;
use crate::parser::parse_price_line;
use crate::price::PriceBook;

use std::fs;
use std::path::Path;
use tracing::debug;

/// Collect the recorded prices of `commodity` in `currency` from ledger text.
///
/// Every line that is not such a price directive is skipped. A date seen twice
/// keeps the price of its last line.
pub fn scan_prices(text: &str, commodity: &str, currency: &str) -> PriceBook {
    let mut recorded = PriceBook::new();

    for line in text.lines() {
        if let Ok(price) = parse_price_line(line) {
            if price.is_for(commodity, currency) {
                recorded.insert(price.date(), price.nominal());
            }
        }
    }

    recorded
}

/// Read the recorded prices from a ledger file.
///
/// A path that is not a file means nothing has been recorded yet.
pub fn read_prices(path: &Path, commodity: &str, currency: &str) -> Result<PriceBook, ReadError> {
    if !path.is_file() {
        debug!(path = %path.display(), "no ledger yet, nothing recorded");
        return Ok(PriceBook::new());
    }

    let content = fs::read_to_string(path).map_err(|source| ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let recorded = scan_prices(&content, commodity, currency);
    debug!(
        path = %path.display(),
        commodity,
        currency,
        count = recorded.len(),
        "read recorded prices"
    );

    Ok(recorded)
}

#[cfg(test)]
mod tests {
    use crate::reader::{read_prices, scan_prices};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use anyhow::{anyhow, Result};
    use std::fs;

    fn date(s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| anyhow!(e))
    }

    const LEDGER: &str = r#"option "title" "Savings"

2015-01-01 open Assets:Broker:FTSE100 FTSE100
2015-01-01 price FTSE100 5.105 GBP
2015-01-01 price FTSE250 17.200 GBP
2015-01-02 price FTSE100 5.210 USD
2015-01-02 * "Broker" "Monthly contribution"
  Assets:Broker:FTSE100   10 FTSE100 @ 5.210 GBP
  Assets:Bank

2017-11-22 price FTSE100 2.022 GBP
garbage that is not a directive
2015-01-01 price FTSE100 5.500 GBP
"#;

    #[test]
    fn scan_only_matching_pair() -> Result<()> {
        let recorded = scan_prices(LEDGER, "FTSE100", "GBP");
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded.get(&date("2017-11-22")?), Some("2.022"));
        assert!(!recorded.contains_date(&date("2015-01-02")?));
        Ok(())
    }

    #[test]
    fn scan_last_line_wins() -> Result<()> {
        let recorded = scan_prices(LEDGER, "FTSE100", "GBP");
        assert_eq!(recorded.get(&date("2015-01-01")?), Some("5.500"));
        Ok(())
    }

    #[test]
    fn scan_keeps_recorded_text() -> Result<()> {
        let recorded = scan_prices("2010-12-25 price X 732.1 GBP\n", "X", "GBP");
        assert_eq!(recorded.get(&date("2010-12-25")?), Some("732.1"));
        Ok(())
    }

    #[test]
    fn scan_commented_out_price() -> Result<()> {
        let recorded = scan_prices(
            "; 2020-01-01 price FTSE100 1.234 GBP\n2020-01-02 price FTSE100 1.300 GBP\n",
            "FTSE100",
            "GBP",
        );
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded.get(&date("2020-01-01")?), Some("1.234"));
        Ok(())
    }

    #[test]
    fn scan_crlf_lines() -> Result<()> {
        let recorded = scan_prices("2020-01-01 price X 1.000 GBP\r\n2020-01-02 price X 2.000 GBP\r\n", "X", "GBP");
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded.get(&date("2020-01-02")?), Some("2.000"));
        Ok(())
    }

    #[test]
    fn scan_empty_text() {
        assert!(scan_prices("", "FTSE100", "GBP").is_empty());
    }

    #[test]
    fn read_missing_file_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let recorded = read_prices(&dir.path().join("FTSE100.beancount"), "FTSE100", "GBP")?;
        assert!(recorded.is_empty());
        Ok(())
    }

    #[test]
    fn read_directory_is_empty() -> Result<()> {
        let dir = tempdir()?;
        assert!(read_prices(dir.path(), "FTSE100", "GBP")?.is_empty());
        Ok(())
    }

    #[test]
    fn read_existing_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("FTSE100.beancount");
        fs::write(&path, LEDGER)?;
        let recorded = read_prices(&path, "FTSE100", "GBP")?;
        assert_eq!(recorded, scan_prices(LEDGER, "FTSE100", "GBP"));
        Ok(())
    }
}
