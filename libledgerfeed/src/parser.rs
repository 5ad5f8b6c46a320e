use crate::directive::ParsedPrice;
use anyhow::{anyhow, Result};
use pest::Parser;

#[derive(Parser)]
#[grammar = "ledger.pest"]
pub struct LedgerParser;

/// Parse a single ledger line as a price directive.
///
/// Only the leading tokens have to form a directive, anything following the
/// currency is ignored. Lines holding any other directive fail to parse.
pub fn parse_price_line(line: &str) -> Result<ParsedPrice<'_>> {
    let mut pairs = LedgerParser::parse(Rule::price_line, line)?;
    let directive = pairs
        .next()
        .ok_or(anyhow!(format!("not a price directive: '{}'", line)))?;
    ParsedPrice::try_from(directive)
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_price_line;
    use chrono::NaiveDate;

    use anyhow::{anyhow, Result};

    #[test]
    fn parse_plain_directive() -> Result<()> {
        let price = parse_price_line("2020-01-01 price FTSE100 1.234 GBP")?;
        assert_eq!(
            price.date(),
            NaiveDate::from_ymd_opt(2020, 1, 1).ok_or(anyhow!("invalid date"))?
        );
        assert_eq!(price.commodity(), "FTSE100");
        assert_eq!(price.nominal(), "1.234");
        assert_eq!(price.currency(), "GBP");
        Ok(())
    }

    #[test]
    fn parse_with_tabs_and_trailing_comment() -> Result<()> {
        let price = parse_price_line("  2019-07-31\tprice  VWRL\t72.040 GBP ; close")?;
        assert_eq!(price.commodity(), "VWRL");
        assert_eq!(price.nominal(), "72.040");
        assert_eq!(price.currency(), "GBP");
        Ok(())
    }

    #[test]
    fn parse_directive_behind_a_prefix() -> Result<()> {
        let price = parse_price_line("; 2020-01-01 price FTSE100 1.234 GBP")?;
        assert_eq!(price.commodity(), "FTSE100");
        assert_eq!(price.nominal(), "1.234");

        let price = parse_price_line("x2016-01-01 price FTSE100 6.000 GBP")?;
        assert_eq!(
            price.date(),
            NaiveDate::from_ymd_opt(2016, 1, 1).ok_or(anyhow!("invalid date"))?
        );
        Ok(())
    }

    #[test]
    fn parse_integer_and_bare_fraction() -> Result<()> {
        assert_eq!(parse_price_line("2020-01-01 price X 100 USD")?.nominal(), "100");
        assert_eq!(parse_price_line("2020-01-01 price X .5 USD")?.nominal(), ".5");
        Ok(())
    }

    #[test]
    fn reject_other_directives() {
        assert!(parse_price_line("2021-02-02 open Assets:Bank:Jago").is_err());
        assert!(parse_price_line(r#"2021-01-01 custom "author" "udhin""#).is_err());
        assert!(parse_price_line("").is_err());
    }

    #[test]
    fn reject_glued_or_signed_numbers() {
        assert!(parse_price_line("2020-01-01 price FTSE100 1.234GBP").is_err());
        assert!(parse_price_line("2020-01-01 price FTSE100 -1.234 GBP").is_err());
        assert!(parse_price_line("2020-01-01 price FTSE100 GBP").is_err());
    }

    #[test]
    fn reject_impossible_dates() {
        assert!(parse_price_line("2020-13-45 price FTSE100 1.234 GBP").is_err());
        assert!(parse_price_line("2021-02-29 price FTSE100 1.234 GBP").is_err());
    }
}
