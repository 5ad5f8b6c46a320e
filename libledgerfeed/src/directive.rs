use crate::parser::Rule;
use chrono::NaiveDate;
use pest::iterators::Pair;

use std::convert::TryFrom;

/// A price directive as it appears in the ledger, borrowing from the line.
#[derive(Debug, PartialEq)]
pub struct ParsedPrice<'s> {
    pub(crate) date: NaiveDate,
    pub(crate) commodity: &'s str,
    pub(crate) nominal: &'s str,
    pub(crate) currency: &'s str,
}

macro_rules! next_str {
    ($pairs:ident, $expected:literal) => {
        $pairs
            .next()
            .ok_or(anyhow::Error::msg(concat!(
                "invalid next token, expected ",
                $expected
            )))?
            .as_str()
    };
}

impl<'s> TryFrom<Pair<'s, Rule>> for ParsedPrice<'s> {
    type Error = anyhow::Error;

    fn try_from(pair: Pair<'s, Rule>) -> Result<Self, Self::Error> {
        if pair.as_rule() != Rule::price_directive {
            return Err(anyhow::Error::msg(format!(
                "unexpected token for price: '{}'",
                pair.as_str()
            )));
        }

        let mut pairs = pair.into_inner();
        let date = NaiveDate::parse_from_str(next_str!(pairs, "date"), "%Y-%m-%d")?;

        Ok(ParsedPrice {
            date,
            commodity: next_str!(pairs, "commodity"),
            nominal: next_str!(pairs, "number"),
            currency: next_str!(pairs, "currency"),
        })
    }
}

impl<'s> ParsedPrice<'s> {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn commodity(&self) -> &'s str {
        self.commodity
    }

    pub fn nominal(&self) -> &'s str {
        self.nominal
    }

    pub fn currency(&self) -> &'s str {
        self.currency
    }

    /// Whether this directive prices `commodity` in `currency`.
    pub fn is_for(&self, commodity: &str, currency: &str) -> bool {
        self.commodity == commodity && self.currency == currency
    }
}

#[cfg(test)]
mod tests {
    use crate::directive::ParsedPrice;
    use crate::parser::{LedgerParser, Rule};
    use chrono::NaiveDate;
    use pest::Parser;

    use anyhow::{anyhow, Result};

    use std::convert::TryFrom;

    #[test]
    fn parse_price_directive() -> Result<()> {
        let mut ast = LedgerParser::parse(Rule::price_directive, "2017-11-22 price LLOY 0.652 GBP")?;
        let price = ParsedPrice::try_from(ast.next().ok_or(anyhow!("empty ast"))?)?;
        assert_eq!(
            price,
            ParsedPrice {
                date: NaiveDate::from_ymd_opt(2017, 11, 22).ok_or(anyhow!("invalid date"))?,
                commodity: "LLOY",
                nominal: "0.652",
                currency: "GBP",
            }
        );
        assert!(price.is_for("LLOY", "GBP"));
        assert!(!price.is_for("LLOY", "USD"));
        assert!(!price.is_for("FTSE100", "GBP"));
        Ok(())
    }

    #[test]
    fn parse_wrong_token() -> Result<()> {
        let mut tokens = LedgerParser::parse(Rule::number, "12.5")?;
        let price = ParsedPrice::try_from(tokens.next().ok_or(anyhow!("empty ast"))?);
        assert_eq!(
            format!("{}", price.unwrap_err()),
            "unexpected token for price: '12.5'"
        );
        Ok(())
    }
}
