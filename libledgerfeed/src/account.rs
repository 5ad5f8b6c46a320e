use std::fmt;
use std::str::FromStr;

/// A ledger account such as `Assets:Bank:Jawir`, one variant per root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Account {
    Assets(Vec<String>),
    Expenses(Vec<String>),
    Liabilities(Vec<String>),
    Income(Vec<String>),
    Equity(Vec<String>),
}

impl Account {
    fn base_name(s: &str) -> anyhow::Result<Vec<String>> {
        let segments: Vec<String> = s.split(':').skip(1).map(str::to_string).collect();
        if segments.is_empty() || segments.iter().any(|segment| segment.is_empty()) {
            return Err(anyhow::Error::msg(format!(
                "input `{}' has an empty account segment",
                s
            )));
        }
        Ok(segments)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Assets(v) => write!(f, "Assets:{}", v.join(":")),
            Account::Expenses(v) => write!(f, "Expenses:{}", v.join(":")),
            Account::Liabilities(v) => write!(f, "Liabilities:{}", v.join(":")),
            Account::Income(v) => write!(f, "Income:{}", v.join(":")),
            Account::Equity(v) => write!(f, "Equity:{}", v.join(":")),
        }
    }
}

impl FromStr for Account {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("Assets:") {
            return Ok(Account::Assets(Account::base_name(s)?));
        }

        if s.starts_with("Expenses:") {
            return Ok(Account::Expenses(Account::base_name(s)?));
        }

        if s.starts_with("Liabilities:") {
            return Ok(Account::Liabilities(Account::base_name(s)?));
        }

        if s.starts_with("Income:") {
            return Ok(Account::Income(Account::base_name(s)?));
        }

        if s.starts_with("Equity:") {
            return Ok(Account::Equity(Account::base_name(s)?));
        }

        Err(anyhow::Error::msg(format!(
            "input `{}' is not a valid token for Account",
            s
        )))
    }
}
