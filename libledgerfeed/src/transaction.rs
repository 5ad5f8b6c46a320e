use crate::account::Account;
use chrono::NaiveDate;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionState {
    Settled,   // '*'
    Unsettled, // '!'
}

impl TransactionState {
    pub fn flag(&self) -> char {
        match self {
            TransactionState::Settled => '*',
            TransactionState::Unsettled => '!',
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Amount {
    pub nominal: String,
    pub currency: String,
}

/// One leg of a transaction, at most one leg may elide its amount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Posting {
    pub account: Account,
    pub amount: Option<Amount>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub state: TransactionState,
    pub payee: Option<String>,
    pub title: String,
    pub postings: Vec<Posting>,
}

impl Transaction {
    /// Header line followed by one indented line per posting.
    pub fn lines(&self) -> Vec<String> {
        let mut header = format!("{} {}", self.date.format("%Y-%m-%d"), self.state.flag());
        if let Some(payee) = &self.payee {
            header.push_str(&format!(" \"{}\"", payee));
        }
        header.push_str(&format!(" \"{}\"", self.title));

        let mut lines = vec![header];
        for posting in &self.postings {
            lines.push(match &posting.amount {
                Some(amount) => format!(
                    "  {} {} {}",
                    posting.account, amount.nominal, amount.currency
                ),
                None => format!("  {}", posting.account),
            });
        }
        lines
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lines().join("\n"))
    }
}
