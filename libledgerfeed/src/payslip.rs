use crate::account::Account;
use crate::error::WriteError;
use crate::transaction::{Amount, Posting, Transaction, TransactionState};
use crate::writer::open_append;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Text every payslip carries, used to recognise one.
pub const GROSS_PAY_MARKER: &str = "Total Gross Pay";

/// Matches `<label>` followed by spaces and a number, captured as `field`.
pub fn field_pattern(label: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"{}[ ]+(?P<field>-?\d*\.?\d+)", regex::escape(label)))
}

/// The named group of the first match, or an empty string.
pub fn find_field(pattern: &Regex, group: &str, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|captures| captures.name(group))
        .map(|field| field.as_str().to_string())
        .unwrap_or_default()
}

/// First `d/m/Y` date in the text, falling back to `Y/m/d`.
pub fn find_date(text: &str) -> Result<NaiveDate> {
    let pattern = Regex::new(r"(?P<date>\d+/\d+/\d+)")?;
    let raw = find_field(&pattern, "date", text);
    if raw.is_empty() {
        return Err(anyhow!("no date found in payslip"));
    }

    NaiveDate::parse_from_str(&raw, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(&raw, "%Y/%m/%d"))
        .with_context(|| format!("invalid payslip date `{}'", raw))
}

/// How a payslip is booked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payslip {
    pub employer: String,
    pub asset: String,
    pub currency: String,
    pub student_loan: bool,
}

impl Default for Payslip {
    fn default() -> Self {
        Self {
            employer: String::from("Work"),
            asset: String::from("Bank"),
            currency: String::from("GBP"),
            student_loan: false,
        }
    }
}

impl Payslip {
    fn amount(&self, label: &str, text: &str) -> Result<Amount> {
        let nominal = find_field(&field_pattern(label)?, "field", text);
        if nominal.is_empty() {
            return Err(anyhow!("field `{}' not found in payslip", label));
        }
        Ok(Amount {
            nominal,
            currency: self.currency.clone(),
        })
    }

    fn posting(&self, account: &str, label: &str, text: &str) -> Result<Posting> {
        Ok(Posting {
            account: account.parse()?,
            amount: Some(self.amount(label, text)?),
        })
    }

    /// Build the salary transaction out of payslip text.
    pub fn transaction(&self, text: &str) -> Result<Transaction> {
        let mut postings = vec![
            self.posting("Expenses:Tax:Income", "PAYE Tax", text)?,
            self.posting("Expenses:Tax:NationalInsurance", "National Insurance", text)?,
        ];

        if self.student_loan {
            postings.push(self.posting("Liabilities:StudentFinance", "Student Loan", text)?);
        }

        postings.push(self.posting(&format!("Assets:{}", self.asset), "Net Pay", text)?);
        postings.push(Posting {
            account: format!("Income:{}:Salary", self.employer).parse::<Account>()?,
            amount: None,
        });

        Ok(Transaction {
            date: find_date(text)?,
            state: TransactionState::Settled,
            payee: None,
            title: self.employer.clone(),
            postings,
        })
    }
}

/// Append a transaction as its own block, preceded by a blank line.
pub fn append_transaction(path: &Path, transaction: &Transaction) -> Result<(), WriteError> {
    let mut out = open_append(path)?;
    write!(out, "\n{}\n", transaction).map_err(|source| WriteError {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "appended transaction");
    Ok(())
}

/// Text layer of a PDF, through the external `pdftotext` tool.
pub fn pdftotext(path: &Path) -> Result<String> {
    let output = Command::new("pdftotext")
        .arg("-layout")
        .arg(path)
        .arg("-")
        .output()
        .context("error running pdftotext")?;

    if !output.status.success() || !output.stderr.is_empty() {
        return Err(anyhow!(
            "error running pdftotext: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8(output.stdout)?)
}

#[cfg(test)]
mod tests {
    use crate::payslip::{append_transaction, field_pattern, find_date, find_field, Payslip};
    use chrono::NaiveDate;
    use regex::Regex;
    use tempfile::tempdir;

    use anyhow::{anyhow, Result};
    use std::fs;

    const PAYSLIP: &str = r#"
        Date                    05/10/2017
        Total Gross Pay         31508.68
        PAYE Tax                5050.10
        National Insurance      7891.30
        Student Loan            1033.41
        Net Pay                 18533.87
    "#;

    fn google() -> Payslip {
        Payslip {
            employer: "Google".to_string(),
            asset: "NatWest:Current".to_string(),
            currency: "GBP".to_string(),
            student_loan: true,
        }
    }

    #[test]
    fn pattern_for_field() -> Result<()> {
        let pattern = field_pattern("example")?;
        assert_eq!(find_field(&pattern, "field", "example       5145.05"), "5145.05");
        assert_eq!(find_field(&pattern, "field", "example -12"), "-12");
        Ok(())
    }

    #[test]
    fn pattern_for_mismatch() -> Result<()> {
        let pattern = field_pattern("my pattern")?;
        assert!(pattern.captures("this is wrong").is_none());
        Ok(())
    }

    #[test]
    fn pattern_escapes_label() -> Result<()> {
        let pattern = field_pattern("Tax (PAYE)")?;
        assert_eq!(find_field(&pattern, "field", "Tax (PAYE)  10.00"), "10.00");
        Ok(())
    }

    #[test]
    fn find_group() -> Result<()> {
        let pattern = Regex::new(r"(?P<mynumber>\d+)")?;
        assert_eq!(find_field(&pattern, "mynumber", "505"), "505");
        Ok(())
    }

    #[test]
    fn find_mismatch() -> Result<()> {
        let pattern = Regex::new(r"(?P<maybeanumber>\d+)")?;
        assert_eq!(find_field(&pattern, "maybeanumber", "not a number"), "");
        Ok(())
    }

    #[test]
    fn find_both_date_orders() -> Result<()> {
        let expected = NaiveDate::from_ymd_opt(2017, 10, 5).ok_or(anyhow!("invalid date"))?;
        assert_eq!(find_date("Date 05/10/2017")?, expected);
        assert_eq!(find_date("Date 2017/10/05")?, expected);
        assert!(find_date("no date here").is_err());
        assert!(find_date("Date 45/45/2017").is_err());
        Ok(())
    }

    #[test]
    fn build_transaction() -> Result<()> {
        let transaction = google().transaction(PAYSLIP)?;
        assert_eq!(
            transaction.lines(),
            vec![
                "2017-10-05 * \"Google\"",
                "  Expenses:Tax:Income 5050.10 GBP",
                "  Expenses:Tax:NationalInsurance 7891.30 GBP",
                "  Liabilities:StudentFinance 1033.41 GBP",
                "  Assets:NatWest:Current 18533.87 GBP",
                "  Income:Google:Salary",
            ]
        );
        Ok(())
    }

    #[test]
    fn build_transaction_without_student_loan() -> Result<()> {
        let payslip = Payslip {
            student_loan: false,
            ..google()
        };
        let lines = payslip.transaction(PAYSLIP)?.lines();
        assert_eq!(lines.len(), 5);
        assert!(!lines.iter().any(|line| line.contains("StudentFinance")));
        Ok(())
    }

    #[test]
    fn build_transaction_missing_field() {
        let err = google()
            .transaction("Date 05/10/2017\nPAYE Tax 1.00\n")
            .unwrap_err();
        assert_eq!(
            format!("{}", err),
            "field `National Insurance' not found in payslip"
        );
    }

    #[test]
    fn append_transaction_block() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ledger.beancount");
        fs::write(&path, "2017-01-01 open Assets:NatWest:Current\n")?;

        append_transaction(&path, &google().transaction(PAYSLIP)?)?;

        let content = fs::read_to_string(&path)?;
        assert!(content.starts_with("2017-01-01 open Assets:NatWest:Current\n\n2017-10-05 * \"Google\"\n"));
        assert!(content.ends_with("  Income:Google:Salary\n"));
        Ok(())
    }

    #[test]
    fn append_transaction_after_unterminated_last_line() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ledger.beancount");
        fs::write(&path, "2017-01-01 open Assets:NatWest:Current")?;

        append_transaction(&path, &google().transaction(PAYSLIP)?)?;

        let content = fs::read_to_string(&path)?;
        assert!(content.starts_with("2017-01-01 open Assets:NatWest:Current\n\n2017-10-05 * \"Google\"\n"));
        Ok(())
    }
}
