//! Command-line arguments, declared with clap's derive API.

use clap::{Args, Parser, Subcommand, ValueEnum};
use libledgerfeed::payslip::Payslip;
use std::path::PathBuf;

/// Keep plain text ledgers fed with market prices and payslips.
#[derive(Debug, Parser)]
#[command(name = "ledgerfeed", author, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Append historic commodity prices not yet recorded in a price file.
    Prices(PricesArgs),

    /// Parse a payslip in PDF format and append it as a new transaction.
    Payslip(PayslipArgs),

    /// Run the importers over files and print what they extract.
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    /// London Stock Exchange
    Lse,
    /// Financial Times
    Ft,
}

impl Provider {
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Lse => "Stock Exchange",
            Provider::Ft => "Financial Times",
        }
    }
}

#[derive(Debug, Args)]
pub struct PricesArgs {
    /// The commodity key, e.g. "UKX.FTD" for FTSE100 (the FT symbol with --provider ft)
    pub key: String,

    /// The commodity name, e.g. FTSE100
    pub commodity: String,

    /// The currency of the price
    #[arg(short, long, default_value = "GBP", env = "LEDGERFEED_CURRENCY")]
    pub currency: String,

    /// Where to fetch the prices from
    #[arg(short, long, value_enum, default_value_t = Provider::Lse)]
    pub provider: Provider,

    /// Chart label sent to the FT, defaults to the commodity name
    #[arg(long)]
    pub label: Option<String>,

    /// Give up on the provider after this many milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// The beancount price file, e.g. FTSE100.beancount
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct PayslipOpts {
    /// The asset to which the net pay is allocated
    #[arg(short, long, default_value = "Bank")]
    pub asset: String,

    /// The name of the employer
    #[arg(short, long, default_value = "Work")]
    pub employer: String,

    /// Include Student Loan repayment information
    #[arg(short, long)]
    pub student_loan: bool,
}

impl PayslipOpts {
    pub fn payslip(&self, currency: &str) -> Payslip {
        Payslip {
            employer: self.employer.clone(),
            asset: self.asset.clone(),
            currency: currency.to_string(),
            student_loan: self.student_loan,
        }
    }
}

#[derive(Debug, Args)]
pub struct PayslipArgs {
    /// The input PDF file to parse, e.g. payslip.pdf
    pub pdf_file: PathBuf,

    /// The beancount file to write to, e.g. ledger.beancount
    pub beancount_file: PathBuf,

    /// The currency to use
    #[arg(short, long, default_value = "GBP", env = "LEDGERFEED_CURRENCY")]
    pub currency: String,

    #[command(flatten)]
    pub payslip: PayslipOpts,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Files to import: `<commodity>.price` files and payslip PDFs
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// The currency of prices and payslips
    #[arg(short, long, default_value = "GBP", env = "LEDGERFEED_CURRENCY")]
    pub currency: String,

    /// Which provider `.price` files refer to
    #[arg(short, long, value_enum, default_value_t = Provider::Lse)]
    pub provider: Provider,

    #[command(flatten)]
    pub payslip: PayslipOpts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn prices_positionals_and_defaults() {
        let cli = Cli::try_parse_from(["ledgerfeed", "prices", "UKX.FTD", "FTSE100", "FTSE100.beancount"])
            .expect("valid arguments");
        let Command::Prices(args) = cli.command else {
            panic!("expected prices command");
        };
        assert_eq!(args.key, "UKX.FTD");
        assert_eq!(args.commodity, "FTSE100");
        assert_eq!(args.file, PathBuf::from("FTSE100.beancount"));
        assert_eq!(args.provider, Provider::Lse);
        assert_eq!(args.timeout_ms, None);
    }

    #[test]
    fn prices_currency_option() {
        let cli = Cli::try_parse_from([
            "ledgerfeed", "prices", "-c", "USD", "--provider", "ft", "GB00B3X7QG63:GBP", "VANGUARD", "VANGUARD.beancount",
        ])
        .expect("valid arguments");
        let Command::Prices(args) = cli.command else {
            panic!("expected prices command");
        };
        assert_eq!(args.currency, "USD");
        assert_eq!(args.provider, Provider::Ft);
    }

    #[test]
    fn payslip_flags() {
        let cli = Cli::try_parse_from([
            "ledgerfeed", "payslip", "october.pdf", "ledger.beancount", "-e", "Google", "-a", "NatWest:Current", "-s",
        ])
        .expect("valid arguments");
        let Command::Payslip(args) = cli.command else {
            panic!("expected payslip command");
        };
        let payslip = args.payslip.payslip(&args.currency);
        assert_eq!(payslip.employer, "Google");
        assert_eq!(payslip.asset, "NatWest:Current");
        assert!(payslip.student_loan);
    }

    #[test]
    fn prices_requires_a_file() {
        assert!(Cli::try_parse_from(["ledgerfeed", "prices", "UKX.FTD", "FTSE100"]).is_err());
    }
}
