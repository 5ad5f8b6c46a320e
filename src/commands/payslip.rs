use anyhow::anyhow;
use libledgerfeed::payslip::{append_transaction, pdftotext};

use crate::cli::PayslipArgs;
use crate::error::CliError;

pub fn run(args: &PayslipArgs) -> Result<(), CliError> {
    let text = pdftotext(&args.pdf_file)?;
    if text.trim().is_empty() {
        return Err(anyhow!("Failed to read text content from PDF file.").into());
    }

    let transaction = args.payslip.payslip(&args.currency).transaction(&text)?;
    append_transaction(&args.beancount_file, &transaction)?;
    println!("Saved transaction to {}", args.beancount_file.display());
    Ok(())
}
