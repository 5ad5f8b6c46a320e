use chrono::Local;
use libledgerfeed::fetch::{FinancialTimes, LondonStockExchange, SeriesProvider};
use libledgerfeed::{PriceLedger, Reconciliation};

use crate::cli::{PricesArgs, Provider};
use crate::error::CliError;

fn provider(args: &PricesArgs) -> Box<dyn SeriesProvider> {
    match args.provider {
        Provider::Lse => Box::new(LondonStockExchange::new(&args.key)),
        Provider::Ft => Box::new(FinancialTimes::new(
            args.label.as_deref().unwrap_or(&args.commodity),
            &args.key,
        )),
    }
}

/// Announced only for a ledger that already existed.
fn read_message(existed: bool, recorded: usize) -> Option<String> {
    existed.then(|| format!("Read {} recorded price(s).", recorded))
}

fn outcome_message(provider: Provider, outcome: &Reconciliation) -> String {
    match outcome.new_prices() {
        Some(prices) => format!("Wrote {} new price(s).", prices.len()),
        None => format!(
            "{} returned no unrecorded prices. Try again later.",
            provider.display_name()
        ),
    }
}

pub fn run(args: &PricesArgs) -> Result<(), CliError> {
    let existed = args.file.is_file();
    let mut ledger = PriceLedger::open(&args.file, &args.commodity, &args.currency)?;
    if let Some(message) = read_message(existed, ledger.recorded().len()) {
        println!("{message}");
    }

    let fetcher = super::fetcher(args.timeout_ms)?;
    let provider = provider(args);
    let outcome = ledger.update(&fetcher, provider.as_ref(), Local)?;

    println!("{}", outcome_message(args.provider, &outcome));
    Ok(())
}
