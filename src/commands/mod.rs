mod extract;
mod payslip;
mod prices;

use libledgerfeed::fetch::{FetchConfig, Fetcher, ReqwestHttpClient};
use std::time::Duration;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Prices(args) => prices::run(args),
        Command::Payslip(args) => payslip::run(args),
        Command::Extract(args) => extract::run(args),
    }
}

fn fetcher(timeout_ms: Option<u64>) -> Result<Fetcher<ReqwestHttpClient>, CliError> {
    let config = FetchConfig {
        timeout: timeout_ms.map(Duration::from_millis),
        ..FetchConfig::default()
    };
    Ok(Fetcher::from_config(config)?)
}
