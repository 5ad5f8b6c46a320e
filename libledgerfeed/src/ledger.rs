use crate::error::{FormatError, LedgerFeedError, ReadError, WriteError};
use crate::fetch::{Fetcher, HttpClient, SeriesProvider};
use crate::normalize::{Normalizer, RawSample};
use crate::price::PriceBook;
use crate::reader::read_prices;
use crate::reconcile::{reconcile, Reconciliation};
use crate::writer::append_prices;

use chrono::TimeZone;
use std::path::{Path, PathBuf};
use tracing::info;

/// The prices of one commodity/currency pair recorded in a ledger file.
///
/// The file is the only state shared between runs. Nothing guards it against
/// a concurrent writer, callers have to run one update at a time.
#[derive(Clone, Debug)]
pub struct PriceLedger {
    path: PathBuf,
    commodity: String,
    currency: String,
    recorded: PriceBook,
}

impl PriceLedger {
    pub fn open(path: &Path, commodity: &str, currency: &str) -> Result<PriceLedger, ReadError> {
        Ok(PriceLedger {
            path: path.to_path_buf(),
            commodity: commodity.to_string(),
            currency: currency.to_string(),
            recorded: read_prices(path, commodity, currency)?,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn commodity(&self) -> &str {
        &self.commodity
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn recorded(&self) -> &PriceBook {
        &self.recorded
    }

    pub fn reconcile<Tz: TimeZone>(
        &self,
        normalizer: &Normalizer<Tz>,
        series: &[RawSample],
    ) -> Result<Reconciliation, FormatError> {
        reconcile(normalizer, series, &self.recorded)
    }

    /// Append prices to the file and count them as recorded.
    pub fn append(&mut self, prices: &PriceBook) -> Result<usize, WriteError> {
        let written = append_prices(&self.path, prices, &self.commodity, &self.currency)?;
        self.recorded
            .extend(prices.iter().map(|(date, price)| (*date, price.to_string())));
        Ok(written)
    }

    /// Fetch, reconcile and append whatever is new.
    ///
    /// The file is only opened for writing once the series has been fetched
    /// and normalized, so a failure before that leaves it untouched.
    pub fn update<C, P, Tz>(
        &mut self,
        fetcher: &Fetcher<C>,
        provider: &P,
        tz: Tz,
    ) -> Result<Reconciliation, LedgerFeedError>
    where
        C: HttpClient,
        P: SeriesProvider + ?Sized,
        Tz: TimeZone,
    {
        let series = fetcher.fetch(provider)?;
        let normalizer = Normalizer::with_timezone(tz, provider.scale());
        let outcome = self.reconcile(&normalizer, &series)?;

        match outcome.new_prices() {
            Some(prices) => {
                let written = self.append(prices)?;
                info!(
                    path = %self.path.display(),
                    commodity = %self.commodity,
                    written,
                    "recorded new prices"
                );
            }
            None => info!(
                path = %self.path.display(),
                commodity = %self.commodity,
                "no unrecorded prices"
            ),
        }

        Ok(outcome)
    }
}
