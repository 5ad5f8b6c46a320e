use crate::fetch::{FinancialTimes, Fetcher, HttpClient, LondonStockExchange, SeriesProvider};
use crate::normalize::Normalizer;
use crate::payslip::{pdftotext, Payslip, GROSS_PAY_MARKER};
use crate::price::PriceObservation;
use crate::reconcile::normalize_series;
use crate::transaction::Transaction;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::cell::OnceCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Anything an importer can hand back to the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    Price(PriceObservation),
    Transaction(Transaction),
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Price(price) => write!(f, "{}", price),
            Directive::Transaction(txn) => write!(f, "{}", txn),
        }
    }
}

/// An input file, with its text loaded at most once.
///
/// PDF text comes out of `pdftotext`, anything else is read as UTF-8.
pub struct SourceFile {
    path: PathBuf,
    text: OnceCell<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            text: OnceCell::new(),
        }
    }

    /// A file whose text is already known, e.g. converted elsewhere.
    pub fn with_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let file = Self::new(path);
        let _ = file.text.set(text.into());
        file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    pub fn is_pdf(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false)
    }

    pub fn text(&self) -> Result<&str> {
        if let Some(text) = self.text.get() {
            return Ok(text.as_str());
        }

        let text = if self.is_pdf() {
            pdftotext(&self.path)?
        } else {
            fs::read_to_string(&self.path)
                .with_context(|| format!("failed to read `{}'", self.path.display()))?
        };
        Ok(self.text.get_or_init(|| text).as_str())
    }
}

/// Recognises one kind of input and turns it into ledger directives.
pub trait Importer {
    fn name(&self) -> &'static str;

    fn matches(&self, file: &SourceFile) -> bool;

    fn extract(&self, file: &SourceFile) -> Result<Vec<Directive>>;
}

const PRICE_SUFFIX: &str = ".price";

fn is_price_file(file: &SourceFile) -> bool {
    file.file_name().ends_with(PRICE_SUFFIX) && file.file_name().len() > PRICE_SUFFIX.len()
}

/// `FTSE100.price` prices the commodity `FTSE100`.
fn commodity_of(file: &SourceFile) -> &str {
    file.file_name().trim_end_matches(PRICE_SUFFIX)
}

/// One price per date, the last sample of a date wins.
fn price_directives<P: SeriesProvider, C: HttpClient>(
    fetcher: &Fetcher<C>,
    provider: &P,
    commodity: &str,
    currency: &str,
) -> Result<Vec<Directive>> {
    let series = fetcher.fetch(provider)?;
    let prices = normalize_series(&Normalizer::local(provider.scale()), &series)?;
    Ok(prices
        .observations(commodity, currency)
        .map(Directive::Price)
        .collect())
}

/// One price per sample, duplicated dates included.
fn every_price<P: SeriesProvider, C: HttpClient>(
    fetcher: &Fetcher<C>,
    provider: &P,
    commodity: &str,
    currency: &str,
) -> Result<Vec<Directive>> {
    let normalizer = Normalizer::local(provider.scale());
    fetcher
        .fetch(provider)?
        .iter()
        .map(|sample| -> Result<Directive> {
            let (date, price) = normalizer.normalize(sample)?;
            Ok(Directive::Price(PriceObservation::new(
                date, &price, commodity, currency,
            )))
        })
        .collect()
}

/// `<commodity>.price` files holding an LSE key on their first line.
pub struct LsePriceImporter<C: HttpClient> {
    currency: String,
    fetcher: Fetcher<C>,
}

impl<C: HttpClient> LsePriceImporter<C> {
    pub fn new(currency: &str, fetcher: Fetcher<C>) -> Self {
        Self {
            currency: currency.to_string(),
            fetcher,
        }
    }
}

impl<C: HttpClient> Importer for LsePriceImporter<C> {
    fn name(&self) -> &'static str {
        "LsePriceImporter"
    }

    fn matches(&self, file: &SourceFile) -> bool {
        is_price_file(file)
    }

    fn extract(&self, file: &SourceFile) -> Result<Vec<Directive>> {
        let key = file
            .text()?
            .lines()
            .next()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(anyhow!("`{}' holds no LSE key", file.path().display()))?;
        let commodity = commodity_of(file);
        debug!(key, commodity, "extracting LSE prices");

        price_directives(
            &self.fetcher,
            &LondonStockExchange::new(key),
            commodity,
            &self.currency,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstrumentRow {
    label: String,
    symbol: String,
}

/// `<commodity>.price` files listing FT instruments as `Label,Symbol` CSV.
pub struct FtPriceImporter<C: HttpClient> {
    currency: String,
    fetcher: Fetcher<C>,
}

impl<C: HttpClient> FtPriceImporter<C> {
    pub fn new(currency: &str, fetcher: Fetcher<C>) -> Self {
        Self {
            currency: currency.to_string(),
            fetcher,
        }
    }
}

impl<C: HttpClient> Importer for FtPriceImporter<C> {
    fn name(&self) -> &'static str {
        "FtPriceImporter"
    }

    fn matches(&self, file: &SourceFile) -> bool {
        is_price_file(file)
    }

    fn extract(&self, file: &SourceFile) -> Result<Vec<Directive>> {
        let commodity = commodity_of(file);
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file.text()?.as_bytes());

        let mut directives = Vec::new();
        for row in reader.deserialize::<InstrumentRow>() {
            let row = row
                .with_context(|| format!("invalid instrument row in `{}'", file.path().display()))?;
            debug!(label = %row.label, symbol = %row.symbol, commodity, "extracting FT prices");
            directives.extend(every_price(
                &self.fetcher,
                &FinancialTimes::new(&row.label, &row.symbol),
                commodity,
                &self.currency,
            )?);
        }
        Ok(directives)
    }
}

/// Payslip PDFs, booked as a single salary transaction.
pub struct PayslipImporter {
    payslip: Payslip,
}

impl PayslipImporter {
    pub fn new(payslip: Payslip) -> Self {
        Self { payslip }
    }

    /// Account the salary is booked against.
    pub fn file_account(&self) -> String {
        format!("Income:{}:Salary", self.payslip.employer)
    }
}

impl Importer for PayslipImporter {
    fn name(&self) -> &'static str {
        "PayslipImporter"
    }

    fn matches(&self, file: &SourceFile) -> bool {
        file.is_pdf()
            && file
                .text()
                .map(|text| text.contains(GROSS_PAY_MARKER))
                .unwrap_or(false)
    }

    fn extract(&self, file: &SourceFile) -> Result<Vec<Directive>> {
        let transaction = self.payslip.transaction(file.text()?)?;
        Ok(vec![Directive::Transaction(transaction)])
    }
}

/// Run the first matching importer over `file`.
pub fn extract(importers: &[&dyn Importer], file: &SourceFile) -> Result<Option<Vec<Directive>>> {
    for importer in importers {
        if importer.matches(file) {
            debug!(importer = importer.name(), file = %file.path().display(), "importing");
            return importer.extract(file).map(Some);
        }
    }
    Ok(None)
}
