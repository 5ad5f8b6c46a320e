//! libledgerfeed - Keep plain text ledgers fed with market prices
//! ---
//!
//! Fetches price series from market-data providers and appends the dates a
//! ledger has not recorded yet as `price` directives, so running it again
//! with nothing new on the provider's side never changes the file.
//! Payslips are imported into the same ledgers as salary transactions.
//!

extern crate pest;
#[macro_use]
extern crate pest_derive;

mod account;
mod directive;
pub mod error;

/// Market-data providers and the blocking transport they are fetched with.
pub mod fetch;

/// Identify/extract importers for price files and payslips.
pub mod importer;

/// A ledger file seen through the prices of one commodity.
pub mod ledger;

/// Turning provider samples into dated prices.
///
/// Dates are calendar dates in the local time zone. A sample taken near
/// midnight UTC lands on a different date depending on where the import
/// runs, which is kept as is since existing ledgers were recorded that way.
pub mod normalize;

pub mod parser;
pub mod payslip;
pub mod price;
pub mod reader;
pub mod reconcile;
mod transaction;
pub mod writer;

pub use account::Account;
pub use directive::ParsedPrice;
pub use error::{FetchError, FormatError, LedgerFeedError, ReadError, WriteError};
pub use ledger::PriceLedger;
pub use normalize::{Normalizer, RawSample};
pub use price::{PriceBook, PriceObservation};
pub use reconcile::{diff_prices, normalize_series, reconcile, Reconciliation};
pub use transaction::{Amount, Posting, Transaction, TransactionState};
