use crate::error::FormatError;
use crate::normalize::{Normalizer, RawSample};
use crate::price::PriceBook;
use chrono::TimeZone;

/// Outcome of reconciling a fetched series against recorded prices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// Every fetched date is already recorded.
    UpToDate,
    /// Prices for dates not yet recorded, in series order.
    Append(PriceBook),
}

impl Reconciliation {
    fn from_prices(prices: PriceBook) -> Self {
        if prices.is_empty() {
            Reconciliation::UpToDate
        } else {
            Reconciliation::Append(prices)
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Reconciliation::UpToDate)
    }

    pub fn new_prices(&self) -> Option<&PriceBook> {
        match self {
            Reconciliation::UpToDate => None,
            Reconciliation::Append(prices) => Some(prices),
        }
    }

    pub fn into_prices(self) -> PriceBook {
        match self {
            Reconciliation::UpToDate => PriceBook::new(),
            Reconciliation::Append(prices) => prices,
        }
    }
}

/// Normalize a whole series, the last sample of a date wins.
pub fn normalize_series<'a, Tz, I>(
    normalizer: &Normalizer<Tz>,
    series: I,
) -> Result<PriceBook, FormatError>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a RawSample>,
{
    let mut prices = PriceBook::new();
    for sample in series {
        let (date, price) = normalizer.normalize(sample)?;
        prices.insert(date, &price);
    }
    Ok(prices)
}

/// Prices of `fresh` whose date is absent from `recorded`.
///
/// Only dates are compared, a recorded date is never emitted again even when
/// the fresh price differs.
pub fn diff_prices(recorded: &PriceBook, fresh: &PriceBook) -> PriceBook {
    fresh
        .iter()
        .filter(|(date, _)| !recorded.contains_date(date))
        .map(|(date, price)| (*date, price.to_string()))
        .collect()
}

pub fn reconcile<Tz: TimeZone>(
    normalizer: &Normalizer<Tz>,
    series: &[RawSample],
    recorded: &PriceBook,
) -> Result<Reconciliation, FormatError> {
    let fresh = normalize_series(normalizer, series)?;
    Ok(Reconciliation::from_prices(diff_prices(recorded, &fresh)))
}
