use chrono::NaiveDate;
use indexmap::IndexMap;
use std::fmt;

/// A dated price of one commodity in one currency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceObservation {
    date: NaiveDate,
    price: String,
    commodity: String,
    currency: String,
}

impl PriceObservation {
    pub fn new(date: NaiveDate, price: &str, commodity: &str, currency: &str) -> Self {
        Self {
            date,
            price: price.to_string(),
            commodity: commodity.to_string(),
            currency: currency.to_string(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn commodity(&self) -> &str {
        &self.commodity
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

/// Renders the ledger's price directive, without the line terminator.
impl fmt::Display for PriceObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} price {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.commodity,
            self.price,
            self.currency
        )
    }
}

/// Prices keyed by date, one per date, kept in insertion order.
///
/// Inserting an already present date replaces its price but keeps its
/// original position, so a sequential scan ends up last-wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriceBook(IndexMap<NaiveDate, String>);

impl PriceBook {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, date: NaiveDate, price: &str) -> Option<String> {
        self.0.insert(date, price.to_string())
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&str> {
        self.0.get(date).map(String::as_str)
    }

    pub fn contains_date(&self, date: &NaiveDate) -> bool {
        self.0.contains_key(date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &str)> {
        self.0.iter().map(|(date, price)| (date, price.as_str()))
    }

    pub fn observations<'b>(
        &'b self,
        commodity: &'b str,
        currency: &'b str,
    ) -> impl Iterator<Item = PriceObservation> + 'b {
        self.iter()
            .map(move |(date, price)| PriceObservation::new(*date, price, commodity, currency))
    }
}

impl FromIterator<(NaiveDate, String)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<(NaiveDate, String)> for PriceBook {
    fn extend<I: IntoIterator<Item = (NaiveDate, String)>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for PriceBook {
    type Item = (NaiveDate, String);
    type IntoIter = indexmap::map::IntoIter<NaiveDate, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
