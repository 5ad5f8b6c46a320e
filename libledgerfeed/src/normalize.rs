use crate::error::FormatError;
use chrono::{Local, NaiveDate, TimeZone};

/// Fractional digits every recorded price carries.
pub const PRICE_PRECISION: usize = 3;

/// A provider-native observation, before normalization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawSample {
    pub timestamp_millis: i64,
    pub value: f64,
}

impl RawSample {
    pub fn new(timestamp_millis: i64, value: f64) -> Self {
        Self {
            timestamp_millis,
            value,
        }
    }
}

/// Turns raw samples into `(date, price)` pairs.
///
/// `scale` divides the provider value into the ledger's unit, e.g. `100.0`
/// for a pence-denominated feed. Dates are taken in the normalizer's time
/// zone, which is the local one for everything that touches a real ledger.
#[derive(Clone, Debug)]
pub struct Normalizer<Tz: TimeZone = Local> {
    tz: Tz,
    scale: f64,
}

impl Normalizer<Local> {
    pub fn local(scale: f64) -> Self {
        Self::with_timezone(Local, scale)
    }
}

impl<Tz: TimeZone> Normalizer<Tz> {
    pub fn with_timezone(tz: Tz, scale: f64) -> Self {
        Self { tz, scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Calendar date of the sample's whole second, in this normalizer's zone.
    pub fn date(&self, sample: &RawSample) -> Result<NaiveDate, FormatError> {
        let secs = sample.timestamp_millis.div_euclid(1000);
        self.tz
            .timestamp_opt(secs, 0)
            .single()
            .map(|datetime| datetime.date_naive())
            .ok_or(FormatError::Timestamp { sample: *sample })
    }

    pub fn price(&self, sample: &RawSample) -> Result<String, FormatError> {
        let value = sample.value / self.scale;
        if !value.is_finite() {
            return Err(FormatError::Value {
                sample: *sample,
                scale: self.scale,
            });
        }
        Ok(format_price(value))
    }

    pub fn normalize(&self, sample: &RawSample) -> Result<(NaiveDate, String), FormatError> {
        Ok((self.date(sample)?, self.price(sample)?))
    }
}

pub fn format_price(value: f64) -> String {
    format!("{:.*}", PRICE_PRECISION, value)
}
