use crate::error::WriteError;
use crate::price::PriceBook;

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

/// Write one price directive per line, in the book's order.
pub fn write_prices<W: Write>(
    out: &mut W,
    prices: &PriceBook,
    commodity: &str,
    currency: &str,
) -> io::Result<usize> {
    let mut count = 0;
    for observation in prices.observations(commodity, currency) {
        writeln!(out, "{}", observation)?;
        count += 1;
    }
    Ok(count)
}

fn ends_mid_line(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Open a ledger for appending, terminating its last line if unterminated.
pub(crate) fn open_append(path: &Path) -> Result<File, WriteError> {
    let wrap = |source: io::Error| WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(wrap)?;

    if ends_mid_line(&mut file).map_err(wrap)? {
        debug!(path = %path.display(), "terminating last line");
        file.write_all(b"\n").map_err(wrap)?;
    }

    Ok(file)
}

/// Append prices to a ledger file, creating it when missing.
///
/// Existing content is never rewritten. Lines already flushed stay in place
/// when a later write fails.
pub fn append_prices(
    path: &Path,
    prices: &PriceBook,
    commodity: &str,
    currency: &str,
) -> Result<usize, WriteError> {
    let wrap = |source: io::Error| WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut out = BufWriter::new(open_append(path)?);
    let count = write_prices(&mut out, prices, commodity, currency).map_err(wrap)?;
    out.flush().map_err(wrap)?;

    debug!(path = %path.display(), count, "appended prices");
    Ok(count)
}
