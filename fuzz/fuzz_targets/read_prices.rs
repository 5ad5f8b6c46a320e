#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let prices = libledgerfeed::reader::scan_prices(text, "FTSE100", "GBP");
        for (date, price) in prices.iter() {
            let line = format!("{} price FTSE100 {} GBP", date, price);
            assert!(libledgerfeed::parser::parse_price_line(&line).is_ok());
        }
    }
});
