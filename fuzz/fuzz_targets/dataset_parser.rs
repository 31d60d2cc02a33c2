#![no_main]

use libfuzzer_sys::fuzz_target;
use statcalc::{Dataset, RegressionEngine};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and analysis must return errors, never panic
        if let Ok(dataset) = Dataset::parse(input) {
            let _ = RegressionEngine::default().analyze(&dataset);
        }
    }
});
