#![no_main]

use libfuzzer_sys::fuzz_target;

use webtext::extractor::extract_text;
use webtext::fetcher::is_safe_url;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);

    // Neither the validator nor the extractor may panic on arbitrary input.
    let _ = is_safe_url(&input);
    let text = extract_text(&input);
    assert!(!text.extracted_content.starts_with(char::is_whitespace));
    assert!(!text.extracted_content.contains("  "));
});
