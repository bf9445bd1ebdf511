#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut streamed = vec![];
        let streamed_res = yarrow::load_all_with(s, |doc| streamed.push(doc));

        match yarrow::load_all(s) {
            Ok(docs) => {
                assert!(streamed_res.is_ok());
                assert_eq!(docs, streamed);
            }
            Err(e) => {
                let streamed_err = streamed_res.expect_err("callback mode accepted the stream");
                assert_eq!(e.to_string(), streamed_err.to_string());
            }
        }
    }
    // Byte streams go through the decoder, which must never panic either.
    let _ = yarrow::YamlDecoder::read(data).decode();
});
