#![no_main]

use libfuzzer_sys::fuzz_target;

use mcfn::parse::{self, NoExtension, ParserConfig, TokenizerConfig};

fuzz_target!(|code: &str| {
    let Ok(tokens) = parse::tokenize_with(code, TokenizerConfig { line_continuation: true }) else {
        return;
    };

    let text: String = tokens.iter().map(|token| token.text.as_ref()).collect();
    assert_eq!(text, code);

    let _ = parse::parse_lines_lossy(tokens, ParserConfig::default(), &mut NoExtension);
});
