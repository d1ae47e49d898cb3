#![no_main]

use libfuzzer_sys::fuzz_target;
use shunt::{Intercept, Lexer, Token};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = shunt::tokenize(s);

        let mut lexer = Lexer::with_interceptor(|emitted: &[Token], _lexeme: &str, _rest: &str| {
            if emitted.len() > 8 {
                Intercept::Stop
            } else {
                Intercept::Continue
            }
        });
        let _ = lexer.tokenize(s);
    }
});
