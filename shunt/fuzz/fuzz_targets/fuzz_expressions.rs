#![no_main]

use libfuzzer_sys::fuzz_target;
use shunt::default_environment;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let mut env = default_environment();
        env.define_constant("x", 100);
        env.define_constant("y", 50);
        for name in ["abs", "sqrt", "pow", "round"] {
            let _ = env.define_builtin(name);
        }

        let _ = env.evaluate(s);
    }
});
