#![no_main]

use libfuzzer_sys::fuzz_target;
use shunt::evaluate;

fuzz_target!(|input: (u8, u8)| {
    let (depth, shape) = input;
    let depth = depth as usize % 150 + 1;

    let mut expr = String::from("1");
    for level in 0..depth {
        expr = match (shape as usize + level) % 3 {
            0 => format!("({} + 1)", expr),
            1 => format!("[{}, 1 -> 2]", expr),
            _ => format!("max({}, 1)", expr),
        };
    }

    let _ = evaluate(&expr);
});
