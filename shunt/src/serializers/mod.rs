//! Conversion between external data formats and expression constants

mod json;

pub use json::{from_json, to_json};
