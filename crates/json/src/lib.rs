//! A recursive-descent JSON decoder
//!
//! [`parse`] turns a byte slice into a [`Value`] tree. The decoder is strict about
//! structure, reporting every grammar violation and any trailing bytes as a
//! [`ParseError`] that names the byte offset, but accepts two extensions found in the
//! feeds it was written for:
//!
//! - inside strings the HTML entities `&gt;`, `&lt;` and `&amp;` are decoded
//! - an integer that does not fit in `i64` is kept as a float
//!
//! # Example
//!
//! ```
//! use circle_json::{Value, parse};
//!
//! let value = parse(r#"{"text": "a &gt; b", "id": 10, "ratio": 10.5}"#).unwrap();
//! assert_eq!(value.get("text").and_then(Value::as_str), Some("a > b"));
//! assert_eq!(value.get("id"), Some(&Value::Integer(10)));
//! assert_eq!(value.get("ratio"), Some(&Value::Float(10.5)));
//! ```

mod error;
mod parser;
mod value;

pub use error::ParseError;
pub use parser::MAX_DEPTH;
pub use parser::parse;
pub use value::Array;
pub use value::Object;
pub use value::Value;
