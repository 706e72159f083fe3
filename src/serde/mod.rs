//! The implementation of serialization. The technique is come from [`serde`].
//!
//! [`Value`](crate::Value) implements [`Serialize`](::serde::Serialize) and
//! [`Deserialize`](::serde::Deserialize), so a loaded document can be converted
//! into other data formats, and the data of other formats can be dumped as YAML.
//!
//! ```
//! use yaml_codec::{load, LoadOptions};
//!
//! let v = load("name: Bob\nage: 46\ntags: [a, b]\n", LoadOptions::default())
//!     .unwrap()
//!     .unwrap();
//! let json = serde_json::to_string(&v).unwrap();
//! assert_eq!(json, r#"{"name":"Bob","age":46,"tags":["a","b"]}"#);
//! ```
//!
//! Timestamps are serialized as ISO-8601 strings, and binary data as bytes.
//! Cyclic values cannot be serialized.
mod de;
mod ser;
