//! A YAML 1.2 codec: load YAML text into a value tree, and dump the tree back to text.
//!
//! The loader builds [`Value`] from the documents with the implicit and explicit types of a
//! [`Schema`]. Anchors and aliases are kept as shared collections, and the dumper writes them
//! back as `&ref_N` / `*ref_N`, cycles included.
//!
//! ```
//! use yaml_codec::{dump, load, DumpOptions, LoadOptions};
//!
//! let v = load("- a\n- b\n- 3\n", LoadOptions::default()).unwrap().unwrap();
//! assert_eq!(dump(&v, DumpOptions::default()).unwrap(), "- a\n- b\n- 3\n");
//! ```
//!
//! Use [`load_all`] for the multi-document streams, and [`LoadOptions`] / [`DumpOptions`] to
//! change the behaviors.
//!
//! There is a `serde` feature to convert [`Value`] from / into the other data formats.
#![cfg_attr(doc_cfg, feature(doc_cfg))]
pub use crate::dumper::*;
pub use crate::error::*;
pub use crate::indicator::*;
pub use crate::parser::{load, load_all, load_all_with, LoadOptions, NodeEvent, NodeTrace};
pub use crate::schema::{Kind, Schema, Type};
pub use crate::value::*;

/// Create [`Value::Seq`] items literally.
///
/// The items are converted by [`Value::from`].
///
/// ```
/// use yaml_codec::{yaml_seq, Value};
///
/// let v = yaml_seq!["a", 1, true];
/// assert_eq!(v.at(1), Some(Value::Int(1)));
/// assert_eq!(yaml_seq![], Value::new_seq());
/// ```
#[macro_export]
macro_rules! yaml_seq {
    () => {
        $crate::Value::new_seq()
    };
    ($($v:expr),+ $(,)?) => {
        $crate::Value::from(vec![$($crate::Value::from($v)),+])
    };
}

/// Create [`Value::Map`] items literally.
///
/// ```
/// use yaml_codec::{yaml_map, Value};
///
/// let v = yaml_map! {
///     "a" => "b",
///     "c" => 1,
/// };
/// assert_eq!(v.get("c"), Some(Value::Int(1)));
/// ```
#[macro_export]
macro_rules! yaml_map {
    () => {
        $crate::Value::new_map()
    };
    ($($k:expr => $v:expr),+ $(,)?) => {
        vec![$(($crate::Value::from($k), $crate::Value::from($v))),+]
            .into_iter()
            .collect::<$crate::Value>()
    };
}

pub mod anchors;
mod dumper;
mod error;
mod indicator;
pub mod parser;
pub mod repr;
pub mod schema;
#[cfg(feature = "serde")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "serde")))]
pub mod serde;
#[cfg(test)]
mod tests;
mod value;
