//! Shared collections found by identity before dumping.
use crate::Value;
use std::collections::{HashMap, HashSet};

/// The duplicated collections of a value tree.
///
/// A collection reached more than once is written with an anchor `&ref_N` at its first
/// appearance, and with an alias `*ref_N` after that.
/// The index `N` follows the order the duplicates are found.
///
/// ```
/// use yaml_codec::{anchors::Anchors, yaml_seq, Value};
///
/// let shared = yaml_seq![1, 2];
/// let v = Value::from(vec![shared.clone(), shared.clone(), yaml_seq![3]]);
/// let anchors = Anchors::scan(&v);
/// assert_eq!(anchors.len(), 1);
/// assert_eq!(anchors.index(&shared), Some(0));
/// ```
#[derive(Debug, Default)]
pub struct Anchors {
    index: HashMap<usize, usize>,
    used: Vec<bool>,
}

impl Anchors {
    /// Walk the tree, including the keys of the maps.
    pub fn scan(value: &Value) -> Self {
        let mut visited = HashSet::new();
        let mut anchors = Self::default();
        anchors.inspect(value, &mut visited);
        anchors
    }

    fn inspect(&mut self, value: &Value, visited: &mut HashSet<usize>) {
        let Some(id) = value.id() else {
            return;
        };
        if !visited.insert(id) {
            if !self.index.contains_key(&id) {
                self.index.insert(id, self.used.len());
                self.used.push(false);
            }
            return;
        }
        match value {
            Value::Seq(seq) => {
                for item in seq.borrow().iter() {
                    self.inspect(item, visited);
                }
            }
            Value::Map(map) => {
                for (k, v) in map.borrow().iter() {
                    self.inspect(k, visited);
                    self.inspect(v, visited);
                }
            }
            _ => {}
        }
    }

    /// Number of the duplicated collections.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Return true if nothing is shared.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }

    /// The anchor index of the value, if it is duplicated.
    pub fn index(&self, value: &Value) -> Option<usize> {
        value.id().and_then(|id| self.index.get(&id).copied())
    }

    /// Mark the duplicate as written, return true if it was written before.
    pub(crate) fn visit(&mut self, index: usize) -> bool {
        std::mem::replace(&mut self.used[index], true)
    }
}
