//! Documents and result sets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single attribute value.
///
/// Wire JSON decodes into exactly these three shapes; arrays, objects and
/// null are rejected at the transport edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean
    Boolean(bool),
    /// 64-bit float (all JSON numbers land here)
    Number(f64),
    /// UTF-8 string
    Text(String),
}

impl Scalar {
    /// Renders the value with the same rule the index uses for its bucket
    /// keys: text verbatim, numbers in general formatting without trailing
    /// zeros, booleans as `true`/`false`.
    pub fn render(&self) -> String {
        match self {
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Number(n) => format_number(*n),
            Scalar::Text(s) => s.clone(),
        }
    }

    /// The boolean carried by this value, `false` for other variants.
    pub fn as_boolean(&self) -> bool {
        matches!(self, Scalar::Boolean(true))
    }
}

/// Formats a float the way the index keys it: integral values lose the
/// fractional part entirely (`3.0` renders as `3`).
fn format_number(n: f64) -> String {
    n.to_string()
}

/// One stored document: a generated id plus its attribute map.
///
/// Attributes outside the table schema are stored but never indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// UUIDv4 assigned at insert; doubles as the document's filename
    pub id: String,
    /// Field name to value
    pub attrs: BTreeMap<String, Scalar>,
}

impl Object {
    /// Creates an object from its parts.
    pub fn new(id: impl Into<String>, attrs: BTreeMap<String, Scalar>) -> Self {
        Self {
            id: id.into(),
            attrs,
        }
    }

    /// The rendered form of an attribute, if present.
    pub fn rendered(&self, field: &str) -> Option<String> {
        self.attrs.get(field).map(Scalar::render)
    }
}

/// An ordered result set flowing through the query pipeline.
///
/// Filters return order-preserving subsets, sort reorders, paging slices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Objects {
    objects: Vec<Object>,
}

impl Objects {
    /// Wraps a vector of objects.
    pub fn new(objects: Vec<Object>) -> Self {
        Self { objects }
    }

    /// Appends another result set, preserving both orders. Duplicates
    /// are kept.
    pub fn append(&mut self, other: Objects) {
        self.objects.extend(other.objects);
    }

    /// Number of objects in the set.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates the objects in order.
    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.objects.iter()
    }

    /// Borrow the underlying slice.
    pub fn as_slice(&self) -> &[Object] {
        &self.objects
    }

    /// Mutable access for in-place reordering.
    pub fn as_mut_slice(&mut self) -> &mut [Object] {
        &mut self.objects
    }

    /// Consumes the set into its vector.
    pub fn into_vec(self) -> Vec<Object> {
        self.objects
    }
}

impl FromIterator<Object> for Objects {
    fn from_iter<I: IntoIterator<Item = Object>>(iter: I) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Objects {
    type Item = Object;
    type IntoIter = std::vec::IntoIter<Object>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}
