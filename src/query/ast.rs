//! Typed request tree decoded from the JSON envelope.
//!
//! The wire format chains filter nodes as a linked list (each node holds
//! at most one child under `and` or `or`); the AST flattens that into a
//! tree of combinator-tagged children, which keeps evaluation a simple
//! fold over the child list.

/// Comparison operator of a single predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    Larger,
    /// `<`
    Smaller,
    /// `><`, value is `"lo-hi"`
    Between,
}

/// How a child filter combines with the running result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Re-filter the current results in memory
    And,
    /// Evaluate independently and append
    Or,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// One comparison: a field, an operator and the canonical value string.
///
/// Wire values are canonicalised at parse time: strings verbatim, numbers
/// with six fractional digits, booleans as `true`/`false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub operator: Operator,
    pub value: String,
}

/// A filter tree node: the predicate plus combinator-tagged children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Where {
    pub predicate: Predicate,
    pub children: Vec<(Combinator, Where)>,
}

/// Ordering directive. With `levenshtein` set the results order by edit
/// distance between the query string and the field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: Direction,
    pub levenshtein: Option<String>,
}

/// Source half of an [`Implement`] enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplementFrom {
    pub table: String,
    pub field: String,
}

/// Join-style field enrichment. Parsed for wire compatibility; the engine
/// never executes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Implement {
    pub from: ImplementFrom,
    pub field: String,
    pub alias: Option<String>,
}

/// A fully parsed request envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub where_clause: Option<Where>,
    pub sort: Option<Sort>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub implement: Vec<Implement>,
}
