use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Page size used by `page()` when no limit has been set yet.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Description of what the grid currently shows.
///
/// Every group is optional; an absent group contributes nothing to the
/// outgoing request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default)]
    pub order_by: Option<OrderBy>,
    #[serde(default)]
    pub limit_to: Option<LimitTo>,
    #[serde(default)]
    pub filter: Option<Filter>,
}

/// Sort column (or expression) and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub expression: String,
    #[serde(default)]
    pub reverse: bool,
}

/// Paging window: `limit` rows starting at offset `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitTo {
    pub limit: u64,
    #[serde(default)]
    pub begin: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub expression: FilterExpression,
}

/// Search expression sent to the server.
///
/// `Fields` keeps insertion order, which is also the order the fields are
/// serialized in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterExpression {
    Text(String),
    Fields(Map<String, Value>),
}

impl OrderBy {
    pub fn new(expression: impl Into<String>, reverse: bool) -> Self {
        Self {
            expression: expression.into(),
            reverse,
        }
    }
}

impl LimitTo {
    pub fn new(limit: u64, begin: u64) -> Self {
        Self { limit, begin }
    }

    /// Zero-based page index of `begin`, or `None` when `limit` is zero.
    pub fn page_index(&self) -> Option<u64> {
        if self.limit == 0 {
            None
        } else {
            Some(self.begin / self.limit)
        }
    }
}

impl Filter {
    pub fn new(expression: impl Into<FilterExpression>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

impl FilterExpression {
    /// Builds a field expression from `(field, value)` pairs, in order.
    pub fn fields<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        FilterExpression::Fields(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<String> for FilterExpression {
    fn from(value: String) -> Self {
        FilterExpression::Text(value)
    }
}

impl From<&str> for FilterExpression {
    fn from(value: &str) -> Self {
        FilterExpression::Text(value.to_string())
    }
}

impl From<Map<String, Value>> for FilterExpression {
    fn from(value: Map<String, Value>) -> Self {
        FilterExpression::Fields(value)
    }
}
