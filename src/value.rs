use ::chrono::NaiveDateTime;
use ::std::collections::BTreeMap;
use ::uuid::Uuid;

/// A scalar column value.
///
/// Values of the same kind compare naturally. Values of different kinds
/// compare by kind (`Bool < Int < Text < Timestamp < Uuid`), which keeps the
/// order total even for badly typed anchors.
#[derive(
    Clone, Debug, Deserialize, Display, Eq, From, Hash, IsVariant, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    #[display(fmt = "{}", _0)]
    Bool(bool),
    #[display(fmt = "{}", _0)]
    Int(i64),
    #[display(fmt = "'{}'", _0)]
    Text(String),
    #[display(fmt = "'{}'", _0)]
    Timestamp(NaiveDateTime),
    #[display(fmt = "'{}'", _0)]
    Uuid(Uuid),
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

/// Read access to the columns of one record.
pub trait Record {
    /// Value of `column`, or `None` if the record has no such column.
    fn value(&self, column: &str) -> Option<Value>;
}

impl<R: Record + ?Sized> Record for &R {
    fn value(&self, column: &str) -> Option<Value> {
        (**self).value(column)
    }
}

impl Record for BTreeMap<String, Value> {
    fn value(&self, column: &str) -> Option<Value> {
        self.get(column).cloned()
    }
}

/// A map-backed record.
#[derive(Clone, Debug, Default, Deserialize, Eq, From, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }
}

impl Record for Row {
    fn value(&self, column: &str) -> Option<Value> {
        self.0.value(column)
    }
}
