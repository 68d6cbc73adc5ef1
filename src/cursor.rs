use crate::Value;

/// Opaque cursor: the unique-key value of a page boundary record.
///
/// A position carries no ordering information on its own. It only means
/// something together with a [`crate::SortSpec`] and a lookup into the
/// collection it came from.
#[derive(Clone, Debug, Deserialize, Display, Eq, From, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Position(Value);

impl Position {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

macro_rules! position_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Position {
                fn from(value: $ty) -> Self {
                    Self(value.into())
                }
            }
        )*
    };
}

position_from!(bool, i32, i64, String, &str, ::chrono::NaiveDateTime, ::uuid::Uuid);

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, IsVariant, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationDirection {
    /// Continue forward through the sort order.
    #[default]
    After,
    /// Continue backward through the sort order.
    Before,
}

impl PaginationDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::After => Self::Before,
            Self::Before => Self::After,
        }
    }
}

/// One page request as a caller would send it.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct PageRequest {
    pub limit: u32,
    /// absent for the first page
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub direction: PaginationDirection,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self { limit, position: None, direction: PaginationDirection::After }
    }

    pub fn after(limit: u32, position: impl Into<Position>) -> Self {
        Self { limit, position: Some(position.into()), direction: PaginationDirection::After }
    }

    pub fn before(limit: u32, position: impl Into<Position>) -> Self {
        Self { limit, position: Some(position.into()), direction: PaginationDirection::Before }
    }
}
