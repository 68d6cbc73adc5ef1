use crate::{Error, Record, Result};
use ::serde::{Deserialize, Deserializer};
use ::std::cmp::Ordering;
use ::std::collections::HashSet;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, IsVariant, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orient an ascending comparison result to this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct SortColumn {
    pub name: String,
    pub direction: SortDirection,
}

impl SortColumn {
    pub fn asc(name: impl Into<String>) -> Self {
        Self { name: name.into(), direction: SortDirection::Ascending }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self { name: name.into(), direction: SortDirection::Descending }
    }
}

/// Lexicographic sort order over a collection.
///
/// Always non-empty and free of repeated columns. Whether the last column is
/// unique can only be checked against a collection, see
/// [`SortSpec::ensure_unique_terminal`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SortSpec {
    columns: Vec<SortColumn>,
}

impl SortSpec {
    pub fn new(columns: impl IntoIterator<Item = SortColumn>) -> Result<Self> {
        let columns: Vec<SortColumn> = columns.into_iter().collect();
        if columns.is_empty() {
            return Err(Error::invalid_sort_spec("sort order is empty"));
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::invalid_sort_spec(format!(
                    "column '{}' appears more than once",
                    column.name
                )));
            }
        }
        Ok(Self { columns })
    }

    /// Order by the unique key alone.
    pub fn by_key(key: impl Into<String>, direction: SortDirection) -> Self {
        Self { columns: vec![SortColumn { name: key.into(), direction }] }
    }

    pub fn columns(&self) -> &[SortColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn terminal(&self) -> &SortColumn {
        // non-empty by construction
        &self.columns[self.columns.len() - 1]
    }

    pub fn ensure_unique_terminal(&self, unique_key: &str) -> Result<()> {
        let terminal = &self.terminal().name;
        if terminal != unique_key {
            return Err(Error::invalid_sort_spec(format!(
                "last sort column '{terminal}' is not the unique key '{unique_key}'"
            )));
        }
        Ok(())
    }

    /// The same columns with every direction flipped.
    pub fn reversed(&self) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|column| SortColumn { name: column.name.clone(), direction: column.direction.reversed() })
                .collect(),
        }
    }

    /// Compare two records under this order. A missing value sorts first.
    pub fn compare<A: Record + ?Sized, B: Record + ?Sized>(&self, a: &A, b: &B) -> Ordering {
        self.columns
            .iter()
            .map(|column| column.direction.apply(a.value(&column.name).cmp(&b.value(&column.name))))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl<'de> Deserialize<'de> for SortSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let columns = Vec::<SortColumn>::deserialize(deserializer)?;
        Self::new(columns).map_err(serde::de::Error::custom)
    }
}
