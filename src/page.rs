use crate::{Position, Record};

/// One page of records, in sort order, plus whether the walk can continue.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Page<R> {
    pub records: Vec<R>,
    /// true iff at least one record lies beyond this page in the requested
    /// direction
    pub has_more: bool,
}

impl<R> Page<R> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<R: Record> Page<R> {
    /// Cursor for the page that follows this one (pass with `After`).
    pub fn last_position(&self, unique_key: &str) -> Option<Position> {
        self.records.last()?.value(unique_key).map(Position::from)
    }

    /// Cursor for the page that precedes this one (pass with `Before`).
    pub fn first_position(&self, unique_key: &str) -> Option<Position> {
        self.records.first()?.value(unique_key).map(Position::from)
    }
}
