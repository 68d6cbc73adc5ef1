use crate::{Predicate, Record, SortSpec, Value};
use ::std::convert::Infallible;

/// The data store seen by the paginator.
///
/// Each method maps to one native query of the host data layer. The
/// paginator issues at most three of them per page, strictly in sequence,
/// and stops at the first error.
pub trait Collection {
    type Record: Record;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Name of a column whose values are unique across the collection.
    fn unique_key(&self) -> &str;

    /// Index-equality lookup on the unique key.
    fn find_by_key(&self, key: &Value) -> Result<Option<Self::Record>, Self::Error>;

    /// Records matching `filter`, ordered by `order`, at most `limit` of them.
    fn query(&self, filter: Option<&Predicate>, order: &SortSpec, limit: usize) -> Result<Vec<Self::Record>, Self::Error>;

    /// Whether at least one record matches `filter`.
    fn exists(&self, filter: &Predicate) -> Result<bool, Self::Error>;
}

impl<C: Collection + ?Sized> Collection for &C {
    type Record = C::Record;
    type Error = C::Error;

    fn unique_key(&self) -> &str {
        (**self).unique_key()
    }

    fn find_by_key(&self, key: &Value) -> Result<Option<Self::Record>, Self::Error> {
        (**self).find_by_key(key)
    }

    fn query(&self, filter: Option<&Predicate>, order: &SortSpec, limit: usize) -> Result<Vec<Self::Record>, Self::Error> {
        (**self).query(filter, order, limit)
    }

    fn exists(&self, filter: &Predicate) -> Result<bool, Self::Error> {
        (**self).exists(filter)
    }
}

/// A read-only collection held in memory, scanned on every query.
#[derive(Clone, Debug)]
pub struct MemoryCollection<R> {
    unique_key: String,
    records: Vec<R>,
}

impl<R: Record + Clone> MemoryCollection<R> {
    pub fn new(unique_key: impl Into<String>, records: impl IntoIterator<Item = R>) -> Self {
        Self { unique_key: unique_key.into(), records: records.into_iter().collect() }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }
}

impl<R: Record + Clone> Collection for MemoryCollection<R> {
    type Record = R;
    type Error = Infallible;

    fn unique_key(&self) -> &str {
        &self.unique_key
    }

    fn find_by_key(&self, key: &Value) -> Result<Option<R>, Infallible> {
        Ok(self
            .records
            .iter()
            .find(|record| record.value(&self.unique_key).as_ref() == Some(key))
            .cloned())
    }

    fn query(&self, filter: Option<&Predicate>, order: &SortSpec, limit: usize) -> Result<Vec<R>, Infallible> {
        let mut matched: Vec<R> = self
            .records
            .iter()
            .filter(|record| filter.map_or(true, |filter| filter.evaluate(*record)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| order.compare(a, b));
        matched.truncate(limit);
        Ok(matched)
    }

    fn exists(&self, filter: &Predicate) -> Result<bool, Infallible> {
        Ok(self.records.iter().any(|record| filter.evaluate(record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompareOp, Row, SortColumn};

    fn collection() -> MemoryCollection<Row> {
        MemoryCollection::new(
            "id",
            [3, 1, 4, 5, 2].map(|id| Row::new().with("id", id).with("group", id % 2)),
        )
    }

    #[test]
    fn test_find_by_key() {
        let collection = collection();
        assert_eq!(collection.records().len(), 5);
        let found = collection.find_by_key(&Value::Int(4)).unwrap().unwrap();
        assert_eq!(found.get("group"), Some(&Value::Int(0)));
        assert!(collection.find_by_key(&Value::Int(9)).unwrap().is_none());
    }

    #[test]
    fn test_query_sorts_filters_and_limits() {
        let collection = collection();
        let order = SortSpec::new(vec![SortColumn::asc("group"), SortColumn::desc("id")]).unwrap();
        let ids: Vec<Value> = collection
            .query(None, &order, 3)
            .unwrap()
            .iter()
            .filter_map(|row| row.value("id"))
            .collect();
        assert_eq!(ids, vec![Value::Int(4), Value::Int(2), Value::Int(5)]);

        let filter = Predicate::compare("id", CompareOp::Gt, 3);
        assert_eq!(collection.query(Some(&filter), &order, 10).unwrap().len(), 2);
        assert!(collection.exists(&filter).unwrap());
        assert!(!collection.exists(&Predicate::compare("id", CompareOp::Gt, 5)).unwrap());
    }
}
