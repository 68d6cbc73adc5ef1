use crate::{
    AnchorResolver, AnchorValues, Collection, Error, Page, PageRequest, PaginationConfig, PaginationDirection,
    Position, Predicate, PredicateBuilder, Result, SortSpec,
};
use ::tracing::debug;

/// Runs the filtered, ordered and limited page query.
#[derive(Clone, Copy, Debug, Default)]
pub struct PageFetcher;

impl PageFetcher {
    /// Up to `limit` records matching `filter`, returned in `spec` order.
    ///
    /// `Before` pages are read nearest-first through the reversed order and
    /// flipped back, so they end right at the anchor.
    pub fn fetch<C: Collection>(
        &self,
        collection: &C,
        spec: &SortSpec,
        filter: Option<&Predicate>,
        direction: PaginationDirection,
        limit: u32,
    ) -> Result<Vec<C::Record>> {
        if limit == 0 {
            return Err(Error::InvalidLimit { limit, max: None });
        }
        let limit = limit as usize;
        let records = match direction {
            PaginationDirection::After => collection.query(filter, spec, limit).map_err(Error::query)?,
            PaginationDirection::Before => {
                let mut records = collection.query(filter, &spec.reversed(), limit).map_err(Error::query)?;
                records.reverse();
                records
            }
        };
        Ok(records)
    }
}

/// Decides whether records exist past a fetched page.
#[derive(Clone, Copy, Debug, Default)]
pub struct HasMoreDetector {
    pub builder: PredicateBuilder,
}

impl HasMoreDetector {
    pub fn new(builder: PredicateBuilder) -> Self {
        Self { builder }
    }

    /// Probe the collection beyond the page's far edge: the last record for
    /// `After`, the first for `Before`. An empty page issues no query.
    pub fn detect<C: Collection>(
        &self,
        collection: &C,
        spec: &SortSpec,
        records: &[C::Record],
        direction: PaginationDirection,
    ) -> Result<bool> {
        let edge = match direction {
            PaginationDirection::After => records.last(),
            PaginationDirection::Before => records.first(),
        };
        let Some(edge) = edge else {
            return Ok(false);
        };
        let anchor = AnchorValues::from_record(spec, edge)?;
        let filter = self.builder.build(spec, &anchor, direction)?;
        collection.exists(&filter).map_err(Error::query)
    }
}

/// Keyset paginator: resolves the cursor, builds the predicate, fetches the
/// page and probes for more.
#[derive(Clone, Debug, Default)]
pub struct Paginator {
    config: PaginationConfig,
    resolver: AnchorResolver,
    fetcher: PageFetcher,
}

impl Paginator {
    pub fn new(config: PaginationConfig) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn from_env() -> Result<Self> {
        PaginationConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    fn builder(&self) -> PredicateBuilder {
        PredicateBuilder::new(self.config.form)
    }

    pub fn fetch_page<C: Collection>(
        &self,
        collection: &C,
        spec: &SortSpec,
        position: Option<&Position>,
        direction: PaginationDirection,
        limit: u32,
    ) -> Result<Page<C::Record>> {
        self.config.check_limit(limit)?;
        spec.ensure_unique_terminal(collection.unique_key())?;

        let filter = match position {
            Some(position) => {
                let anchor = self.resolver.resolve(collection, spec, position)?;
                Some(self.builder().build(spec, &anchor, direction)?)
            }
            None => None,
        };

        let records = self.fetcher.fetch(collection, spec, filter.as_ref(), direction, limit)?;
        let has_more = HasMoreDetector::new(self.builder()).detect(collection, spec, &records, direction)?;
        debug!(?direction, limit, fetched = records.len(), has_more, "fetched keyset page");
        Ok(Page { records, has_more })
    }

    pub fn fetch<C: Collection>(&self, collection: &C, spec: &SortSpec, request: &PageRequest) -> Result<Page<C::Record>> {
        self.fetch_page(collection, spec, request.position.as_ref(), request.direction, request.limit)
    }
}

/// Fetch one page with the default configuration.
pub fn fetch_page<C: Collection>(
    collection: &C,
    spec: &SortSpec,
    position: Option<&Position>,
    direction: PaginationDirection,
    limit: u32,
) -> Result<Page<C::Record>> {
    Paginator::default().fetch_page(collection, spec, position, direction, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryCollection, Record, Row, SortColumn, Value};

    fn collection() -> MemoryCollection<Row> {
        MemoryCollection::new("id", (1..=7).map(|id| Row::new().with("id", id).with("bucket", id % 3)))
    }

    fn ids(records: &[Row]) -> Vec<i64> {
        records
            .iter()
            .filter_map(|row| match row.value("id") {
                Some(Value::Int(id)) => Some(id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_fetch_before_ends_at_anchor() {
        let spec = SortSpec::by_key("id", crate::SortDirection::Ascending);
        let filter = Predicate::compare("id", crate::CompareOp::Lt, 6);
        let records = PageFetcher
            .fetch(&collection(), &spec, Some(&filter), PaginationDirection::Before, 2)
            .unwrap();
        assert_eq!(ids(&records), vec![4, 5]);
    }

    #[test]
    fn test_fetch_rejects_zero_limit() {
        let spec = SortSpec::by_key("id", crate::SortDirection::Ascending);
        let err = PageFetcher.fetch(&collection(), &spec, None, PaginationDirection::After, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidLimit { limit: 0, .. }));
    }

    #[test]
    fn test_has_more_on_empty_page() {
        let spec = SortSpec::by_key("id", crate::SortDirection::Ascending);
        assert!(!HasMoreDetector::default()
            .detect(&collection(), &spec, &[], PaginationDirection::After)
            .unwrap());
    }

    #[test]
    fn test_walk_forward_and_back() {
        let collection = collection();
        let spec = SortSpec::new(vec![SortColumn::asc("bucket"), SortColumn::desc("id")]).unwrap();
        // bucket 0: 6 3, bucket 1: 7 4 1, bucket 2: 5 2

        let first = fetch_page(&collection, &spec, None, PaginationDirection::After, 3).unwrap();
        assert_eq!(ids(&first.records), vec![6, 3, 7]);
        assert!(first.has_more);

        let cursor = first.last_position("id");
        let second = fetch_page(&collection, &spec, cursor.as_ref(), PaginationDirection::After, 3).unwrap();
        assert_eq!(ids(&second.records), vec![4, 1, 5]);
        assert!(second.has_more);

        let cursor = second.first_position("id");
        let back = fetch_page(&collection, &spec, cursor.as_ref(), PaginationDirection::Before, 2).unwrap();
        assert_eq!(ids(&back.records), vec![3, 7]);
        assert!(back.has_more);

        let cursor = back.first_position("id");
        let start = fetch_page(&collection, &spec, cursor.as_ref(), PaginationDirection::Before, 2).unwrap();
        assert_eq!(ids(&start.records), vec![6]);
        assert!(!start.has_more);
    }

    #[test]
    fn test_terminal_column_must_be_unique_key() {
        let spec = SortSpec::new(vec![SortColumn::asc("id"), SortColumn::asc("bucket")]).unwrap();
        let err = fetch_page(&collection(), &spec, None, PaginationDirection::After, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidSortSpec { .. }));
    }

    #[test]
    fn test_configured_form_is_used() {
        let config = PaginationConfig { max_limit: Some(4), form: crate::PredicateForm::Accumulated };
        let paginator = Paginator::new(config);
        assert_eq!(paginator.config(), &config);

        let spec = SortSpec::new(vec![SortColumn::desc("bucket"), SortColumn::asc("id")]).unwrap();
        let page = paginator
            .fetch_page(&collection(), &spec, Some(&Position::from(5)), PaginationDirection::After, 4)
            .unwrap();
        // bucket 2: 2 5, bucket 1: 1 4 7, bucket 0: 3 6
        assert_eq!(ids(&page.records), vec![1, 4, 7, 3]);
        assert!(page.has_more);
    }

    #[test]
    fn test_fetch_by_request() {
        let spec = SortSpec::by_key("id", crate::SortDirection::Descending);
        let page = Paginator::default().fetch(&collection(), &spec, &PageRequest::after(10, 3)).unwrap();
        assert_eq!(ids(&page.records), vec![2, 1]);
        assert!(!page.has_more);
    }
}
