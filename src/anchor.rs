use crate::{Collection, Error, Position, Record, Result, SortSpec, Value};
use ::tracing::{debug, warn};

/// Sort-column values of the record marking a page boundary, one per column
/// of the active [`SortSpec`] and in the same order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnchorValues {
    values: Vec<(String, Value)>,
}

impl AnchorValues {
    /// Read every sort column of `record`.
    pub fn from_record<R: Record + ?Sized>(spec: &SortSpec, record: &R) -> Result<Self> {
        let values = spec
            .columns()
            .iter()
            .map(|column| match record.value(&column.name) {
                Some(value) => Ok((column.name.clone(), value)),
                None => Err(Error::missing_column(&column.name)),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { values })
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.iter().find(|(name, _)| name == column).map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Turns a [`Position`] back into the anchor it was taken from with a
/// single unique-key lookup.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnchorResolver;

impl AnchorResolver {
    pub fn resolve<C: Collection>(&self, collection: &C, spec: &SortSpec, position: &Position) -> Result<AnchorValues> {
        let record = collection.find_by_key(position.value()).map_err(Error::query)?;
        let Some(record) = record else {
            warn!(%position, unique_key = collection.unique_key(), "cursor anchor not found");
            return Err(Error::StaleCursor { position: position.clone() });
        };
        let anchor = AnchorValues::from_record(spec, &record)?;
        debug!(%position, columns = spec.len(), "resolved cursor anchor");
        Ok(anchor)
    }
}
