//! Keyset predicate construction.
//!
//! For a sort order `[(c1, d1), .., (cn, dn)]` and an anchor `{c1: a1, .., cn: an}`
//! the records strictly after (or before) the anchor are
//!
//! ```text
//! OR over k = 1..n of: c1 = a1 AND .. AND c(k-1) = a(k-1) AND ck <op> ak
//! ```
//!
//! with `<op>` taken from [`comparator`]. [`PredicateForm::Accumulated`]
//! emits the same set as a left-to-right conjunction instead:
//!
//! ```text
//! c1 <op1=> a1
//!   AND NOT (c1 = a1 AND c2 <opposite op2> a2)
//!   AND NOT (c1 = a1 AND c2 = a2 AND c3 <opposite op3 or equal> a3) ..
//! ```
//!
//! Every NOT clause carries the whole tied prefix, not only the previous
//! column, otherwise a row that wins on c1 but ties c2 could be dropped by
//! the c3 clause.

use crate::{AnchorValues, CompareOp, Error, PaginationDirection, Predicate, Result, SortDirection, SortSpec, Value};
use ::tracing::debug;

/// Strict comparator for one column.
pub fn comparator(direction: PaginationDirection, column: SortDirection) -> CompareOp {
    use PaginationDirection::*;
    use SortDirection::*;
    match (direction, column) {
        (After, Ascending) => CompareOp::Gt,
        (After, Descending) => CompareOp::Lt,
        (Before, Ascending) => CompareOp::Lt,
        (Before, Descending) => CompareOp::Gt,
    }
}

/// Position of a column inside the sort order.
#[derive(Clone, Copy, Debug, Eq, IsVariant, PartialEq)]
pub enum ColumnSlot {
    /// Followed by tie-breakers.
    Intermediate,
    /// The unique column; nothing breaks its ties.
    Terminal,
}

/// `(predicate op, opposite op)` for a column in the accumulated form.
///
/// The predicate op admits rows that are not yet behind the anchor on this
/// column, so it is inclusive unless the column is terminal. The opposite op
/// is its exact complement.
pub fn operators(direction: PaginationDirection, column: SortDirection, slot: ColumnSlot) -> (CompareOp, CompareOp) {
    let strict = comparator(direction, column);
    match slot {
        ColumnSlot::Terminal => (strict, strict.opposite().inclusive()),
        ColumnSlot::Intermediate => (strict.inclusive(), strict.opposite()),
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateForm {
    /// Disjunction of tied prefixes followed by one strict comparison.
    #[default]
    Expanded,
    /// Leading range comparison narrowed by negated tie clauses.
    Accumulated,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PredicateBuilder {
    pub form: PredicateForm,
}

impl PredicateBuilder {
    pub fn new(form: PredicateForm) -> Self {
        Self { form }
    }

    /// Predicate selecting the records strictly `direction` of `anchor`
    /// under `spec`. The anchor itself never matches.
    pub fn build(&self, spec: &SortSpec, anchor: &AnchorValues, direction: PaginationDirection) -> Result<Predicate> {
        let keys = spec
            .columns()
            .iter()
            .map(|column| {
                let value = anchor.get(&column.name).ok_or_else(|| Error::missing_column(&column.name))?;
                Ok((column.name.as_str(), column.direction, value))
            })
            .collect::<Result<Vec<_>>>()?;

        let predicate = match self.form {
            PredicateForm::Expanded => expanded(&keys, direction),
            PredicateForm::Accumulated => accumulated(&keys, direction),
        }
        .ok_or_else(|| Error::invalid_sort_spec("sort order is empty"))?;
        debug!(form = ?self.form, ?direction, %predicate, "built keyset predicate");
        Ok(predicate)
    }
}

type Key<'a> = (&'a str, SortDirection, &'a Value);

fn tied_prefix(keys: &[Key]) -> Option<Predicate> {
    keys.iter()
        .map(|(name, _, value)| Predicate::equals(*name, (*value).clone()))
        .reduce(Predicate::and)
}

fn expanded(keys: &[Key], direction: PaginationDirection) -> Option<Predicate> {
    keys.iter()
        .enumerate()
        .map(|(k, &(name, column, value))| {
            let step = Predicate::compare(name, comparator(direction, column), value.clone());
            match tied_prefix(&keys[..k]) {
                Some(prefix) => prefix.and(step),
                None => step,
            }
        })
        .reduce(Predicate::or)
}

fn accumulated(keys: &[Key], direction: PaginationDirection) -> Option<Predicate> {
    let slot = |k: usize| match k + 1 == keys.len() {
        true => ColumnSlot::Terminal,
        false => ColumnSlot::Intermediate,
    };

    let &(name, column, value) = keys.first()?;
    let (op, _) = operators(direction, column, slot(0));
    let mut predicate = Predicate::compare(name, op, value.clone());

    for (k, &(name, column, value)) in keys.iter().enumerate().skip(1) {
        let (_, opposite) = operators(direction, column, slot(k));
        let violation = Predicate::compare(name, opposite, value.clone());
        let tie = match tied_prefix(&keys[..k]) {
            Some(prefix) => prefix.and(violation),
            None => violation,
        };
        predicate = predicate.and(!tie);
    }
    Some(predicate)
}
