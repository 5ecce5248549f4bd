//! Read-only, chainable views over dataset records

use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom, index},
};
use tracing::{debug, warn};

use super::{FieldValue, Predicate, StateRecord};

/// Immutable view over a subsequence of records.
///
/// A view only borrows records; narrowing produces a new view and never
/// copies or mutates the records themselves.
#[derive(Debug, Clone, Default)]
pub struct StateView<'a> {
    items: Vec<&'a StateRecord>,
}

impl<'a> StateView<'a> {
    pub fn new<I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a StateRecord>,
    {
        StateView {
            items: items.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn records(&self) -> &[&'a StateRecord] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a StateRecord> + '_ {
        self.items.iter().copied()
    }

    /// Keep records where every named field equals the given value.
    ///
    /// A record lacking one of the fields simply does not match. With no
    /// criteria the view is returned unchanged.
    pub fn filter(&self, criteria: &[(&str, FieldValue)]) -> StateView<'a> {
        let items = self
            .items
            .iter()
            .copied()
            .filter(|record| {
                criteria.iter().all(|(name, expected)| {
                    record
                        .field(name)
                        .is_some_and(|actual| actual.matches(expected))
                })
            })
            .collect();
        StateView { items }
    }

    /// Keep records for which a fallible predicate holds, stopping at the
    /// first fault.
    ///
    /// # Errors
    ///
    /// Returns the first error the predicate produces.
    pub fn try_where<F>(&self, predicate: F) -> crate::Result<StateView<'a>>
    where
        F: Fn(&StateRecord) -> crate::Result<bool>,
    {
        let mut items = Vec::with_capacity(self.items.len());
        for &record in &self.items {
            if predicate(record)? {
                items.push(record);
            }
        }
        debug!(before = self.items.len(), after = items.len(), "narrowed view");
        Ok(StateView { items })
    }

    /// Keep records for which a fallible predicate holds.
    ///
    /// If the predicate fails on any record the whole narrowing step is
    /// abandoned with a warning and the view is returned unchanged.
    pub fn where_by<F>(&self, predicate: F) -> StateView<'a>
    where
        F: Fn(&StateRecord) -> crate::Result<bool>,
    {
        self.try_where(predicate).unwrap_or_else(|e| {
            warn!(error = %e, "predicate failed; view left unchanged");
            self.clone()
        })
    }

    /// Narrow with a parsed [`Predicate`]; faults behave as in [`where_by`](Self::where_by).
    pub fn where_expr(&self, predicate: &Predicate) -> StateView<'a> {
        self.where_by(|record| predicate.evaluate(record))
    }

    /// Draw `k` records uniformly at random.
    ///
    /// With replacement, records may repeat. Without replacement, asking for
    /// more records than the view holds returns every record in random order
    /// and logs a warning. An empty view yields an empty result with a
    /// warning.
    pub fn sample<R>(&self, k: usize, with_replacement: bool, rng: &mut R) -> Vec<&'a StateRecord>
    where
        R: Rng + ?Sized,
    {
        if self.items.is_empty() {
            warn!(k, "sampling from an empty view");
            return Vec::new();
        }

        if with_replacement {
            return (0..k)
                .filter_map(|_| self.items.choose(rng).copied())
                .collect();
        }

        if k > self.items.len() {
            warn!(
                requested = k,
                available = self.items.len(),
                "not enough records to sample without replacement; returning all records"
            );
            let mut all = self.items.clone();
            all.shuffle(rng);
            return all;
        }

        index::sample(rng, self.items.len(), k)
            .into_iter()
            .map(|i| self.items[i])
            .collect()
    }
}

impl<'s, 'a> IntoIterator for &'s StateView<'a> {
    type Item = &'a StateRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'s, &'a StateRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().copied()
    }
}
