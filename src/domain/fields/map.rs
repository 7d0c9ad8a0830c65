//! # Field Map and Patch
//!
//! The provenance-tagged attribute set of a resolved entity, and the
//! mutation input fed into the resolver.
//!
//! A [`FieldMap`] is a single ordered map of field → (value,
//! provenance); a field moves from derived to supplied exactly when a
//! caller or an exchange response sets it, and the derived copy is
//! discarded at that point — the two provenances never coexist for one
//! field.
//!
//! A [`FieldPatch`] collects the new facts of one call: named fields
//! (typed or string-keyed) plus positional shortcut values classified
//! by the resolver.

use crate::domain::fields::value::{FieldValue, RawValue};
use crate::domain::fields::Field;
use crate::domain::value_objects::enums::{OfferKind, OfferSide, OrderKind, Side, TradeContext};
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::market::Market;
use crate::domain::value_objects::pair::Pair;
use crate::domain::value_objects::timestamp::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Where a field's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Explicitly given by the caller or confirmed by an exchange
    /// response.
    Supplied,
    /// Computed by the resolver from other fields.
    Derived,
}

/// One ordered map of field → (value, provenance).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    entries: BTreeMap<Field, (FieldValue, Provenance)>,
}

impl FieldMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the visible value of a field, whatever its provenance.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.entries.get(&field).map(|(value, _)| value)
    }

    /// Returns the provenance of a field, if present.
    #[must_use]
    pub fn provenance(&self, field: Field) -> Option<Provenance> {
        self.entries.get(&field).map(|(_, provenance)| *provenance)
    }

    /// Returns true if the field is present with either provenance.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.entries.contains_key(&field)
    }

    /// Inserts a value, replacing any previous entry for the field.
    pub fn insert(&mut self, field: Field, value: FieldValue, provenance: Provenance) {
        self.entries.insert(field, (value, provenance));
    }

    /// Removes a field entirely.
    pub fn remove(&mut self, field: Field) -> Option<FieldValue> {
        self.entries.remove(&field).map(|(value, _)| value)
    }

    /// Returns a map holding only the supplied entries.
    ///
    /// This is the re-resolution input: derived values are recomputed
    /// from scratch on every resolve so they can never go stale.
    #[must_use]
    pub fn supplied_only(&self) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(_, (_, provenance))| *provenance == Provenance::Supplied)
                .map(|(field, entry)| (*field, entry.clone()))
                .collect(),
        }
    }

    /// Iterates all entries in field order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue, Provenance)> {
        self.entries
            .iter()
            .map(|(field, (value, provenance))| (*field, value, *provenance))
    }

    /// Number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no field is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Structural hash of the full field set.
    ///
    /// The derivation loop compares this between passes to detect the
    /// fixed point.
    #[must_use]
    pub fn structural_hash(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for (field, (value, _)) in &self.entries {
            field.hash(&mut hasher);
            value.hash(&mut hasher);
        }
        hasher.finish()
    }

    // Typed getters used by derivation rules and entity accessors.

    /// Numeric value of a field.
    #[must_use]
    pub fn num(&self, field: Field) -> Option<Decimal> {
        self.get(field).and_then(FieldValue::as_num)
    }

    /// Boolean value of a field.
    #[must_use]
    pub fn flag(&self, field: Field) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_flag)
    }

    /// Text value of a field.
    #[must_use]
    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Buy/sell side of an order map.
    #[must_use]
    pub fn side(&self) -> Option<Side> {
        self.get(Field::Side).and_then(FieldValue::as_side)
    }

    /// Lend/borrow side of an offer map.
    #[must_use]
    pub fn offer_side(&self) -> Option<OfferSide> {
        self.get(Field::Side).and_then(FieldValue::as_offer_side)
    }

    /// Limit/market kind of an order map.
    #[must_use]
    pub fn order_kind(&self) -> Option<OrderKind> {
        self.get(Field::Kind).and_then(FieldValue::as_order_kind)
    }

    /// Normal/hidden kind of an offer map.
    #[must_use]
    pub fn offer_kind(&self) -> Option<OfferKind> {
        self.get(Field::Kind).and_then(FieldValue::as_offer_kind)
    }

    /// Spot/margin context of an order map.
    #[must_use]
    pub fn context(&self) -> Option<TradeContext> {
        self.get(Field::Context).and_then(FieldValue::as_context)
    }

    /// The trading pair.
    #[must_use]
    pub fn pair(&self) -> Option<&Pair> {
        self.get(Field::Pair).and_then(FieldValue::as_pair)
    }

    /// An instrument-valued field.
    #[must_use]
    pub fn instrument(&self, field: Field) -> Option<&Instrument> {
        self.get(field).and_then(FieldValue::as_instrument)
    }

    /// The market.
    #[must_use]
    pub fn market(&self) -> Option<&Market> {
        self.get(Field::Market).and_then(FieldValue::as_market)
    }

    /// A timestamp-valued field.
    #[must_use]
    pub fn timestamp(&self, field: Field) -> Option<Timestamp> {
        self.get(field).and_then(FieldValue::as_timestamp)
    }
}

/// The new facts of one resolution call.
///
/// Built fluently; conflicts (the same logical field twice, e.g. via a
/// positional shortcut and a keyword) are detected by the resolver when
/// the patch is classified.
///
/// # Examples
///
/// ```
/// use trade_resolver::domain::fields::{Field, FieldPatch};
///
/// let patch = FieldPatch::new()
///     .arg("BTC/USD")
///     .arg("buy")
///     .set(Field::Amount, 2)
///     .set_name("price", 1000);
/// assert_eq!(patch.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    named: Vec<(String, RawValue)>,
    args: Vec<RawValue>,
}

impl FieldPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field by its typed name.
    #[must_use]
    pub fn set(mut self, field: Field, value: impl Into<RawValue>) -> Self {
        self.named.push((field.name().to_string(), value.into()));
        self
    }

    /// Sets a field by its wire name; unknown names surface as
    /// `UnknownField` when the patch is resolved.
    #[must_use]
    pub fn set_name(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    /// Removes a field: an explicit null is merged as a removal.
    #[must_use]
    pub fn unset(mut self, field: Field) -> Self {
        self.named.push((field.name().to_string(), RawValue::Null));
        self
    }

    /// Adds a positional shortcut value, classified onto a field by the
    /// resolver ("buy" → side, "BTC/USD" → pair, ...).
    #[must_use]
    pub fn arg(mut self, value: impl Into<RawValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Number of entries (named and positional).
    #[must_use]
    pub fn len(&self) -> usize {
        self.named.len() + self.args.len()
    }

    /// Returns true if the patch carries nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.args.is_empty()
    }

    pub(crate) fn named(&self) -> &[(String, RawValue)] {
        &self.named
    }

    pub(crate) fn args(&self) -> &[RawValue] {
        &self.args
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn num(s: &str) -> FieldValue {
        FieldValue::Num(s.parse().unwrap())
    }

    mod field_map {
        use super::*;

        #[test]
        fn supplied_wins_by_replacement() {
            let mut map = FieldMap::new();
            map.insert(Field::Amount, num("1"), Provenance::Derived);
            map.insert(Field::Amount, num("2"), Provenance::Supplied);

            assert_eq!(map.num(Field::Amount), Some("2".parse().unwrap()));
            assert_eq!(map.provenance(Field::Amount), Some(Provenance::Supplied));
            assert_eq!(map.len(), 1);
        }

        #[test]
        fn supplied_only_drops_derived() {
            let mut map = FieldMap::new();
            map.insert(Field::Amount, num("1"), Provenance::Supplied);
            map.insert(Field::Total, num("2"), Provenance::Derived);

            let supplied = map.supplied_only();
            assert!(supplied.contains(Field::Amount));
            assert!(!supplied.contains(Field::Total));
        }

        #[test]
        fn structural_hash_tracks_values() {
            let mut a = FieldMap::new();
            a.insert(Field::Amount, num("1"), Provenance::Supplied);
            let before = a.structural_hash();

            let unchanged = a.structural_hash();
            assert_eq!(before, unchanged);

            a.insert(Field::Price, num("10"), Provenance::Derived);
            assert_ne!(before, a.structural_hash());
        }

        #[test]
        fn hash_ignores_provenance() {
            let mut a = FieldMap::new();
            a.insert(Field::Amount, num("1"), Provenance::Supplied);
            let mut b = FieldMap::new();
            b.insert(Field::Amount, num("1"), Provenance::Derived);
            assert_eq!(a.structural_hash(), b.structural_hash());
        }

        #[test]
        fn remove_clears_the_entry() {
            let mut map = FieldMap::new();
            map.insert(Field::Price, num("9"), Provenance::Supplied);
            assert!(map.remove(Field::Price).is_some());
            assert!(map.is_empty());
        }
    }

    mod field_patch {
        use super::*;

        #[test]
        fn collects_named_and_positional_entries() {
            let patch = FieldPatch::new()
                .arg("buy")
                .set(Field::Amount, 2)
                .set_name("price", 1000)
                .unset(Field::Total);
            assert_eq!(patch.len(), 4);
            assert!(!patch.is_empty());
        }

        #[test]
        fn unset_records_a_null() {
            let patch = FieldPatch::new().unset(Field::Price);
            assert_eq!(patch.named()[0].1, RawValue::Null);
        }
    }
}
