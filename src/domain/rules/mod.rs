//! # Derivation Rules
//!
//! The per-field derivation rule tables of Order and Offer.
//!
//! Every schema field carries an ordered list of rules; a rule computes
//! the field from a specific combination of other fields and declines
//! (returns `Ok(None)`) when its prerequisites are absent. The resolver
//! tries rules in the stated order and the first success wins.
//!
//! Numeric results pass through market-limit rounding (`round_down` at
//! the field's limit precision, `round_significant` at its
//! significant-digit count) and then through the owning instrument's
//! precision where one is set.

pub mod offer;
pub mod order;

use crate::domain::errors::DomainResult;
use crate::domain::fields::value::FieldValue;
use crate::domain::fields::{EntityTag, Field, FieldMap};
use crate::domain::value_objects::arithmetic::{round_down, round_significant};
use crate::domain::value_objects::enums::Side;
use crate::domain::value_objects::instrument::Instrument;
use crate::domain::value_objects::market::{LimitBand, MarketCatalog};
use crate::domain::value_objects::pair::Pair;
use rust_decimal::Decimal;

/// Evaluation context handed to every rule: the current combined field
/// set plus the read-only market catalog.
pub struct RuleCtx<'a> {
    /// The combined (supplied ∪ derived) field set so far.
    pub map: &'a FieldMap,
    /// Market lookup for derivation of the market field.
    pub catalog: &'a MarketCatalog,
}

/// A single derivation rule.
///
/// Returns `Ok(None)` when prerequisites are missing or a guard does
/// not match; `Ok(Some(value))` on success; `Err` only for genuine
/// domain failures (division by zero, overflow).
pub type Rule = fn(&RuleCtx<'_>) -> DomainResult<Option<FieldValue>>;

/// The schema of one entity kind: its field set, rule tables, priority
/// re-derivation triangle, and post-loop defaults.
pub struct EntitySchema {
    /// Which entity this schema describes.
    pub entity: EntityTag,
    /// Canonical field set, in derivation-pass order.
    pub fields: &'static [Field],
    /// Fields recomputed one final time after the loop, so the direct
    /// amount/price/side triangle wins over longer chains.
    pub priority: &'static [Field],
    /// Defaults inserted after the loop for fields no rule could decide
    /// mid-iteration.
    pub post_defaults: &'static [(Field, FieldValue)],
    rules: fn(Field) -> &'static [Rule],
}

impl EntitySchema {
    /// Returns true if the field belongs to this schema.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    /// The ordered rule list of a field; empty for supplied-only
    /// fields.
    #[must_use]
    pub fn rules_for(&self, field: Field) -> &'static [Rule] {
        (self.rules)(field)
    }

    /// The Order schema.
    #[must_use]
    pub fn order() -> &'static Self {
        &order::SCHEMA
    }

    /// The Offer schema.
    #[must_use]
    pub fn offer() -> &'static Self {
        &offer::SCHEMA
    }
}

/// Applies limit-band and instrument-precision rounding to a freshly
/// derived numeric value.
///
/// # Errors
///
/// Propagates arithmetic failures from significant-digit rounding.
pub(crate) fn round_numeric(
    entity: EntityTag,
    field: Field,
    value: Decimal,
    map: &FieldMap,
) -> DomainResult<Decimal> {
    let mut value = value;

    if let Some(band) = limit_band(field, map) {
        if let Some(precision) = band.precision {
            value = round_down(value, precision);
        }
        if let Some(digits) = band.significant_digits {
            value = round_significant(value, digits)?;
        }
    }

    if let Some(precision) = instrument_precision(entity, field, map) {
        value = round_down(value, precision);
    }

    Ok(value)
}

/// The market limit band governing a field, if the market is known.
fn limit_band(field: Field, map: &FieldMap) -> Option<LimitBand> {
    let limits = map.market()?.limits();
    match field {
        Field::Amount => Some(limits.amount),
        Field::Price => Some(limits.price),
        Field::Total => Some(limits.total),
        Field::Duration => Some(limits.duration),
        Field::DailyRate | Field::MonthlyRate | Field::AnnualRate => Some(limits.daily_rate),
        _ => None,
    }
}

/// The precision of the instrument a numeric field is denominated in,
/// where that instrument is resolvable from the current field set.
fn instrument_precision(entity: EntityTag, field: Field, map: &FieldMap) -> Option<u32> {
    match entity {
        EntityTag::Order => {
            let pair = map.pair()?;
            let instrument = match field {
                Field::Amount => Some(pair.base()),
                Field::Total => Some(pair.quote()),
                Field::Fees => denominating(map, Field::FeeInstrument, pair),
                Field::Input => denominating(map, Field::InputInstrument, pair),
                Field::Gross | Field::Net | Field::Output => {
                    denominating(map, Field::OutputInstrument, pair)
                }
                _ => None,
            };
            instrument.and_then(Instrument::precision)
        }
        EntityTag::Offer => {
            let instrument = map.instrument(Field::Instrument)?;
            match field {
                Field::Amount | Field::Gross | Field::Net | Field::Fees => instrument.precision(),
                _ => None,
            }
        }
    }
}

/// Resolves the instrument a side-dependent field is denominated in,
/// preferring the already-derived instrument field over recomputing
/// from side. An instrument field set to a pair side resolves to the
/// pair's own instance, whose precision comes from the catalog.
fn denominating<'a>(map: &'a FieldMap, instrument_field: Field, pair: &'a Pair) -> Option<&'a Instrument> {
    if let Some(instrument) = map.instrument(instrument_field) {
        if pair.base() == instrument {
            return Some(pair.base());
        }
        if pair.quote() == instrument {
            return Some(pair.quote());
        }
        return Some(instrument);
    }
    let side = map.side()?;
    Some(match (instrument_field, side) {
        (Field::InputInstrument, Side::Buy) => pair.quote(),
        (Field::InputInstrument, Side::Sell) => pair.base(),
        (_, Side::Buy) => pair.base(),
        (_, Side::Sell) => pair.quote(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::fields::Provenance;
    use crate::domain::value_objects::market::{Limits, Market};
    use crate::domain::value_objects::pair::Pair;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn map_with_market(amount_precision: u32) -> FieldMap {
        let pair: Pair = "BTC/USD".parse().unwrap();
        let mut market = Market::spot(pair.clone(), "bitfinex");
        let mut limits = Limits::default();
        limits.amount = LimitBand::with_precision(amount_precision);
        market.merge_limits(&limits);

        let mut map = FieldMap::new();
        map.insert(Field::Pair, FieldValue::Pair(pair), Provenance::Supplied);
        map.insert(Field::Market, FieldValue::Market(market), Provenance::Supplied);
        map
    }

    #[test]
    fn amount_rounds_down_to_market_precision() {
        let map = map_with_market(2);
        let rounded =
            round_numeric(EntityTag::Order, Field::Amount, dec("1.23999"), &map).unwrap();
        assert_eq!(rounded, dec("1.23"));
    }

    #[test]
    fn amount_also_rounds_to_base_instrument_precision() {
        let pair = Pair::new(
            crate::domain::value_objects::instrument::Instrument::with_precision("BTC", 3)
                .unwrap(),
            crate::domain::value_objects::instrument::Instrument::new("USD").unwrap(),
        )
        .unwrap();
        let mut map = FieldMap::new();
        map.insert(Field::Pair, FieldValue::Pair(pair), Provenance::Supplied);

        let rounded =
            round_numeric(EntityTag::Order, Field::Amount, dec("1.23999"), &map).unwrap();
        assert_eq!(rounded, dec("1.239"));
    }

    #[test]
    fn unbanded_fields_pass_through() {
        let map = map_with_market(2);
        let value = dec("0.123456789");
        assert_eq!(
            round_numeric(EntityTag::Order, Field::FeePercentage, value, &map).unwrap(),
            value
        );
    }

    #[test]
    fn significant_digits_apply_after_precision() {
        let pair: Pair = "BTC/USD".parse().unwrap();
        let mut market = Market::spot(pair.clone(), "bitfinex");
        let mut limits = Limits::default();
        limits.price.significant_digits = Some(5);
        market.merge_limits(&limits);

        let mut map = FieldMap::new();
        map.insert(Field::Pair, FieldValue::Pair(pair), Provenance::Supplied);
        map.insert(Field::Market, FieldValue::Market(market), Provenance::Supplied);

        let rounded =
            round_numeric(EntityTag::Order, Field::Price, dec("1234.5678"), &map).unwrap();
        assert_eq!(rounded, dec("1234.6"));
    }
}
