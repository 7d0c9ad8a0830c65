//! # Shortcut Expansion
//!
//! Convenience input forms expanded into canonical fields before
//! derivation: positional untyped arguments, named ticker prices, and
//! percentage-of-balance strings.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::fields::value::RawValue;
use crate::domain::fields::{EntityTag, Field};
use crate::domain::value_objects::pair::Pair;
use crate::domain::value_objects::ticker::PricePoint;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A shortcut extracted from a patch, resolved against the collaborator
/// once enough context (market/account/pair/side) is derivable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Shortcut {
    /// A price given as `"bid"`, `"ask"`, `"last"`, or `"mid"`.
    TickerPrice(PricePoint),
    /// An amount-like field given as a percentage of a balance:
    /// `"50%"` is half the balance, `"+1%"`/`"-1%"` are the balance
    /// scaled by 1.01/0.99.
    BalancePercentage {
        /// The field the expanded value lands on.
        field: Field,
        /// The multiplier applied to the balance.
        multiplier: Decimal,
    },
}

/// Classifies a positional value onto a field of the entity's schema.
///
/// Orders accept a pair (value or text), a side, an order type, a
/// context, or a market; offers accept an instrument (value or bare
/// text), an offer side, an offer type, or a market. Anything else is
/// ambiguous.
pub(crate) fn classify_arg(entity: EntityTag, raw: &RawValue) -> DomainResult<Field> {
    match (entity, raw) {
        (_, RawValue::Market(_)) => Ok(Field::Market),
        (EntityTag::Order, RawValue::Pair(_)) => Ok(Field::Pair),
        (EntityTag::Order, RawValue::Text(t)) => classify_order_text(t),
        (EntityTag::Offer, RawValue::Instrument(_)) => Ok(Field::Instrument),
        (EntityTag::Offer, RawValue::Text(t)) => classify_offer_text(t),
        _ => Err(DomainError::AmbiguousArgument(raw.describe())),
    }
}

fn classify_order_text(text: &str) -> DomainResult<Field> {
    use crate::domain::value_objects::enums::{OrderKind, Side, TradeContext};

    if Side::from_str(text).is_ok() {
        return Ok(Field::Side);
    }
    if OrderKind::from_str(text).is_ok() {
        return Ok(Field::Kind);
    }
    if TradeContext::from_str(text).is_ok() {
        return Ok(Field::Context);
    }
    if Pair::from_str(text).is_ok() {
        return Ok(Field::Pair);
    }
    Err(DomainError::AmbiguousArgument(format!("text `{text}`")))
}

fn classify_offer_text(text: &str) -> DomainResult<Field> {
    use crate::domain::value_objects::enums::{OfferKind, OfferSide};

    if OfferSide::from_str(text).is_ok() {
        return Ok(Field::Side);
    }
    if OfferKind::from_str(text).is_ok() {
        return Ok(Field::Kind);
    }
    // A bare code names the funding instrument.
    if !text.trim().is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Ok(Field::Instrument);
    }
    Err(DomainError::AmbiguousArgument(format!("text `{text}`")))
}

/// Splits shortcut spellings out of the sanitizable named fields.
///
/// Returns the extracted shortcuts; the corresponding entries are
/// removed from `named` so sanitation never sees them.
pub(crate) fn extract(entity: EntityTag, named: &mut Vec<(Field, RawValue)>) -> Vec<Shortcut> {
    let mut shortcuts = Vec::new();
    named.retain(|(field, raw)| {
        let RawValue::Text(text) = raw else {
            return true;
        };
        match (entity, *field) {
            (EntityTag::Order, Field::Price) => {
                if let Ok(point) = text.parse::<PricePoint>() {
                    shortcuts.push(Shortcut::TickerPrice(point));
                    return false;
                }
                true
            }
            (EntityTag::Order, Field::Input | Field::Amount)
            | (EntityTag::Offer, Field::Amount) => {
                if let Some(multiplier) = parse_percentage(text) {
                    shortcuts.push(Shortcut::BalancePercentage {
                        field: *field,
                        multiplier,
                    });
                    return false;
                }
                true
            }
            _ => true,
        }
    });
    shortcuts
}

/// Parses a percentage string into a balance multiplier.
///
/// `"50%"` → `0.50`; `"+1%"` → `1.01`; `"-1%"` → `0.99`.
pub(crate) fn parse_percentage(raw: &str) -> Option<Decimal> {
    let body = raw.trim().strip_suffix('%')?;
    let hundred = Decimal::new(100, 0);
    if let Some(rest) = body.strip_prefix('+') {
        let pct: Decimal = rest.trim().parse().ok()?;
        Decimal::ONE.checked_add(pct.checked_div(hundred)?)
    } else if let Some(rest) = body.strip_prefix('-') {
        let pct: Decimal = rest.trim().parse().ok()?;
        Decimal::ONE.checked_sub(pct.checked_div(hundred)?)
    } else {
        let pct: Decimal = body.trim().parse().ok()?;
        pct.checked_div(hundred)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    mod percentages {
        use super::*;

        #[test]
        fn plain_percentage_is_a_fraction() {
            assert_eq!(parse_percentage("50%"), Some(dec("0.5")));
            assert_eq!(parse_percentage("100%"), Some(dec("1")));
        }

        #[test]
        fn signed_percentages_scale_around_one() {
            assert_eq!(parse_percentage("+1%"), Some(dec("1.01")));
            assert_eq!(parse_percentage("-1%"), Some(dec("0.99")));
        }

        #[test]
        fn non_percentages_do_not_parse() {
            assert_eq!(parse_percentage("50"), None);
            assert_eq!(parse_percentage("half%"), None);
        }
    }

    mod classification {
        use super::*;

        #[test]
        fn order_args_classify_by_shape() {
            assert_eq!(
                classify_arg(EntityTag::Order, &"buy".into()).unwrap(),
                Field::Side
            );
            assert_eq!(
                classify_arg(EntityTag::Order, &"limit".into()).unwrap(),
                Field::Kind
            );
            assert_eq!(
                classify_arg(EntityTag::Order, &"margin".into()).unwrap(),
                Field::Context
            );
            assert_eq!(
                classify_arg(EntityTag::Order, &"BTC/USD".into()).unwrap(),
                Field::Pair
            );
        }

        #[test]
        fn offer_args_classify_by_shape() {
            assert_eq!(
                classify_arg(EntityTag::Offer, &"lend".into()).unwrap(),
                Field::Side
            );
            assert_eq!(
                classify_arg(EntityTag::Offer, &"hidden".into()).unwrap(),
                Field::Kind
            );
            assert_eq!(
                classify_arg(EntityTag::Offer, &"USD".into()).unwrap(),
                Field::Instrument
            );
        }

        #[test]
        fn numbers_are_ambiguous() {
            let err = classify_arg(EntityTag::Order, &RawValue::Num(dec("2"))).unwrap_err();
            assert!(matches!(err, DomainError::AmbiguousArgument(_)));
        }
    }

    mod extraction {
        use super::*;

        #[test]
        fn ticker_price_spellings_are_extracted() {
            let mut named = vec![
                (Field::Price, RawValue::from("mid")),
                (Field::Amount, RawValue::from("2")),
            ];
            let shortcuts = extract(EntityTag::Order, &mut named);
            assert_eq!(shortcuts, vec![Shortcut::TickerPrice(PricePoint::Mid)]);
            assert_eq!(named.len(), 1);
        }

        #[test]
        fn percentage_inputs_are_extracted() {
            let mut named = vec![(Field::Input, RawValue::from("50%"))];
            let shortcuts = extract(EntityTag::Order, &mut named);
            assert_eq!(
                shortcuts,
                vec![Shortcut::BalancePercentage {
                    field: Field::Input,
                    multiplier: dec("0.5"),
                }]
            );
            assert!(named.is_empty());
        }

        #[test]
        fn ordinary_text_is_left_for_sanitation() {
            let mut named = vec![(Field::Price, RawValue::from("1000"))];
            let shortcuts = extract(EntityTag::Order, &mut named);
            assert!(shortcuts.is_empty());
            assert_eq!(named.len(), 1);
        }
    }
}
