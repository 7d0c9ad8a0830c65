//! # Offer Derivation Rules
//!
//! The rule table for margin-funding offers.
//!
//! Rates are fractions per day; the three encodings are mutually
//! derivable (`monthly = daily × 30`, `annual = daily × 365`). Gross is
//! the interest earned over the term: `amount × daily_rate × duration`.

use crate::domain::errors::DomainResult;
use crate::domain::fields::value::FieldValue;
use crate::domain::fields::{EntityTag, Field, OFFER_FIELDS};
use crate::domain::rules::{EntitySchema, Rule, RuleCtx};
use crate::domain::value_objects::arithmetic::{divide, multiply, subtract};
use crate::domain::value_objects::enums::OfferKind;
use rust_decimal::Decimal;

/// The Offer schema: field set, rule tables, priority triangle, and
/// post-loop defaults.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: EntityTag::Offer,
    fields: OFFER_FIELDS,
    priority: &[Field::Amount, Field::DailyRate, Field::Side],
    post_defaults: &[(Field::Kind, FieldValue::OfferKind(OfferKind::Normal))],
    rules: rules_for,
};

fn rules_for(field: Field) -> &'static [Rule] {
    match field {
        Field::DailyRate => &[daily_from_monthly, daily_from_annual],
        Field::MonthlyRate => &[monthly_from_daily],
        Field::AnnualRate => &[annual_from_daily],
        Field::Gross => &[gross_from_term],
        Field::Net => &[net_from_fees, net_from_fee_percentage],
        Field::Fees => &[fees_from_fee_percentage, fees_from_net],
        Field::FeePercentage => &[fee_percentage_from_fees, fee_percentage_from_market],
        Field::Instrument => &[instrument_from_market],
        Field::Market => &[market_from_catalog],
        Field::Exchange => &[exchange_from_market],
        _ => &[],
    }
}

const ONE: Decimal = Decimal::ONE;
const DAYS_PER_MONTH: Decimal = Decimal::from_parts(30, 0, 0, false, 0);
const DAYS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

fn num(value: Decimal) -> DomainResult<Option<FieldValue>> {
    Ok(Some(FieldValue::Num(value)))
}

// rate encodings

fn daily_from_monthly(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match ctx.map.num(Field::MonthlyRate) {
        Some(monthly) => num(divide(monthly, DAYS_PER_MONTH)?),
        None => Ok(None),
    }
}

fn daily_from_annual(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match ctx.map.num(Field::AnnualRate) {
        Some(annual) => num(divide(annual, DAYS_PER_YEAR)?),
        None => Ok(None),
    }
}

fn monthly_from_daily(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match ctx.map.num(Field::DailyRate) {
        Some(daily) => num(multiply(daily, DAYS_PER_MONTH)?),
        None => Ok(None),
    }
}

fn annual_from_daily(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match ctx.map.num(Field::DailyRate) {
        Some(daily) => num(multiply(daily, DAYS_PER_YEAR)?),
        None => Ok(None),
    }
}

// economics

fn gross_from_term(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (
        ctx.map.num(Field::Amount),
        ctx.map.num(Field::DailyRate),
        ctx.map.num(Field::Duration),
    ) {
        (Some(amount), Some(daily), Some(duration)) => {
            num(multiply(multiply(amount, daily)?, duration)?)
        }
        _ => Ok(None),
    }
}

fn net_from_fees(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Gross), ctx.map.num(Field::Fees)) {
        (Some(gross), Some(fees)) => num(subtract(gross, fees)?),
        _ => Ok(None),
    }
}

fn net_from_fee_percentage(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Gross), ctx.map.num(Field::FeePercentage)) {
        (Some(gross), Some(pct)) => num(multiply(gross, subtract(ONE, pct)?)?),
        _ => Ok(None),
    }
}

fn fees_from_fee_percentage(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Gross), ctx.map.num(Field::FeePercentage)) {
        (Some(gross), Some(pct)) => num(multiply(gross, pct)?),
        _ => Ok(None),
    }
}

fn fees_from_net(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Gross), ctx.map.num(Field::Net)) {
        (Some(gross), Some(net)) => num(subtract(gross, net)?),
        _ => Ok(None),
    }
}

fn fee_percentage_from_fees(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Fees), ctx.map.num(Field::Gross)) {
        (Some(fees), Some(gross)) => num(divide(fees, gross)?),
        _ => Ok(None),
    }
}

/// A visible offer pays the normal rate, a hidden one the hidden rate.
fn fee_percentage_from_market(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    let (Some(market), Some(kind)) = (ctx.map.market(), ctx.map.offer_kind()) else {
        return Ok(None);
    };
    let fees = market.fees();
    let pct = match kind {
        OfferKind::Normal => fees.normal,
        OfferKind::Hidden => fees.hidden,
    };
    Ok(pct.map(FieldValue::Num))
}

// identity

fn instrument_from_market(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    Ok(ctx
        .map
        .market()
        .and_then(|market| market.instrument())
        .cloned()
        .map(FieldValue::Instrument))
}

fn market_from_catalog(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    let (Some(instrument), Some(exchange)) = (
        ctx.map.instrument(Field::Instrument),
        ctx.map.text(Field::Exchange),
    ) else {
        return Ok(None);
    };
    Ok(ctx
        .catalog
        .funding_market(exchange, instrument)
        .cloned()
        .map(FieldValue::Market))
}

fn exchange_from_market(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    Ok(ctx
        .map
        .market()
        .map(|market| FieldValue::Text(market.exchange().to_string())))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::fields::{FieldMap, Provenance};
    use crate::domain::value_objects::market::MarketCatalog;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn daily_rate_prefers_monthly_over_annual() {
        let mut map = FieldMap::new();
        map.insert(
            Field::MonthlyRate,
            FieldValue::Num(dec("0.6")),
            Provenance::Supplied,
        );
        map.insert(
            Field::AnnualRate,
            FieldValue::Num(dec("36.5")),
            Provenance::Supplied,
        );
        let catalog = MarketCatalog::new();
        let ctx = RuleCtx {
            map: &map,
            catalog: &catalog,
        };

        let rules = rules_for(Field::DailyRate);
        assert_eq!(rules[0](&ctx).unwrap(), Some(FieldValue::Num(dec("0.02"))));
    }

    #[test]
    fn rate_encodings_are_mutually_consistent() {
        let mut map = FieldMap::new();
        map.insert(
            Field::DailyRate,
            FieldValue::Num(dec("0.0002")),
            Provenance::Supplied,
        );
        let catalog = MarketCatalog::new();
        let ctx = RuleCtx {
            map: &map,
            catalog: &catalog,
        };

        assert_eq!(
            monthly_from_daily(&ctx).unwrap(),
            Some(FieldValue::Num(dec("0.006")))
        );
        assert_eq!(
            annual_from_daily(&ctx).unwrap(),
            Some(FieldValue::Num(dec("0.073")))
        );
    }

    #[test]
    fn gross_is_interest_over_the_term() {
        let mut map = FieldMap::new();
        map.insert(
            Field::Amount,
            FieldValue::Num(dec("1000")),
            Provenance::Supplied,
        );
        map.insert(
            Field::DailyRate,
            FieldValue::Num(dec("0.0002")),
            Provenance::Supplied,
        );
        map.insert(
            Field::Duration,
            FieldValue::Num(dec("30")),
            Provenance::Supplied,
        );
        let catalog = MarketCatalog::new();
        let ctx = RuleCtx {
            map: &map,
            catalog: &catalog,
        };

        assert_eq!(gross_from_term(&ctx).unwrap(), Some(FieldValue::Num(dec("6"))));
    }

    #[test]
    fn hidden_offers_take_the_hidden_rate() {
        use crate::domain::value_objects::instrument::Instrument;
        use crate::domain::value_objects::market::{FeeSchedule, Market};

        let mut market = Market::funding(Instrument::new("USD").unwrap(), "bitfinex");
        market.merge_fees(&FeeSchedule::funding(dec("0.15"), dec("0.18")));

        let mut map = FieldMap::new();
        map.insert(Field::Market, FieldValue::Market(market), Provenance::Supplied);
        map.insert(
            Field::Kind,
            FieldValue::OfferKind(OfferKind::Hidden),
            Provenance::Supplied,
        );
        let catalog = MarketCatalog::new();
        let ctx = RuleCtx {
            map: &map,
            catalog: &catalog,
        };

        assert_eq!(
            fee_percentage_from_market(&ctx).unwrap(),
            Some(FieldValue::Num(dec("0.18")))
        );
    }
}
