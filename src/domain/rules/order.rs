//! # Order Derivation Rules
//!
//! The rule table for trade orders. Within each field the rules are
//! tried top to bottom; the first whose prerequisites are present wins.
//!
//! The economics follow the buy/sell asymmetry: a buy consumes the
//! quote instrument (`input = total`) and produces the base instrument
//! (`gross = amount`), a sell is the mirror image. Fees are charged on
//! what the trade produces.

use crate::domain::errors::DomainResult;
use crate::domain::fields::value::FieldValue;
use crate::domain::fields::{EntityTag, Field, ORDER_FIELDS};
use crate::domain::rules::{EntitySchema, Rule, RuleCtx};
use crate::domain::value_objects::arithmetic::{divide, multiply, subtract};
use crate::domain::value_objects::enums::{OrderKind, Side, TradeContext};
use rust_decimal::Decimal;

/// The Order schema: field set, rule tables, priority triangle, and
/// post-loop defaults.
pub static SCHEMA: EntitySchema = EntitySchema {
    entity: EntityTag::Order,
    fields: ORDER_FIELDS,
    priority: &[Field::Amount, Field::Price, Field::Side],
    post_defaults: &[(Field::Kind, FieldValue::OrderKind(OrderKind::Market))],
    rules: rules_for,
};

fn rules_for(field: Field) -> &'static [Rule] {
    match field {
        Field::Amount => &[amount_from_total_price, amount_from_gross, amount_from_input],
        Field::Price => &[price_from_total_amount],
        Field::Total => &[total_from_amount_price, total_from_input, total_from_gross],
        Field::Side => &[side_from_input_instrument, side_from_output_instrument],
        Field::Gross => &[gross_from_amount, gross_from_total, gross_from_net],
        Field::Net => &[net_from_fees, net_from_fee_percentage],
        Field::Fees => &[fees_from_fee_percentage, fees_from_net],
        Field::FeePercentage => &[fee_percentage_from_fees, fee_percentage_from_market],
        Field::Input => &[input_from_total, input_from_amount],
        Field::Output => &[output_from_net],
        Field::InputInstrument => &[input_instrument_from_side],
        Field::OutputInstrument => &[output_instrument_from_side],
        Field::FeeInstrument => &[fee_instrument_from_side],
        Field::Pair => &[pair_from_market],
        Field::Market => &[market_from_catalog],
        Field::Exchange => &[exchange_from_market],
        Field::Context => &[context_from_market, context_default_spot],
        Field::Kind => &[kind_from_price],
        _ => &[],
    }
}

const ONE: Decimal = Decimal::ONE;

fn num(value: Decimal) -> DomainResult<Option<FieldValue>> {
    Ok(Some(FieldValue::Num(value)))
}

// amount

fn amount_from_total_price(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Total), ctx.map.num(Field::Price)) {
        (Some(total), Some(price)) => num(divide(total, price)?),
        _ => Ok(None),
    }
}

fn amount_from_gross(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.side(), ctx.map.num(Field::Gross)) {
        (Some(Side::Buy), Some(gross)) => num(gross),
        _ => Ok(None),
    }
}

fn amount_from_input(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.side(), ctx.map.num(Field::Input)) {
        (Some(Side::Sell), Some(input)) => num(input),
        _ => Ok(None),
    }
}

// price

fn price_from_total_amount(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Total), ctx.map.num(Field::Amount)) {
        (Some(total), Some(amount)) => num(divide(total, amount)?),
        _ => Ok(None),
    }
}

// total

fn total_from_amount_price(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Amount), ctx.map.num(Field::Price)) {
        (Some(amount), Some(price)) => num(multiply(amount, price)?),
        _ => Ok(None),
    }
}

fn total_from_input(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.side(), ctx.map.num(Field::Input)) {
        (Some(Side::Buy), Some(input)) => num(input),
        _ => Ok(None),
    }
}

fn total_from_gross(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.side(), ctx.map.num(Field::Gross)) {
        (Some(Side::Sell), Some(gross)) => num(gross),
        _ => Ok(None),
    }
}

// side

fn side_from_input_instrument(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    let (Some(instrument), Some(pair)) = (ctx.map.instrument(Field::InputInstrument), ctx.map.pair())
    else {
        return Ok(None);
    };
    if instrument == pair.quote() {
        Ok(Some(FieldValue::Side(Side::Buy)))
    } else if instrument == pair.base() {
        Ok(Some(FieldValue::Side(Side::Sell)))
    } else {
        Ok(None)
    }
}

fn side_from_output_instrument(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    let (Some(instrument), Some(pair)) =
        (ctx.map.instrument(Field::OutputInstrument), ctx.map.pair())
    else {
        return Ok(None);
    };
    if instrument == pair.base() {
        Ok(Some(FieldValue::Side(Side::Buy)))
    } else if instrument == pair.quote() {
        Ok(Some(FieldValue::Side(Side::Sell)))
    } else {
        Ok(None)
    }
}

// gross

fn gross_from_amount(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.side(), ctx.map.num(Field::Amount)) {
        (Some(Side::Buy), Some(amount)) => num(amount),
        _ => Ok(None),
    }
}

fn gross_from_total(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.side(), ctx.map.num(Field::Total)) {
        (Some(Side::Sell), Some(total)) => num(total),
        _ => Ok(None),
    }
}

fn gross_from_net(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Net), ctx.map.num(Field::FeePercentage)) {
        (Some(net), Some(pct)) => num(divide(net, subtract(ONE, pct)?)?),
        _ => Ok(None),
    }
}

// net

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

// fees

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

// fee_percentage

fn fee_percentage_from_fees(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.num(Field::Fees), ctx.map.num(Field::Gross)) {
        (Some(fees), Some(gross)) => num(divide(fees, gross)?),
        _ => Ok(None),
    }
}

/// A visible limit order rests on the book and pays the maker rate; a
/// market or hidden order takes liquidity and pays the taker rate.
fn fee_percentage_from_market(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    let (Some(market), Some(kind)) = (ctx.map.market(), ctx.map.order_kind()) else {
        return Ok(None);
    };
    let hidden = ctx.map.flag(Field::Hidden).unwrap_or(false);
    let fees = market.fees();
    let pct = match kind {
        OrderKind::Limit if !hidden => fees.maker,
        _ => fees.taker,
    };
    Ok(pct.map(FieldValue::Num))
}

// input / output

fn input_from_total(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.side(), ctx.map.num(Field::Total)) {
        (Some(Side::Buy), Some(total)) => num(total),
        _ => Ok(None),
    }
}

fn input_from_amount(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match (ctx.map.side(), ctx.map.num(Field::Amount)) {
        (Some(Side::Sell), Some(amount)) => num(amount),
        _ => Ok(None),
    }
}

fn output_from_net(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    match ctx.map.num(Field::Net) {
        Some(net) => num(net),
        None => Ok(None),
    }
}

// instruments

fn input_instrument_from_side(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    let (Some(side), Some(pair)) = (ctx.map.side(), ctx.map.pair()) else {
        return Ok(None);
    };
    let instrument = match side {
        Side::Buy => pair.quote(),
        Side::Sell => pair.base(),
    };
    Ok(Some(FieldValue::Instrument(instrument.clone())))
}

fn output_instrument_from_side(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    let (Some(side), Some(pair)) = (ctx.map.side(), ctx.map.pair()) else {
        return Ok(None);
    };
    let instrument = match side {
        Side::Buy => pair.base(),
        Side::Sell => pair.quote(),
    };
    Ok(Some(FieldValue::Instrument(instrument.clone())))
}

/// Fees are charged on what the trade produces.
fn fee_instrument_from_side(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    output_instrument_from_side(ctx)
}

// identity

fn pair_from_market(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    Ok(ctx
        .map
        .market()
        .and_then(|market| market.pair())
        .cloned()
        .map(FieldValue::Pair))
}

fn market_from_catalog(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    let (Some(pair), Some(exchange), Some(context)) = (
        ctx.map.pair(),
        ctx.map.text(Field::Exchange),
        ctx.map.context(),
    ) else {
        return Ok(None);
    };
    Ok(ctx
        .catalog
        .pair_market(exchange, pair, context.into())
        .cloned()
        .map(FieldValue::Market))
}

fn exchange_from_market(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    Ok(ctx
        .map
        .market()
        .map(|market| FieldValue::Text(market.exchange().to_string())))
}

fn context_from_market(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    use crate::domain::value_objects::market::MarketContext;
    Ok(ctx.map.market().and_then(|market| match market.context() {
        MarketContext::Spot => Some(FieldValue::Context(TradeContext::Spot)),
        MarketContext::Margin => Some(FieldValue::Context(TradeContext::Margin)),
        MarketContext::Funding => None,
    }))
}

fn context_default_spot(_ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    Ok(Some(FieldValue::Context(TradeContext::Spot)))
}

// type

fn kind_from_price(ctx: &RuleCtx<'_>) -> DomainResult<Option<FieldValue>> {
    Ok(ctx
        .map
        .num(Field::Price)
        .map(|_| FieldValue::OrderKind(OrderKind::Limit)))
}
