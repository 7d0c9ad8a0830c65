//! # Fixed-Point Resolver
//!
//! The attribute-resolution engine: takes the supplied fields of an
//! order or offer plus a patch of new facts, and computes every other
//! attribute by iterating the derivation rules to a fixed point.
//!
//! One resolution runs through, in order:
//!
//! 1. positional-argument classification and shortcut extraction
//! 2. shortcut substitution against the collaborator (named ticker
//!    prices, percentage-of-balance amounts)
//! 3. type sanitation of every incoming field
//! 4. merge into the supplied set (explicit nulls remove)
//! 5. metadata split-off
//! 6. bounded iterative derivation until the structural hash stabilizes
//! 7. fee augmentation from the account's fee schedule, then one more
//!    derivation round
//! 8. priority re-derivation of the amount/price/side triangle
//!
//! The derivation core is pure and synchronous; only substitution and
//! fee augmentation call out, and both degrade gracefully (shortcuts
//! drop, fees stay underived) when no collaborator is configured or a
//! call fails.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use trade_resolver::domain::fields::{Field, FieldMap, FieldPatch};
//! use trade_resolver::domain::resolver::Resolver;
//! use trade_resolver::domain::value_objects::market::MarketCatalog;
//!
//! let resolver = Resolver::new(Arc::new(MarketCatalog::new()));
//! let patch = FieldPatch::new()
//!     .arg("BTC/USD")
//!     .arg("buy")
//!     .set(Field::Amount, 2)
//!     .set(Field::Price, 1000);
//! let resolution = resolver.resolve_order_local(&FieldMap::new(), patch).unwrap();
//! assert_eq!(
//!     resolution.fields.num(Field::Total),
//!     Some("2000".parse().unwrap())
//! );
//! ```

pub(crate) mod shortcuts;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::fields::value::{coerce, FieldValue, RawValue};
use crate::domain::fields::{EntityTag, Field, FieldMap, FieldPatch, Provenance};
use crate::domain::rules::{round_numeric, EntitySchema, RuleCtx};
use crate::domain::value_objects::arithmetic::multiply;
use crate::domain::value_objects::enums::OrderKind;
use crate::domain::value_objects::market::{FeeSchedule, MarketCatalog, MarketContext};
use crate::infrastructure::exchange::ExchangeOps;
use serde_json::{Map as JsonMap, Value as JsonValue};
use shortcuts::Shortcut;
use std::sync::Arc;

/// Default multiple of the schema field count bounding the derivation
/// loop.
pub const DEFAULT_PASS_FACTOR: usize = 2;

/// The outcome of one resolution: the full supplied/derived field set
/// plus any metadata split off from the input.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The complete, internally consistent attribute set.
    pub fields: FieldMap,
    /// Opaque metadata carried by the patch, if any; an explicit null
    /// metadata arrives as an empty map.
    pub metadata: Option<JsonMap<String, JsonValue>>,
}

/// The attribute-resolution engine.
///
/// Holds the read-only market catalog and, optionally, the exchange
/// collaborator used for shortcut substitution and fee augmentation.
/// One resolver serves any number of orders and offers; it owns no
/// per-entity state.
#[derive(Clone)]
pub struct Resolver {
    catalog: Arc<MarketCatalog>,
    ops: Option<Arc<dyn ExchangeOps>>,
    pass_factor: usize,
}

impl Resolver {
    /// Creates a resolver without a collaborator: shortcuts drop and
    /// fee schedules are never queried.
    #[must_use]
    pub fn new(catalog: Arc<MarketCatalog>) -> Self {
        Self {
            catalog,
            ops: None,
            pass_factor: DEFAULT_PASS_FACTOR,
        }
    }

    /// Attaches the exchange collaborator.
    #[must_use]
    pub fn with_ops(mut self, ops: Arc<dyn ExchangeOps>) -> Self {
        self.ops = Some(ops);
        self
    }

    /// Overrides the derivation-loop bound factor (passes allowed =
    /// factor × schema field count).
    #[must_use]
    pub fn with_pass_factor(mut self, factor: usize) -> Self {
        self.pass_factor = factor.max(1);
        self
    }

    /// Resolves an order, consulting the collaborator for shortcuts and
    /// fee schedules where configured.
    ///
    /// # Errors
    ///
    /// Any [`DomainError`]: unknown field, type mismatch, conflict,
    /// invalid vocabulary, non-convergence, or an arithmetic failure
    /// inside a rule. Collaborator failures never fail a resolve; the
    /// affected shortcut or augmentation is skipped with a warning.
    pub async fn resolve_order(
        &self,
        existing: &FieldMap,
        patch: FieldPatch,
    ) -> DomainResult<Resolution> {
        self.resolve_online(EntitySchema::order(), existing, patch)
            .await
    }

    /// Resolves a funding offer, consulting the collaborator where
    /// configured.
    ///
    /// # Errors
    ///
    /// As [`Resolver::resolve_order`].
    pub async fn resolve_offer(
        &self,
        existing: &FieldMap,
        patch: FieldPatch,
    ) -> DomainResult<Resolution> {
        self.resolve_online(EntitySchema::offer(), existing, patch)
            .await
    }

    /// Resolves an order without touching the collaborator: shortcuts
    /// are dropped and the fee schedule is not queried.
    ///
    /// # Errors
    ///
    /// As [`Resolver::resolve_order`].
    pub fn resolve_order_local(
        &self,
        existing: &FieldMap,
        patch: FieldPatch,
    ) -> DomainResult<Resolution> {
        self.resolve_local(EntitySchema::order(), existing, patch)
    }

    /// Resolves an offer without touching the collaborator.
    ///
    /// # Errors
    ///
    /// As [`Resolver::resolve_order`].
    pub fn resolve_offer_local(
        &self,
        existing: &FieldMap,
        patch: FieldPatch,
    ) -> DomainResult<Resolution> {
        self.resolve_local(EntitySchema::offer(), existing, patch)
    }

    async fn resolve_online(
        &self,
        schema: &'static EntitySchema,
        existing: &FieldMap,
        patch: FieldPatch,
    ) -> DomainResult<Resolution> {
        let prepared = prepare(schema, &patch)?;
        let mut map = merge(schema, existing, &prepared.named)?;

        if !prepared.shortcuts.is_empty() {
            if let Some(ops) = self.ops.clone() {
                // Substitution needs market/account/pair/side context;
                // derive a preview of the merged set to resolve them.
                let mut preview = map.clone();
                self.derive(schema, &mut preview)?;
                for shortcut in prepared.shortcuts {
                    if let Some((field, value)) =
                        self.substitute(schema, &preview, &shortcut, ops.as_ref()).await
                    {
                        map.insert(field, value, Provenance::Supplied);
                    }
                }
            } else {
                tracing::warn!(
                    entity = schema.entity.name(),
                    "no collaborator configured, dropping shortcuts"
                );
            }
        }

        self.derive(schema, &mut map)?;
        if apply_defaults(schema, &mut map) {
            self.derive(schema, &mut map)?;
        }

        if self.augment_fees(schema, &mut map).await {
            self.derive(schema, &mut map)?;
        }

        self.priority_rederive(schema, &mut map)?;

        Ok(Resolution {
            fields: map,
            metadata: prepared.metadata,
        })
    }

    fn resolve_local(
        &self,
        schema: &'static EntitySchema,
        existing: &FieldMap,
        patch: FieldPatch,
    ) -> DomainResult<Resolution> {
        let prepared = prepare(schema, &patch)?;
        if !prepared.shortcuts.is_empty() {
            tracing::warn!(
                entity = schema.entity.name(),
                dropped = prepared.shortcuts.len(),
                "local resolution drops unexpanded shortcuts"
            );
        }
        let mut map = merge(schema, existing, &prepared.named)?;

        self.derive(schema, &mut map)?;
        if apply_defaults(schema, &mut map) {
            self.derive(schema, &mut map)?;
        }
        self.priority_rederive(schema, &mut map)?;

        Ok(Resolution {
            fields: map,
            metadata: prepared.metadata,
        })
    }

    /// Runs full derivation passes until the structural hash of the
    /// field set stops changing, bounded by `pass_factor × field
    /// count`.
    fn derive(&self, schema: &EntitySchema, map: &mut FieldMap) -> DomainResult<()> {
        let max_passes = self.pass_factor * schema.fields.len();
        let mut passes = 0usize;
        loop {
            let before = map.structural_hash();
            for &field in schema.fields {
                if map.contains(field) {
                    continue;
                }
                let derived = {
                    let ctx = RuleCtx {
                        map,
                        catalog: &self.catalog,
                    };
                    let mut found = None;
                    for rule in schema.rules_for(field) {
                        if let Some(value) = rule(&ctx)? {
                            found = Some(value);
                            break;
                        }
                    }
                    found
                };
                if let Some(value) = derived {
                    let value = self.rounded(schema, field, value, map)?;
                    map.insert(field, value, Provenance::Derived);
                }
            }
            passes += 1;
            if map.structural_hash() == before {
                tracing::debug!(
                    entity = schema.entity.name(),
                    passes,
                    fields = map.len(),
                    "derivation reached fixed point"
                );
                return Ok(());
            }
            if passes >= max_passes {
                return Err(DomainError::NonConvergence { passes });
            }
        }
    }

    /// Recomputes the priority fields from their own rule lists when
    /// their provenance is derived, so the direct amount/price/side
    /// triangle overrides longer derivation chains.
    fn priority_rederive(&self, schema: &EntitySchema, map: &mut FieldMap) -> DomainResult<()> {
        for &field in schema.priority {
            if map.provenance(field) != Some(Provenance::Derived) {
                continue;
            }
            let previous = map.remove(field);
            let recomputed = {
                let ctx = RuleCtx {
                    map,
                    catalog: &self.catalog,
                };
                let mut found = None;
                for rule in schema.rules_for(field) {
                    if let Some(value) = rule(&ctx)? {
                        found = Some(value);
                        break;
                    }
                }
                found
            };
            match (recomputed, previous) {
                (Some(value), _) => {
                    let value = self.rounded(schema, field, value, map)?;
                    map.insert(field, value, Provenance::Derived);
                }
                (None, Some(previous)) => {
                    map.insert(field, previous, Provenance::Derived);
                }
                (None, None) => {}
            }
        }
        Ok(())
    }

    fn rounded(
        &self,
        schema: &EntitySchema,
        field: Field,
        value: FieldValue,
        map: &FieldMap,
    ) -> DomainResult<FieldValue> {
        match value {
            FieldValue::Num(n) => Ok(FieldValue::Num(round_numeric(
                schema.entity,
                field,
                n,
                map,
            )?)),
            other => Ok(other),
        }
    }

    /// Expands one shortcut against the collaborator. Returns `None`
    /// (dropping the shortcut) when the required context is not
    /// resolvable or the collaborator call fails.
    async fn substitute(
        &self,
        schema: &EntitySchema,
        preview: &FieldMap,
        shortcut: &Shortcut,
        ops: &dyn ExchangeOps,
    ) -> Option<(Field, FieldValue)> {
        match shortcut {
            Shortcut::TickerPrice(point) => {
                let Some(market) = preview.market() else {
                    tracing::warn!(%point, "market unresolved, dropping ticker price shortcut");
                    return None;
                };
                match ops.ticker(market).await {
                    Ok(ticker) => Some((Field::Price, FieldValue::Num(point.select(&ticker)))),
                    Err(error) => {
                        tracing::warn!(%error, %point, "ticker query failed, dropping shortcut");
                        None
                    }
                }
            }
            Shortcut::BalancePercentage { field, multiplier } => {
                let Some(account) = preview.text(Field::Account) else {
                    tracing::warn!(%field, "account unresolved, dropping percentage shortcut");
                    return None;
                };
                let (instrument, context) = match (schema.entity, *field) {
                    (EntityTag::Order, Field::Input) => (
                        preview.instrument(Field::InputInstrument).cloned(),
                        preview
                            .context()
                            .map_or(MarketContext::Spot, MarketContext::from),
                    ),
                    (EntityTag::Order, _) => (
                        preview.pair().map(|pair| pair.base().clone()),
                        preview
                            .context()
                            .map_or(MarketContext::Spot, MarketContext::from),
                    ),
                    (EntityTag::Offer, _) => (
                        preview.instrument(Field::Instrument).cloned(),
                        MarketContext::Funding,
                    ),
                };
                let Some(instrument) = instrument else {
                    tracing::warn!(%field, "instrument unresolved, dropping percentage shortcut");
                    return None;
                };
                match ops.balance(account, &instrument, context).await {
                    Ok(balance) => match multiply(balance, *multiplier) {
                        Ok(value) => Some((*field, FieldValue::Num(value))),
                        Err(error) => {
                            tracing::warn!(%error, "balance scaling failed, dropping shortcut");
                            None
                        }
                    },
                    Err(error) => {
                        tracing::warn!(%error, %instrument, "balance query failed, dropping shortcut");
                        None
                    }
                }
            }
        }
    }

    /// Fills the fee percentage from the account's externally queried
    /// fee schedule once market and account are known. Returns true if
    /// a value was inserted.
    async fn augment_fees(&self, schema: &EntitySchema, map: &mut FieldMap) -> bool {
        if map.contains(Field::FeePercentage) {
            return false;
        }
        let Some(ops) = self.ops.clone() else {
            return false;
        };
        let (Some(market), Some(account)) = (map.market(), map.text(Field::Account)) else {
            return false;
        };
        let symbol = market.symbol().to_string();
        let schedule = match ops.fee_schedule(account).await {
            Ok(fees) => fees.get(&symbol).copied(),
            Err(error) => {
                tracing::warn!(%error, account, "fee schedule query failed, skipping augmentation");
                None
            }
        };
        let Some(schedule) = schedule else {
            return false;
        };
        let Some(pct) = fee_from_schedule(schema.entity, map, &schedule) else {
            return false;
        };
        map.insert(Field::FeePercentage, FieldValue::Num(pct), Provenance::Derived);
        true
    }
}

/// Inserts the schema's post-loop defaults for fields no rule could
/// decide mid-iteration (order type, offer type). Returns true if
/// anything was inserted.
fn apply_defaults(schema: &EntitySchema, map: &mut FieldMap) -> bool {
    let mut inserted = false;
    for (field, value) in schema.post_defaults {
        if !map.contains(*field) {
            map.insert(*field, value.clone(), Provenance::Derived);
            inserted = true;
        }
    }
    inserted
}

/// Picks the applicable rate from a fee schedule: maker for a visible
/// limit order, taker for a market or hidden order; normal/hidden for
/// offers.
fn fee_from_schedule(
    entity: EntityTag,
    map: &FieldMap,
    schedule: &FeeSchedule,
) -> Option<rust_decimal::Decimal> {
    match entity {
        EntityTag::Order => {
            let kind = map.order_kind()?;
            let hidden = map.flag(Field::Hidden).unwrap_or(false);
            match kind {
                OrderKind::Limit if !hidden => schedule.maker,
                _ => schedule.taker,
            }
        }
        EntityTag::Offer => match map.offer_kind()? {
            crate::domain::value_objects::enums::OfferKind::Normal => schedule.normal,
            crate::domain::value_objects::enums::OfferKind::Hidden => schedule.hidden,
        },
    }
}

#[derive(Debug)]
struct Prepared {
    named: Vec<(Field, RawValue)>,
    shortcuts: Vec<Shortcut>,
    metadata: Option<JsonMap<String, JsonValue>>,
}

/// Classifies positional arguments, checks for conflicts, splits off
/// metadata and shortcut spellings.
fn prepare(schema: &EntitySchema, patch: &FieldPatch) -> DomainResult<Prepared> {
    let mut entries: Vec<(Field, RawValue)> = Vec::with_capacity(patch.len());

    for raw in patch.args() {
        let field = shortcuts::classify_arg(schema.entity, raw)?;
        push_checked(&mut entries, field, raw.clone())?;
    }
    for (name, raw) in patch.named() {
        let field = Field::parse(name)
            .filter(|field| schema.contains(*field))
            .ok_or_else(|| DomainError::unknown_field(schema.entity.name(), name.clone()))?;
        push_checked(&mut entries, field, raw.clone())?;
    }

    let mut metadata = None;
    entries.retain(|(field, raw)| {
        if *field != Field::Metadata {
            return true;
        }
        metadata = Some(match raw {
            RawValue::Metadata(map) => map.clone(),
            _ => JsonMap::new(),
        });
        false
    });
    // A non-mapping, non-null metadata value is a type mismatch.
    if let Some(bad) = patch
        .named()
        .iter()
        .find(|(name, raw)| {
            name.as_str() == Field::Metadata.name()
                && !matches!(raw, RawValue::Metadata(_) | RawValue::Null)
        })
    {
        return Err(DomainError::type_mismatch(
            Field::Metadata,
            "metadata mapping",
            bad.1.describe(),
        ));
    }

    let mut named = entries;
    let shortcuts = shortcuts::extract(schema.entity, &mut named);

    Ok(Prepared {
        named,
        shortcuts,
        metadata,
    })
}

fn push_checked(
    entries: &mut Vec<(Field, RawValue)>,
    field: Field,
    raw: RawValue,
) -> DomainResult<()> {
    if entries.iter().any(|(existing, _)| *existing == field) {
        return Err(DomainError::conflict(field));
    }
    entries.push((field, raw));
    Ok(())
}

/// Sanitizes and merges the named fields onto the existing supplied
/// set. Explicit nulls remove; everything else overwrites as supplied.
fn merge(
    schema: &EntitySchema,
    existing: &FieldMap,
    named: &[(Field, RawValue)],
) -> DomainResult<FieldMap> {
    let mut map = existing.supplied_only();
    for (field, raw) in named {
        match raw {
            RawValue::Null => {
                map.remove(*field);
            }
            _ => {
                let value = coerce(schema.entity, *field, raw)?;
                map.insert(*field, value, Provenance::Supplied);
            }
        }
    }
    Ok(map)
}
