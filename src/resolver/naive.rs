//! The default pass: fallback-free materialization for the default locale.
//!
//! A best-effort flattening that never consults field schema and never
//! fails. Its output is the fallback source every other locale resolves
//! against. Termination on cyclic graphs comes from a bounded revisit
//! counter: a record entered more than `naive_depth` times flattens to
//! null instead of recursing further. The counter's scope is a policy
//! knob (see [`VisitScope`]); per-path, the counter map is propagated by
//! value into each branch so siblings do not consume each other's budget.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::types::{
    Locale, LocaleValueMap, Record, RecordId, RecordSet, ResolvedNode, ResolvedValue,
    ResolverConfig, Value, VisitScope,
};

type VisitCounts = HashMap<RecordId, usize>;

/// Resolve a record tree for the default locale, without fallback.
pub(crate) fn naive_resolve(
    records: &RecordSet,
    root: &Record,
    locale: &Locale,
    config: &ResolverConfig,
) -> ResolvedNode {
    let mut seen = VisitCounts::new();
    seen.insert(root.id.clone(), 1);
    resolve_fields(records, &root.fields, locale, config, &mut seen)
}

fn resolve_fields(
    records: &RecordSet,
    fields: &IndexMap<String, LocaleValueMap>,
    locale: &Locale,
    config: &ResolverConfig,
    seen: &mut VisitCounts,
) -> ResolvedNode {
    let mut node = ResolvedNode::new(&locale.code);
    for (key, values) in fields {
        let resolved = resolve_value(records, values.get(&locale.code), locale, config, seen);
        node.fields.insert(key.clone(), resolved);
    }
    node
}

fn resolve_value(
    records: &RecordSet,
    value: Option<&Value>,
    locale: &Locale,
    config: &ResolverConfig,
    seen: &mut VisitCounts,
) -> ResolvedValue {
    match value {
        None => ResolvedValue::Null,
        Some(Value::Scalar(scalar)) => ResolvedValue::Scalar(scalar.clone()),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(resolve_value(records, Some(item), locale, config, seen));
            }
            ResolvedValue::Many(out)
        }
        Some(Value::Link(id)) => follow(records, id, locale, config, seen),
    }
}

fn follow(
    records: &RecordSet,
    id: &RecordId,
    locale: &Locale,
    config: &ResolverConfig,
    seen: &mut VisitCounts,
) -> ResolvedValue {
    // Dangling references flatten to null; this pass never fails.
    let Some(record) = records.get(id) else {
        return ResolvedValue::Null;
    };
    if seen.get(id).copied().unwrap_or(0) >= config.naive_depth {
        return ResolvedValue::Null;
    }
    match config.naive_scope {
        VisitScope::PerPath => {
            let mut branch = seen.clone();
            *branch.entry(id.clone()).or_insert(0) += 1;
            let node = resolve_fields(records, &record.fields, locale, config, &mut branch);
            ResolvedValue::Node(Arc::new(node))
        }
        VisitScope::Global => {
            *seen.entry(id.clone()).or_insert(0) += 1;
            let node = resolve_fields(records, &record.fields, locale, config, seen);
            ResolvedValue::Node(Arc::new(node))
        }
    }
}
