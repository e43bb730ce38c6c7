//! Per-locale resolution with fallback to the default tree.
//!
//! One [`LocaleRun`] materializes the record tree for a single non-default
//! locale, walking the raw record graph in parallel with the precomputed
//! default-locale tree. The default tree is threaded through every
//! recursive call positionally (by field key and array index), so a
//! missing translation falls back to already-resolved default content
//! instead of being re-resolved from scratch.
//!
//! Cycles and shared subgraphs terminate through the seen-map: an entry is
//! registered as in-progress before its fields are resolved, so a field
//! referencing its own ancestor resolves to a back-reference instead of
//! recursing forever, and a record referenced by two parents is resolved
//! exactly once.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::error::{ResolveError, Result};
use crate::schema::SchemaCache;
use crate::traits::ContentApi;
use crate::types::{
    Field, Locale, LocaleValueMap, Record, RecordId, RecordKind, RecordSet, ResolvedNode,
    ResolvedValue, Value,
};

/// State of a record within one resolution run.
enum SeenEntry {
    /// Fields are still being resolved; a revisit is a cycle.
    InProgress,
    /// Fully resolved; revisits share the node.
    Done(Arc<ResolvedNode>),
}

/// Identity cache, exclusively owned by one top-level run. Never shared
/// across locales or across separate root calls.
type Seen = HashMap<RecordId, SeenEntry>;

/// One locale's resolution over a record graph.
pub(crate) struct LocaleRun<'r, C> {
    pub schema: &'r SchemaCache<C>,
    pub records: &'r RecordSet,
    pub locale: &'r Locale,
    pub default_locale: &'r Locale,
}

impl<C: ContentApi> LocaleRun<'_, C> {
    /// Resolve the tree rooted at `root` against the default-locale tree.
    pub(crate) async fn resolve(
        &self,
        root: &Record,
        default_data: &ResolvedNode,
    ) -> Result<Arc<ResolvedNode>> {
        debug!(locale = %self.locale.code, root = %root.id, "resolving record tree");
        let mut seen = Seen::new();
        match self
            .resolve_record(root, Some(default_data), &mut seen)
            .await?
        {
            ResolvedValue::Node(node) => Ok(node),
            // a record always resolves to a node under a fresh seen map
            _ => unreachable!("root record resolution yields a node"),
        }
    }

    fn resolve_record<'s>(
        &'s self,
        record: &'s Record,
        default: Option<&'s ResolvedNode>,
        seen: &'s mut Seen,
    ) -> BoxFuture<'s, Result<ResolvedValue>> {
        Box::pin(async move {
            match seen.get(&record.id) {
                Some(SeenEntry::Done(node)) => return Ok(ResolvedValue::Node(node.clone())),
                Some(SeenEntry::InProgress) => {
                    return Ok(ResolvedValue::Circular {
                        id: record.id.clone(),
                    })
                }
                None => {}
            }

            let RecordKind::Entry { content_type_id } = &record.kind else {
                // Assets are localized one level deep only, no schema needed.
                return Ok(ResolvedValue::Node(Arc::new(self.resolve_asset(record))));
            };

            // Registered before recursing into fields, so a field may
            // reference its own ancestor without infinite recursion.
            seen.insert(record.id.clone(), SeenEntry::InProgress);

            let outcome: Result<ResolvedNode> = async {
                let fields = self.schema.fields(content_type_id).await?;
                let mut node = ResolvedNode::new(&self.locale.code);
                for (key, values) in &record.fields {
                    let field = fields.iter().find(|field| field.id == *key).ok_or_else(|| {
                        ResolveError::UnknownField {
                            key: key.clone(),
                            content_type: content_type_id.clone(),
                        }
                    })?;
                    let default_value = default.and_then(|node| node.get(key));
                    let resolved = if field.localized {
                        self.resolve_localized(field, key, values, default_value, seen)
                            .await?
                    } else {
                        self.resolve_non_localized(field, key, values, default_value, seen)
                            .await?
                    };
                    node.fields.insert(key.clone(), resolved);
                }
                Ok(node)
            }
            .await;

            match outcome {
                Ok(node) => {
                    let node = Arc::new(node);
                    seen.insert(record.id.clone(), SeenEntry::Done(node.clone()));
                    Ok(ResolvedValue::Node(node))
                }
                Err(error) => {
                    // Drop the in-progress marker so a later reference to
                    // this record retries instead of reading a stale cycle.
                    seen.remove(&record.id);
                    Err(error)
                }
            }
        })
    }

    /// A localized field: target-locale value if present, fallback rules
    /// otherwise.
    async fn resolve_localized(
        &self,
        field: &Field,
        key: &str,
        values: &LocaleValueMap,
        default: Option<&ResolvedValue>,
        seen: &mut Seen,
    ) -> Result<ResolvedValue> {
        match values.get(&self.locale.code) {
            Some(Value::Array(items)) => {
                self.resolve_many(field, key, true, items, default, seen)
                    .await
            }
            Some(value) => self
                .resolve_value(value, default, seen)
                .await
                .map_err(|error| error.in_localized_field(field, key)),
            None if field.required => Err(ResolveError::MissingRequiredLocalization {
                field_id: field.id.clone(),
                field_type: field.field_type.clone(),
                key: key.to_string(),
                locale: self.locale.code.clone(),
            }),
            None => {
                debug!(
                    field = %field.id,
                    locale = %self.locale.code,
                    "optional localized field has no value, resolving to null"
                );
                Ok(ResolvedValue::Null)
            }
        }
    }

    /// A non-localized field always resolves from the default locale's
    /// raw value, against the same default-tree counterpart.
    async fn resolve_non_localized(
        &self,
        field: &Field,
        key: &str,
        values: &LocaleValueMap,
        default: Option<&ResolvedValue>,
        seen: &mut Seen,
    ) -> Result<ResolvedValue> {
        match values.get(&self.default_locale.code) {
            Some(Value::Array(items)) => {
                self.resolve_many(field, key, false, items, default, seen)
                    .await
            }
            Some(value) => self
                .resolve_value(value, default, seen)
                .await
                .map_err(|error| error.in_non_localized_field(field, key)),
            None => Ok(ResolvedValue::Null),
        }
    }

    /// A many-references field. Elements resolve positionally against the
    /// default tree; a failing reference element degrades to its
    /// default-locale counterpart instead of failing the whole array.
    /// Failing scalar elements, and references without default data,
    /// propagate wrapped with the field path.
    async fn resolve_many(
        &self,
        field: &Field,
        key: &str,
        localized: bool,
        items: &[Value],
        default: Option<&ResolvedValue>,
        seen: &mut Seen,
    ) -> Result<ResolvedValue> {
        let default_items = match default {
            Some(ResolvedValue::Many(items)) => Some(items.as_slice()),
            _ => None,
        };
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let default_item = default_items.and_then(|items| items.get(index));
            match self.resolve_value(item, default_item, seen).await {
                Ok(resolved) => out.push(resolved),
                Err(error) => match (item.is_link(), default_item) {
                    (true, Some(fallback)) => {
                        warn!(
                            field = %field.id,
                            key,
                            index,
                            locale = %self.locale.code,
                            %error,
                            "array element failed to resolve, substituting default-locale value"
                        );
                        out.push(fallback.clone());
                    }
                    _ => {
                        return Err(if localized {
                            error.in_localized_field(field, key)
                        } else {
                            error.in_non_localized_field(field, key)
                        });
                    }
                },
            }
        }
        Ok(ResolvedValue::Many(out))
    }

    /// One raw value: scalar passthrough, reference recursion, or a
    /// nested array resolved positionally (degrade applies only at field
    /// level).
    fn resolve_value<'s>(
        &'s self,
        value: &'s Value,
        default: Option<&'s ResolvedValue>,
        seen: &'s mut Seen,
    ) -> BoxFuture<'s, Result<ResolvedValue>> {
        Box::pin(async move {
            match value {
                Value::Scalar(scalar) => Ok(ResolvedValue::Scalar(scalar.clone())),
                Value::Link(id) => {
                    let record =
                        self.records
                            .get(id)
                            .ok_or_else(|| ResolveError::UnknownRecord {
                                id: id.clone(),
                            })?;
                    let default_node = default
                        .and_then(ResolvedValue::as_node)
                        .map(|node| node.as_ref());
                    self.resolve_record(record, default_node, seen).await
                }
                Value::Array(items) => {
                    let default_items = match default {
                        Some(ResolvedValue::Many(items)) => Some(items.as_slice()),
                        _ => None,
                    };
                    let mut out = Vec::with_capacity(items.len());
                    for (index, item) in items.iter().enumerate() {
                        let default_item = default_items.and_then(|items| items.get(index));
                        out.push(self.resolve_value(item, default_item, seen).await?);
                    }
                    Ok(ResolvedValue::Many(out))
                }
            }
        })
    }

    /// Assets resolve flat: per field, the target locale's value if
    /// present, else the default locale's. Values are never records.
    fn resolve_asset(&self, record: &Record) -> ResolvedNode {
        let mut node = ResolvedNode::new(&self.locale.code);
        for (key, values) in &record.fields {
            let value = values
                .get(&self.locale.code)
                .or_else(|| values.get(&self.default_locale.code));
            let resolved = match value {
                Some(Value::Scalar(scalar)) => ResolvedValue::Scalar(scalar.clone()),
                Some(Value::Array(items)) => ResolvedValue::Many(
                    items
                        .iter()
                        .map(|item| match item {
                            Value::Scalar(scalar) => ResolvedValue::Scalar(scalar.clone()),
                            _ => ResolvedValue::Null,
                        })
                        .collect(),
                ),
                _ => ResolvedValue::Null,
            };
            node.fields.insert(key.clone(), resolved);
        }
        node
    }
}
