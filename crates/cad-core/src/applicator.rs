//! Writing visibility and overrides back to the target.
//!
//! Every record is built from an empty [`OverrideRecord`] so that a field
//! absent from the desired state clears whatever the target held before.

use cad_model::{EntityKey, EntityKind, EntityRef, ExternalId, OverrideRecord, OverrideSet, ViewId};

use crate::error::{CoreError, Result, TargetError};
use crate::target::{RenderTarget, effective_view};
use crate::transaction::in_transaction;

/// Desired end state of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyItem {
    pub key: EntityKey,
    pub visible: bool,
    pub overrides: OverrideSet,
    /// Ignored for sub-items.
    pub halftone: bool,
}

impl ApplyItem {
    /// The entity's current in-memory state.
    pub fn from_entity(entity: EntityRef<'_>) -> Self {
        Self {
            key: entity.key(),
            visible: entity.visible(),
            overrides: entity.overrides().clone(),
            halftone: entity.halftone(),
        }
    }
}

/// An entity the batch left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntity {
    pub key: EntityKey,
    pub reason: TargetError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// The view that was written: the requested view or its template.
    pub written_view: ViewId,
    pub applied: Vec<EntityKey>,
    pub skipped: Vec<SkippedEntity>,
    /// Pattern names that did not resolve and were written as "no pattern".
    pub unresolved_patterns: Vec<String>,
}

impl ApplyReport {
    pub fn was_applied(&self, key: EntityKey) -> bool {
        self.applied.contains(&key)
    }
}

/// Builds the record for a desired state from scratch.
///
/// Returns the record and the pattern name that failed to resolve, if any.
pub fn build_record<T: RenderTarget + ?Sized>(
    target: &T,
    desired: &OverrideSet,
    halftone: bool,
) -> (OverrideRecord, Option<String>) {
    let mut record = OverrideRecord::default().with_halftone(halftone);
    if let Some(color) = desired.color {
        record = record.with_color(color);
    }
    if let Some(weight) = desired.line_weight {
        record = record.with_weight(weight);
    }
    let mut unresolved = None;
    if let Some(name) = &desired.line_pattern {
        match target.find_pattern_id_by_name(name) {
            Some(id) => record = record.with_pattern(id),
            None => unresolved = Some(name.clone()),
        }
    }
    (record, unresolved)
}

/// Applies `items` to `view` (or its template) in one transaction.
///
/// Locked or missing objects are skipped; any other failure rolls the whole
/// batch back and is returned as [`CoreError::BatchFailed`].
pub fn apply_batch<T: RenderTarget + ?Sized>(
    target: &mut T,
    view: ViewId,
    items: &[ApplyItem],
) -> Result<ApplyReport> {
    let span = tracing::info_span!("apply_batch", view = %view, items = items.len());
    let _guard = span.enter();

    let written_view = effective_view(target, view)?;
    if written_view != view {
        tracing::debug!(template = %written_view, "writing to view template");
    }

    let result = in_transaction(target, "Apply layer settings", |target| {
        let mut report = ApplyReport {
            written_view,
            applied: Vec::with_capacity(items.len()),
            skipped: Vec::new(),
            unresolved_patterns: Vec::new(),
        };
        for item in items {
            let halftone = item.key.kind() == EntityKind::Container && item.halftone;
            let (record, unresolved) = build_record(target, &item.overrides, halftone);
            if let Some(name) = unresolved
                && !report.unresolved_patterns.contains(&name)
            {
                tracing::warn!(pattern = %name, "line pattern not found, writing no pattern");
                report.unresolved_patterns.push(name);
            }

            match write_state(target, written_view, item.key.id(), !item.visible, &record) {
                Ok(()) => report.applied.push(item.key),
                Err(e) if e.is_recoverable() => {
                    tracing::debug!(entity = %item.key, error = %e, "skipping entity");
                    report.skipped.push(SkippedEntity {
                        key: item.key,
                        reason: e,
                    });
                }
                Err(e) => {
                    return Err(CoreError::BatchFailed {
                        operation: "Apply layer settings",
                        source: e,
                    });
                }
            }
        }
        Ok(report)
    });

    match &result {
        Ok(report) => tracing::info!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "Applied layer settings"
        ),
        Err(e) => tracing::error!(error = %e, "Applying layer settings failed"),
    }
    result
}

/// Writes the hidden flag and override record of `id`. When the record is
/// rejected as locked or missing, the previous hidden flag is put back so a
/// skipped entity is left as it was.
pub(crate) fn write_state<T: RenderTarget + ?Sized>(
    target: &mut T,
    view: ViewId,
    id: ExternalId,
    hidden: bool,
    record: &OverrideRecord,
) -> std::result::Result<(), TargetError> {
    let previous = target.is_hidden(view, id)?;
    target.set_hidden(view, id, hidden)?;
    match target.set_overrides(view, id, record) {
        Err(e) if e.is_recoverable() && previous != hidden => {
            target.set_hidden(view, id, previous)?;
            Err(e)
        }
        other => other,
    }
}
