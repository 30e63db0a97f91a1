//! Copying the state of one view onto other views.

use std::collections::HashSet;
use std::fmt;

use cad_model::{ExternalId, OverrideRecord, ViewId};

use crate::applicator::write_state;
use crate::error::{CoreError, Result, TargetError};
use crate::target::{RenderTarget, effective_view};
use crate::transaction::in_transaction;

/// Outcome for one destination view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPropagation {
    pub view: ViewId,
    pub view_name: String,
    /// Source containers copied onto this view.
    pub applied: Vec<String>,
    /// Source containers this view does not have.
    pub not_found: Vec<String>,
    /// Objects skipped because they were locked or missing.
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    pub source_name: String,
    pub views: Vec<ViewPropagation>,
}

impl fmt::Display for PropagationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Applied settings from '{}':", self.source_name)?;
        for view in &self.views {
            writeln!(f)?;
            writeln!(f, "{}:", view.view_name)?;
            if !view.applied.is_empty() {
                writeln!(f, "  Applied: {}", view.applied.join(", "))?;
            }
            if !view.not_found.is_empty() {
                writeln!(f, "  Not found: {}", view.not_found.join(", "))?;
            }
            if view.skipped > 0 {
                writeln!(f, "  Skipped (locked): {}", view.skipped)?;
            }
        }
        Ok(())
    }
}

/// Copies visibility and overrides of every container of `source` that
/// also exists in a destination view, sub-items included, in one
/// transaction. Records are rebuilt so only effective values are copied.
pub fn propagate_to_views<T: RenderTarget + ?Sized>(
    target: &mut T,
    source: ViewId,
    destinations: &[ViewId],
) -> Result<PropagationReport> {
    let span = tracing::info_span!("propagate", source = %source, views = destinations.len());
    let _guard = span.enter();

    let source_name = target.view_name(source)?;
    let source_containers = target.enumerate_entities(source)?;
    let read_view = effective_view(target, source)?;

    let report = in_transaction(target, "Apply to views", |target| {
        let mut report = PropagationReport {
            source_name,
            views: Vec::with_capacity(destinations.len()),
        };
        for &view in destinations {
            let mut outcome = ViewPropagation {
                view,
                view_name: target.view_name(view)?,
                applied: Vec::new(),
                not_found: Vec::new(),
                skipped: 0,
            };
            let present: HashSet<ExternalId> = target
                .enumerate_entities(view)?
                .into_iter()
                .map(|c| c.id)
                .collect();
            let write_view = effective_view(target, view)?;
            let mut copied = HashSet::new();

            for container in &source_containers {
                if !present.contains(&container.id) {
                    outcome.not_found.push(container.name.clone());
                    continue;
                }
                let ids = std::iter::once(container.id).chain(container.sub_items.iter().map(|s| s.id));
                let mut written = false;
                for id in ids {
                    if !copied.insert(id) {
                        continue;
                    }
                    match copy_entity(target, read_view, write_view, id) {
                        Ok(()) => written = true,
                        Err(e) if e.is_recoverable() => {
                            tracing::debug!(id = %id, error = %e, "skipping object");
                            outcome.skipped += 1;
                        }
                        Err(e) => {
                            return Err(CoreError::BatchFailed {
                                operation: "Apply to views",
                                source: e,
                            });
                        }
                    }
                }
                if written {
                    outcome.applied.push(container.name.clone());
                }
            }
            report.views.push(outcome);
        }
        Ok(report)
    });

    match &report {
        Ok(report) => tracing::info!(views = report.views.len(), "Applied settings to views"),
        Err(e) => tracing::error!(error = %e, "Applying settings to views failed"),
    }
    report
}

fn copy_entity<T: RenderTarget + ?Sized>(
    target: &mut T,
    from: ViewId,
    to: ViewId,
    id: ExternalId,
) -> std::result::Result<(), TargetError> {
    let hidden = target.is_hidden(from, id)?;
    let source = target.get_overrides(from, id)?;
    let record = rebuild_record(target, &source);
    write_state(target, to, id, hidden, &record)
}

/// A fresh record holding only the effective values of `source`.
fn rebuild_record<T: RenderTarget + ?Sized>(target: &T, source: &OverrideRecord) -> OverrideRecord {
    let mut record = OverrideRecord::default().with_halftone(source.halftone);
    if let Some(color) = source.effective_color() {
        record = record.with_color(color);
    }
    if let Some(pattern) = source
        .line_pattern
        .filter(|id| target.pattern_name(*id).is_some())
    {
        record = record.with_pattern(pattern);
    }
    if let Some(weight) = source.effective_weight() {
        record = record.with_weight(weight);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_applied_and_missing() {
        let report = PropagationReport {
            source_name: "Level 1".into(),
            views: vec![ViewPropagation {
                view: ViewId::from_raw(2),
                view_name: "Level 2".into(),
                applied: vec!["Site.dwg".into(), "Floor.dwg".into()],
                not_found: vec!["Roof.dwg".into()],
                skipped: 0,
            }],
        };
        assert_eq!(
            report.to_string(),
            "Applied settings from 'Level 1':\n\nLevel 2:\n  Applied: Site.dwg, Floor.dwg\n  Not found: Roof.dwg\n"
        );
    }
}
