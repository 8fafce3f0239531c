use std::fmt::Write;

use crate::data::model::{Group, PipelineResult, Record};
use crate::state::LoadState;

// ---------------------------------------------------------------------------
// Plain-text presentation of a LoadState
// ---------------------------------------------------------------------------

/// How much of each group to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Headers only, like collapsed group cards.
    pub collapsed: bool,
}

/// Render any state. Never filters or reorders the result.
pub fn render(state: &LoadState, options: ViewOptions) -> String {
    match state {
        LoadState::Loading => "Loading…\n".to_string(),
        LoadState::Failed(message) => format!("{message}\n"),
        LoadState::Ready(result) => render_result(result, options),
    }
}

fn render_result(result: &PipelineResult, options: ViewOptions) -> String {
    if result.is_empty() {
        return "No items.\n".to_string();
    }
    let mut out = String::new();
    for group in result.groups() {
        group_header(&mut out, group);
        if options.collapsed {
            continue;
        }
        for record in group.records() {
            record_row(&mut out, record);
        }
    }
    out
}

fn group_header(out: &mut String, group: &Group) {
    let noun = if group.len() == 1 { "item" } else { "items" };
    // Writing to a String cannot fail.
    let _ = writeln!(out, "List ID: {} ({} {noun})", group.group_key(), group.len());
}

fn record_row(out: &mut String, record: &Record) {
    let label = record.label.as_deref().unwrap_or("");
    let _ = writeln!(out, "    {label}  ID: {}", record.id);
}
