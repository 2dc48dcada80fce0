//! Plain-text output shared by the CLI subcommands and the REPL.

use nerve_core::{Session, SessionItem, SessionSummary};

pub fn item_line(index: usize, item: &SessionItem) -> String {
    let t = &item.taxon;
    let mark = if item.explored { " [explored]" } else { "" };
    format!(
        "[{index}] {} ({}/{}/{}, {}) score={}{mark}",
        t.variable, t.kingdom, t.phylum, t.family, t.kind, item.score
    )
}

pub fn item_lines(items: &[(usize, SessionItem)]) -> String {
    if items.is_empty() {
        return "(no unexplored items)".to_string();
    }
    items
        .iter()
        .map(|(i, item)| item_line(*i, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Related items from an expansion; positions are not tracked there.
pub fn related_lines(items: &[SessionItem]) -> String {
    if items.is_empty() {
        return "(no such variable in session)".to_string();
    }
    items
        .iter()
        .map(|item| {
            let t = &item.taxon;
            format!("{} ({}/{}) {}", t.variable, t.phylum, t.family, t.value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn session_header(session: &Session) -> String {
    format!(
        "session {}: {} items, {} explored ({})",
        session.id,
        session.items.len(),
        session.explored_count(),
        session.meta.prompt
    )
}

pub fn summary_lines(summaries: &[SessionSummary]) -> String {
    if summaries.is_empty() {
        return "(no sessions)".to_string();
    }
    summaries
        .iter()
        .map(|s| {
            format!(
                "{}  {}  {}/{}  {}",
                s.id, s.created, s.explored, s.items, s.prompt
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
