//! Shared glyphs and prefix helpers for console output

use crate::tree::{EntryKind, TreeLine};

/// One indent level, repeated per depth.
pub const INDENT_UNIT: &str = "│  ";
pub const BRANCH: &str = "├──";
pub const DIR_ICON: &str = "📂";
pub const FILE_ICON: &str = "📄";
pub const COMPLETE_MARKER: &str = "Scan complete. ✅";
pub const CANCELLED_MARKER: &str = "Scan cancelled.";

/// Indentation for an entry at `depth`.
pub fn indent(depth: usize) -> String {
    INDENT_UNIT.repeat(depth)
}

pub fn icon(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Directory => DIR_ICON,
        EntryKind::File | EntryKind::Other => FILE_ICON,
    }
}

/// The uncolored text of a line, without the label.
pub fn entry_text(line: &TreeLine<'_>) -> String {
    format!("{}{} {} {}", indent(line.depth), BRANCH, icon(line.kind), line.name)
}

/// The full uncolored line, label included.
pub fn plain_line(line: &TreeLine<'_>) -> String {
    match line.label {
        Some(label) => format!("{} {}", entry_text(line), label),
        None => entry_text(line),
    }
}
