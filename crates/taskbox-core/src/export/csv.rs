//! CSV rendering for export artifacts.
//!
//! Fixed three-column layout with a header row; every field is quoted,
//! matching the downstream parsers that consume these files by position.

use crate::task::model::Task;

/// Column order is part of the external contract.
const HEADER: &str = "\"pk\",\"sk\",\"description\"\n";

/// Render tasks to a UTF-8 CSV document, one row per record in input order.
///
/// Absent descriptions render as an empty quoted field; embedded quotes are
/// doubled per RFC 4180.
pub fn render(tasks: &[Task]) -> Vec<u8> {
    let mut out = String::with_capacity(HEADER.len() + tasks.len() * 48);
    out.push_str(HEADER);
    for task in tasks {
        push_field(&mut out, &task.pk);
        out.push(',');
        push_field(&mut out, &task.sk);
        out.push(',');
        push_field(&mut out, task.description.as_deref().unwrap_or(""));
        out.push('\n');
    }
    out.into_bytes()
}

fn push_field(out: &mut String, field: &str) {
    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}
