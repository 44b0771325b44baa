//! Rendering groups back into output lines.

use super::group::Group;
use super::patterns::{self, FIRST_BRACKET};

/// Render one group. Singletons print their line untouched; repeated groups
/// print a time range, the first member's tag and the shared pattern.
pub fn format_group(group: &Group) -> String {
    let Some(first) = group.members.first() else {
        return String::new();
    };
    if group.is_single() {
        return first.raw.clone();
    }

    let mut out = String::new();

    let first_ts = first.timestamp();
    let last_ts = group.members.last().and_then(|line| line.timestamp());
    match (first_ts, last_ts) {
        (Some(start), Some(end)) if start != end => {
            let time = end.rsplit(' ').next().unwrap_or(end);
            out.push_str(&format!("{start} → {time} "));
        }
        (Some(start), _) => {
            out.push_str(start);
            out.push(' ');
        }
        _ => {}
    }

    if let Some(level) = patterns::captures(&FIRST_BRACKET, &first.raw).and_then(|caps| caps.get(1)) {
        out.push_str(&format!("[{}] ", level.as_str()));
    }

    out.push_str(&format!("[REPEATED {}x] {}", group.count(), group.pattern));
    out
}
