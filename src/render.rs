use serde::Serialize;

use crate::format::{format_percent, pad_unicode, truncate_unicode};
use crate::system::process::ProcessRecord;
use crate::system::snapshot::Snapshot;

const PID_WIDTH: usize = 8;
const NAME_WIDTH: usize = 25;
const PERCENT_WIDTH: usize = 8;
const RULE_WIDTH: usize = PID_WIDTH + NAME_WIDTH + 2 * PERCENT_WIDTH + 9;

pub const EMPTY_MESSAGE: &str = "No matching processes found.";

#[derive(Debug, Serialize)]
pub struct ProcessesResponse<'a> {
    pub processes: &'a Snapshot,
}

#[derive(Debug, Serialize)]
pub struct AnomaliesResponse<'a> {
    pub anomalies: &'a Snapshot,
}

pub fn render_table(snapshot: &Snapshot) -> String {
    let mut lines = Vec::with_capacity(snapshot.len() + 3);
    lines.push(format!(
        "{:<PID_WIDTH$} {} {:<PERCENT_WIDTH$} {:<PERCENT_WIDTH$} CHILD",
        "PID",
        pad_unicode("NAME", NAME_WIDTH),
        "CPU%",
        "MEM%",
    ));
    lines.push("-".repeat(RULE_WIDTH));

    if snapshot.is_empty() {
        lines.push(EMPTY_MESSAGE.to_string());
    }
    lines.extend(snapshot.iter().map(render_row));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_row(process: &ProcessRecord) -> String {
    let child = match process.is_child {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    };
    let name = truncate_unicode(&process.name, NAME_WIDTH - 1);
    format!(
        "{:<PID_WIDTH$} {} {:<PERCENT_WIDTH$} {:<PERCENT_WIDTH$} {child}",
        process.pid,
        pad_unicode(&name, NAME_WIDTH),
        format_percent(process.cpu_percent),
        format_percent(process.memory_percent),
    )
}
