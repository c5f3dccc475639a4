use super::PlatformExtensions;
use crate::system::relationship::ParentMap;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn parent_pids() -> Option<ParentMap> {
        let entries = std::fs::read_dir("/proc").ok()?;
        let mut parents = ParentMap::new();
        for entry in entries.flatten() {
            let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) else {
                continue;
            };
            // The process may have exited since the directory was listed.
            if let Some(ppid) = read_ppid(pid)
                && ppid != 0
            {
                parents.insert(pid, ppid);
            }
        }
        Some(parents)
    }
}

fn read_ppid(pid: u32) -> Option<u32> {
    let contents = std::fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    parse_stat_ppid(&contents)
}

/// Extracts the parent pid from a `/proc/<pid>/stat` line.
fn parse_stat_ppid(contents: &str) -> Option<u32> {
    // comm field may contain spaces and parens, so find the closing )
    let after_comm = contents.rfind(')')? + 1;
    let mut fields = contents[after_comm..].split_whitespace();
    // Fields after comm: state(0) ppid(1)
    fields.nth(1)?.parse().ok()
}
