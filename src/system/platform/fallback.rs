use super::PlatformExtensions;
use crate::system::relationship::ParentMap;

pub struct Platform;

impl PlatformExtensions for Platform {
    fn parent_pids() -> Option<ParentMap> {
        // No native reader; the collector uses sysinfo's parent field.
        None
    }
}
