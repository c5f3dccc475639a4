use super::relationship::ParentMap;

pub trait PlatformExtensions {
    /// Reads the parent of every live process straight from the OS.
    ///
    /// `None` means the platform has no native reader and the caller should
    /// fall back to its own process table.
    fn parent_pids() -> Option<ParentMap>;
}

#[cfg(not(target_os = "linux"))]
mod fallback;
#[cfg(target_os = "linux")]
mod linux;

#[cfg(not(target_os = "linux"))]
use fallback as platform_impl;
#[cfg(target_os = "linux")]
use linux as platform_impl;

pub fn parent_pids() -> Option<ParentMap> {
    platform_impl::Platform::parent_pids()
}
