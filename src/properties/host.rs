//! Host identity used to seed the defaulted client properties.

use std::sync::OnceLock;

use crate::properties::field::FieldValue;

const UNKNOWN: &str = "unknown";

/// Process and operating-system identity reported to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    /// Executable name of the current process.
    pub task: String,
    pub pid: u32,
    /// Kernel name, e.g. `Linux`.
    pub os: String,
    /// Kernel release, e.g. `6.1.0-18-amd64`.
    pub os_version: String,
    /// Kernel build string.
    pub os_patch: String,
}

impl HostIdentity {
    /// Identity of the running process, probed once and cached.
    pub fn current() -> &'static HostIdentity {
        static IDENTITY: OnceLock<HostIdentity> = OnceLock::new();
        IDENTITY.get_or_init(HostIdentity::detect)
    }

    fn detect() -> Self {
        let task = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let host = Self {
            task,
            pid: std::process::id(),
            os: kernel_field("ostype").unwrap_or_else(|| std::env::consts::OS.to_string()),
            os_version: kernel_field("osrelease").unwrap_or_else(|| UNKNOWN.to_string()),
            os_patch: kernel_field("version").unwrap_or_else(|| UNKNOWN.to_string()),
        };
        tracing::debug!(task = %host.task, pid = host.pid, os = %host.os, "Host identity detected");
        host
    }

    /// The five defaulted client properties, in key-table order.
    pub fn client_properties(&self) -> [(&'static str, FieldValue); 5] {
        [
            ("task", FieldValue::from(self.task.as_str())),
            ("pid", FieldValue::from(self.pid)),
            ("os", FieldValue::from(self.os.as_str())),
            ("os_version", FieldValue::from(self.os_version.as_str())),
            ("os_patch", FieldValue::from(self.os_patch.as_str())),
        ]
    }
}

#[cfg(target_os = "linux")]
fn kernel_field(name: &str) -> Option<String> {
    std::fs::read_to_string(format!("/proc/sys/kernel/{}", name))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(not(target_os = "linux"))]
fn kernel_field(_name: &str) -> Option<String> {
    None
}
