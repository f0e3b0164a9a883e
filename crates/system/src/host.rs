use duos_core::state::LocalHost;
use sysinfo::{Disks, System};

/// Samples CPU, memory and root-filesystem usage of this machine.
///
/// CPU usage is a delta between refreshes, so the first sample after
/// construction reads near zero.
pub struct LocalHostProbe {
    sys: System,
}

impl LocalHostProbe {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        Self { sys }
    }

    pub fn sample(&mut self) -> LocalHost {
        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();

        let disks = Disks::new_with_refreshed_list();
        let (disk_used, disk_total) = disks
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new("/"))
            .map(|d| (d.total_space().saturating_sub(d.available_space()), d.total_space()))
            .unwrap_or((0, 0));

        LocalHost {
            cpu_percent: self.sys.cpus().iter().map(|c| c.cpu_usage()).collect(),
            mem_used: self.sys.used_memory(),
            mem_total: self.sys.total_memory(),
            disk_used,
            disk_total,
        }
    }
}

impl Default for LocalHostProbe {
    fn default() -> Self {
        Self::new()
    }
}
