use duos_core::{AppState, Panel};
use duos_system::{format_bytes, format_uptime};

/// Node and host summary: version, uptime, memory, disk, chain, blocks,
/// connections.
#[derive(Debug, Default)]
pub struct StatusPanel;

impl StatusPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for StatusPanel {
    fn id(&self) -> &str {
        "status"
    }

    fn title(&self) -> &str {
        "Status"
    }

    fn lines(&self, state: &AppState) -> Vec<String> {
        let host = &state.local_host;
        vec![
            format!("Version:     {}", state.status.version),
            format!("Uptime:      {}", format_uptime(state.status.uptime)),
            format!("Memory:      {}", format_bytes(host.mem_total)),
            format!("Disk:        {}", format_bytes(host.disk_total)),
            format!("Chain:       {}", state.status.net),
            format!("Blocks:      {}", state.block_count),
            format!("Connections: {}", state.connections),
        ]
    }
}
