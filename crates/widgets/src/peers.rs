use duos_core::{state::PeerInfo, AppState, Panel};
use duos_system::format_bytes;

/// Rows shown by the peers grid.
const PAGE_SIZE: usize = 5;

/// Connected peers: address, ping, traffic, user agent, protocol version.
#[derive(Debug, Default)]
pub struct PeersPanel;

impl PeersPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for PeersPanel {
    fn id(&self) -> &str {
        "peers"
    }

    fn title(&self) -> &str {
        "Peers"
    }

    fn lines(&self, state: &AppState) -> Vec<String> {
        if state.peers.is_empty() {
            return vec!["No peers".to_string()];
        }
        let mut lines: Vec<String> = state.peers.iter().take(PAGE_SIZE).map(row).collect();
        if state.peers.len() > PAGE_SIZE {
            lines.push(format!("… and {} more", state.peers.len() - PAGE_SIZE));
        }
        lines
    }
}

fn row(peer: &PeerInfo) -> String {
    format!(
        "{:<21} {:>6.0}ms  ↑{:<10} ↓{:<10} {} ({})",
        peer.addr,
        peer.ping_time * 1_000.0,
        format_bytes(peer.bytes_sent),
        format_bytes(peer.bytes_recv),
        peer.subver,
        peer.version,
    )
}
