use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Central view-state; every panel and feed reads from this snapshot.
///
/// Populated by the status gatherer from [`NodeReport`]s written by the
/// wallet bridge, plus local host stats sampled in-process.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Node version / uptime / chain block.
    pub status: NodeStatus,
    /// Local miner hash rate (H/s). `None` until the bridge reports one.
    pub local_hashrate: Option<f64>,
    /// Estimated network hash rate (H/s). `None` until reported.
    pub network_hashrate: Option<f64>,
    pub height: u32,
    pub best_block: String,
    pub difficulty: f64,
    pub block_count: u64,
    pub net_last_block: u32,
    pub connections: u32,
    /// Confirmed wallet balance in DUO.
    pub balance: f64,
    /// Pending (unconfirmed) balance in DUO.
    pub unconfirmed: f64,
    pub txs_number: usize,
    /// Most recent wallet transactions, newest first.
    pub last_txs: Vec<TransactionExcerpt>,
    pub peers: Vec<PeerInfo>,
    /// Stats of the machine the panel runs on.
    pub local_host: LocalHost,
    /// Last problem reported while gathering status.
    pub alert: Option<Alert>,
    /// When the last bridge report was applied.
    pub updated_at: Option<DateTime<Local>>,
}

impl AppState {
    /// Merge a bridge report into the state.  Fields absent from the report
    /// keep their previous values.
    pub fn apply(&mut self, report: NodeReport) {
        if let Some(status) = report.status {
            self.status = status;
        }
        if report.hashes.is_some() {
            self.local_hashrate = report.hashes;
        }
        if report.net_hash.is_some() {
            self.network_hashrate = report.net_hash;
        }
        if let Some(v) = report.height {
            self.height = v;
        }
        if let Some(v) = report.best_block {
            self.best_block = v;
        }
        if let Some(v) = report.difficulty {
            self.difficulty = v;
        }
        if let Some(v) = report.block_count {
            self.block_count = v;
        }
        if let Some(v) = report.net_last_block {
            self.net_last_block = v;
        }
        if let Some(v) = report.connections {
            self.connections = v;
        }
        if let Some(v) = report.balance {
            self.balance = v;
        }
        if let Some(v) = report.unconfirmed {
            self.unconfirmed = v;
        }
        if let Some(v) = report.txs_number {
            self.txs_number = v;
        }
        if let Some(v) = report.last_txs {
            self.last_txs = v.txs;
        }
        if let Some(v) = report.peers {
            self.peers = v;
        }
    }
}

/// Node identification block shown by the status panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeStatus {
    #[serde(rename = "ver")]
    pub version: String,
    /// Seconds since the node started.
    pub uptime: u64,
    /// Network name, e.g. `"mainnet"`.
    pub net: String,
    pub chain: String,
}

/// One row of the latest-transactions grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionExcerpt {
    pub category: String,
    /// Unix timestamp (seconds).
    pub time: i64,
    pub txid: String,
    pub amount: f64,
    #[serde(default)]
    pub confirmations: i64,
}

/// Wrapper matching the bridge's `osLastTxs` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionList {
    pub txs: Vec<TransactionExcerpt>,
    #[serde(rename = "txsnumber")]
    pub txs_number: usize,
}

/// One connected peer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerInfo {
    pub addr: String,
    /// Round-trip time in seconds.
    #[serde(rename = "pingtime")]
    pub ping_time: f64,
    #[serde(rename = "bytessent")]
    pub bytes_sent: u64,
    #[serde(rename = "bytesrecv")]
    pub bytes_recv: u64,
    pub subver: String,
    pub version: u32,
}

/// Resource usage of the local machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocalHost {
    /// Per-core CPU usage (0.0 – 100.0).
    pub cpu_percent: Vec<f32>,
    pub mem_used: u64,
    pub mem_total: u64,
    pub disk_used: u64,
    pub disk_total: u64,
}

/// Severity of an [`Alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

/// A user-visible notice raised while gathering status.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub time: DateTime<Local>,
    pub title: String,
    pub message: String,
    pub kind: AlertKind,
}

impl Alert {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            time: Local::now(),
            title: title.into(),
            message: message.into(),
            kind: AlertKind::Error,
        }
    }
}

/// Snapshot written by the wallet bridge.  Keys follow the bridge's JSON
/// names; every field is optional so partial reports are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeReport {
    #[serde(rename = "osStatus")]
    pub status: Option<NodeStatus>,
    #[serde(rename = "osHashes")]
    pub hashes: Option<f64>,
    #[serde(rename = "osNetHash")]
    pub net_hash: Option<f64>,
    #[serde(rename = "osHeight")]
    pub height: Option<u32>,
    #[serde(rename = "osBestBlock")]
    pub best_block: Option<String>,
    #[serde(rename = "osDifficulty")]
    pub difficulty: Option<f64>,
    #[serde(rename = "osBlockCount")]
    pub block_count: Option<u64>,
    #[serde(rename = "osNetlastBlock")]
    pub net_last_block: Option<u32>,
    #[serde(rename = "osConnections")]
    pub connections: Option<u32>,
    #[serde(rename = "osBalance")]
    pub balance: Option<f64>,
    #[serde(rename = "osUnconfirmed")]
    pub unconfirmed: Option<f64>,
    #[serde(rename = "osTxsNumber")]
    pub txs_number: Option<usize>,
    #[serde(rename = "osLastTxs")]
    pub last_txs: Option<TransactionList>,
    pub peers: Option<Vec<PeerInfo>>,
}
