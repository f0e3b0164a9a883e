use chrono::{Local, TimeZone};
use duos_core::{state::TransactionExcerpt, AppState, Panel};

/// Rows shown by the latest-transactions grid.
const PAGE_SIZE: usize = 10;

/// Latest wallet transactions: category, time, txid, amount.
#[derive(Debug, Default)]
pub struct LatestTxPanel;

impl LatestTxPanel {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for LatestTxPanel {
    fn id(&self) -> &str {
        "latest-txs"
    }

    fn title(&self) -> &str {
        "Latest transactions"
    }

    fn lines(&self, state: &AppState) -> Vec<String> {
        if state.last_txs.is_empty() {
            return vec!["No transactions".to_string()];
        }
        state.last_txs.iter().take(PAGE_SIZE).map(row).collect()
    }
}

fn row(tx: &TransactionExcerpt) -> String {
    let time = Local
        .timestamp_opt(tx.time, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{:<9} {:>16}  {}  {:>14.8}", tx.category, time, tx.txid, tx.amount)
}
