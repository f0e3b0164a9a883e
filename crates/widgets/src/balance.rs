use duos_core::{AppState, Panel};

/// Wallet balance card.  Amounts are shown with 8 decimal places.
#[derive(Debug, Default)]
pub struct BalancePanel;

impl BalancePanel {
    pub fn new() -> Self {
        Self
    }
}

impl Panel for BalancePanel {
    fn id(&self) -> &str {
        "balance"
    }

    fn title(&self) -> &str {
        "Balance"
    }

    fn lines(&self, state: &AppState) -> Vec<String> {
        vec![
            format!("{:.8} DUO", state.balance),
            format!("Pending: {:.8}", state.unconfirmed),
            format!("Transactions: {}", state.txs_number),
        ]
    }
}
