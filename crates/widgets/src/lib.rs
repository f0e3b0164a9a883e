pub mod balance;
pub mod peers;
pub mod sparkline;
pub mod status;
pub mod transactions;

pub use balance::BalancePanel;
pub use peers::PeersPanel;
pub use sparkline::{SparkFrame, TextSparkline};
pub use status::StatusPanel;
pub use transactions::LatestTxPanel;
