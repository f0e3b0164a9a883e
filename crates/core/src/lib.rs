pub mod error;
pub mod shared;
pub mod state;
pub mod widget;

pub use error::{PanelError, Result};
pub use shared::SharedState;
pub use state::{AppState, NodeReport};
pub use widget::Panel;
