use crate::state::AppState;

/// Every text panel on the dashboard implements this trait.
///
/// Panels are purely reactive: they receive a read-only view of `AppState`
/// and return the lines to draw.  Layout is handled by the binary.
pub trait Panel: Send + Sync + std::fmt::Debug {
    /// Unique string identifier, e.g. `"status"` or `"balance"`.
    fn id(&self) -> &str;

    /// Heading drawn above the panel body.
    fn title(&self) -> &str;

    /// Render the panel body for the given state.
    fn lines(&self, state: &AppState) -> Vec<String>;
}
