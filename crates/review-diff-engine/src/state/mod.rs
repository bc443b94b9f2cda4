//! State management for the diff view.

mod navigation;
mod view_state;

pub use navigation::NavigationState;
pub use view_state::DiffViewState;
