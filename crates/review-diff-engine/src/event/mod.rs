//! Events emitted by the diff view.

mod diff_event;

pub use diff_event::DiffEvent;
