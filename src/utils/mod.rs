pub mod events;
pub mod logging;

pub use events::{EventEmitter, EventLevel, RunEvent};
