pub mod result_sink;
pub mod session_bootstrap;
pub mod strategy;
pub mod text_filter;

pub use result_sink::{ResultSink, WorkbookSink};
pub use strategy::{ExtractionStrategy, PairedItemStrategy, PrimaryItemStrategy};
pub use text_filter::TextFilter;
