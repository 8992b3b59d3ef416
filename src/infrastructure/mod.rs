pub mod chrome_surface;
pub mod js_executor;
pub mod session;
pub mod surface;

pub use chrome_surface::ChromeSurface;
pub use js_executor::JsExecutor;
pub use session::SessionProvider;
pub use surface::{
    ElementQuery, ElementSnapshot, Locator, PartQuery, ScrollMetrics, ScrollTarget, Surface,
};
