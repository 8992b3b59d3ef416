//! 浏览器接入
//!
//! - `connection` - 连接到已开启调试端口的浏览器
//! - `headless` - 自行启动浏览器
//! - `session` - 每个目标一个隔离的浏览器上下文

pub mod connection;
pub mod headless;
pub mod session;

pub use connection::connect_to_browser;
pub use headless::launch_browser;
pub use session::ChromeSessions;
