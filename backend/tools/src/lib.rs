pub mod dispatch;
pub mod fallback;

pub use dispatch::ToolDispatch;
pub use fallback::FallbackResponder;
