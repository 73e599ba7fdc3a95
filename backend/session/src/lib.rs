pub mod reaper;
pub mod session;
pub mod store;

pub use reaper::SessionReaper;
pub use session::{Session, SessionSnapshot, SessionState};
pub use store::SessionStore;
