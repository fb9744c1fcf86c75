pub mod dispatcher;
pub mod session;

pub use dispatcher::RequestDispatcher;
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
