pub mod answers;
pub mod questions;
pub mod session;
pub mod summary;

// Re-export handler functions for use in routing
pub use answers::post as answers_post;
pub use questions::get as questions_get;
pub use questions::post as questions_post;
pub use session::get as session_get;
pub use session::list as session_list;
pub use session::post as session_post;
pub use summary::get as summary_get;
