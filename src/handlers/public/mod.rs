// Public handlers (no authentication required): account signup and login.
pub mod login;
pub mod users;

pub use login::login_post;
pub use users::user_post;
