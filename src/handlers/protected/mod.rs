// Protected handlers: every route in here sits behind the JWT auth gate and
// receives the resolved caller identity via request extensions.
pub mod sessions;
