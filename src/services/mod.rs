pub mod ownership;
pub mod session_service;
