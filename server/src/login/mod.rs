pub mod ban_list;
pub mod error;
pub mod handshake;
pub mod handshake_manager;
pub mod validator;
