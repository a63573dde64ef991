pub mod helpers;
pub mod local_hub;

pub use helpers::*;
pub use local_hub::{LocalHub, LocalTransport};
