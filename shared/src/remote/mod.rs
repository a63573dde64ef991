pub mod call;
pub mod endpoint;
pub mod error;
pub mod handle;
pub mod interface;
pub mod messenger;
pub mod registry;
pub mod results;
pub mod ticket_queue;
pub mod transport;
pub mod value;
