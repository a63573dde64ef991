pub mod bridge;
pub mod change;
pub mod error;
pub mod execution;
pub mod random;
pub mod random_stats;
pub mod remotes;
pub mod session;
