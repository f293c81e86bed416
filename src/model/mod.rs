pub mod attendance;
pub mod campus;
pub mod stats;
