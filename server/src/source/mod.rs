pub mod poller;
pub mod stats;
