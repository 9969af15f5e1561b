pub mod client;
pub mod embed;
