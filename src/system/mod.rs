pub mod collector;
pub mod connection;
pub mod dns;
pub mod launch;
pub mod network;
pub mod platform;
pub mod process;
pub mod scheduler;
pub mod snapshot;
pub mod source;
