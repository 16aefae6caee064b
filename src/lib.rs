pub mod catalog;
pub mod config;
pub mod oracle;
pub mod pipeline;
pub mod progress;
pub mod quality;
pub mod store;
pub mod textutil;
