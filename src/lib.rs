pub mod config;
pub mod live;
pub mod logging;
pub mod model;
pub mod output;
pub mod scoring;
pub mod store;
pub mod summary;
