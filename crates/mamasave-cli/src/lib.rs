//! mamasave-cli: HTTP inference service and command line tools around
//! `mamasave-classifiers`.
pub mod batch;
pub mod config;
pub mod server;
pub mod util;
