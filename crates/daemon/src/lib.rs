#![forbid(unsafe_code)]

//! EPUB validation daemon: accepts an upload over HTTP, runs the external
//! validator on it and relays the normalized report.

pub mod config;
pub mod error;
pub mod http;
pub mod runner;
pub mod upload;
