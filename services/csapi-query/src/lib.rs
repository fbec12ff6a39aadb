//! CSAPI query command-line front end.
//!
//! Loads a collection description from disk and prints the query or
//! resource URL a client would request. Nothing is fetched.

pub mod cli;
pub mod config;

pub use cli::{Command, QueryArgs};
pub use config::load_collection;
