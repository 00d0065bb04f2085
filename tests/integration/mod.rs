//! End-to-end tests over a file-backed database

mod persistence_tests;
mod server_tests;
