//! Unit tests against the public library API

mod streak_tests;
mod analytics_tests;
