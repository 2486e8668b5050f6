//! Integration tests for NEAR Shell.

pub mod fake_node;

#[cfg(test)]
mod client_tests;
#[cfg(test)]
mod login_tests;
