pub mod args;
pub mod calc;
pub mod config;
pub mod error;
pub mod marginals;
pub mod plot;
pub mod read;
pub mod reduce;
pub mod selftest;
