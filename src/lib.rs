pub mod app;
pub mod bridge;
pub mod cli;
pub mod client;
pub mod config;
pub mod dom;
pub mod error;
pub mod logging;
pub mod output;
pub mod product;

#[cfg(test)]
mod tests;
