pub mod cli;
pub mod config;
pub mod engine;
pub mod llm;
pub mod loader;
pub mod service;
pub mod tools;
pub mod ui;

#[cfg(test)]
mod testing;
