pub mod catalog;
pub mod config;
pub mod generation;
pub mod llm;
pub mod planner;
pub mod playlist;
pub mod server;
