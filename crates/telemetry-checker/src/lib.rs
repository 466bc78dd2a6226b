pub mod cli;
pub mod ingestor;
pub mod processor;
pub mod server;
pub mod settings;
