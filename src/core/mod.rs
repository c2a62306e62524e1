pub mod assembler;
pub mod cleaner;
pub mod config;
pub mod engine;
pub mod report;
pub mod resolver;
pub mod splitter;
pub mod vocabulary;
