//! Core functionality: the document wrapper, file operations and configuration

pub mod config;
pub mod document;
pub mod file_system;
