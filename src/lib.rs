pub mod backend;
pub mod config;
pub mod domain;
pub mod float;
pub mod format;
pub mod fpcore;
pub mod function;
pub mod generator;
pub mod memory;
pub mod opts;
pub mod utils;
