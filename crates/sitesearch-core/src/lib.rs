#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

//! sitesearch-core
//!
//! Types, tokenizer, configuration and corpus processing shared by the index
//! builder and the query engine.

pub mod chunking;
pub mod config;
pub mod data_processor;
pub mod error;
pub mod logging;
pub mod tokenize;
pub mod traits;
pub mod types;
pub mod vector;

pub use error::{Error, Result};
pub use tokenize::tokenize;
