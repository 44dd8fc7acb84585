// src/lib.rs

//! SEO Metadata Audit Library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod services;
pub mod storage;
pub mod utils;
