//! # Factor Module
//!
//! Latent factor extraction from semantic-differential (SD) ratings.
//!
//! ## Components
//! - `scales`: The eight rated scales and their column order
//! - `standardize`: Matrix construction and column standardization
//! - `routine`: Maximum-likelihood factor analysis
//! - `result`: Output data structure
//! - `extractor`: Main orchestrator

pub mod extractor;
pub mod result;
pub mod routine;
pub mod scales;
pub mod standardize;

pub use extractor::FactorExtractor;
pub use result::FactorResult;
