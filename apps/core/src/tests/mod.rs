//! Test Module
//!
//! Cross-module test suite for the survey analysis binary.
//!
//! ## Test Categories
//! - `doubles`: Strategy implementations standing in for the enhanced components
//! - `text_pipeline_tests`: Tokenization, keywords, co-occurrences, sentiment, fallbacks
//! - `factor_tests`: Standardization, factor extraction, result shape
//! - `cli_tests`: Argument parsing, configuration, rendered output and exit status
