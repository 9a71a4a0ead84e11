//! Contribution rewriter for fixed-width payroll report files.
//!
//! This crate rewrites the pension contribution, life-expectancy
//! contribution, unemployment base and working schedule fields of monthly
//! social-security payroll reports, leaving every other byte of each record
//! untouched.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod encoding;
pub mod error;
pub mod models;
pub mod processing;
pub mod runner;
