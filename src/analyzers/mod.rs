//! Survey response aggregation.
//!
//! This module collapses raw question/answer pairs into normalized records,
//! fills blank lecturers from the subject defaults, partitions records by
//! lecturer, subject or practitioner, averages the complexity and interest
//! scores per teaching role, and assembles the page-level views.

pub mod aggregate;
pub mod group;
pub mod normalize;
pub mod types;
pub mod utility;
pub mod views;
