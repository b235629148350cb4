//! Classify Entra ID groups as cloud-only or synchronized from on-premises AD.

pub mod classify;
pub mod cmd;
pub mod config;
pub mod error;
pub mod graph;
pub mod report;
