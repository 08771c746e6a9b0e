//! # Integration Flows

pub mod conservation;
pub mod registration;
pub mod scenarios;
pub mod settlement;
