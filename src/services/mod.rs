//! Domain core, independent of HTTP. Every operation takes the store handle
//! it runs against, so callers decide which database (or transaction) backs it.

pub mod access;
pub mod availability;
pub mod dashboard;
pub mod ledger;
pub mod rating;
pub mod workflow;
