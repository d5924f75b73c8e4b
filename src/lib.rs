pub mod cli;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod query;
pub mod store;
