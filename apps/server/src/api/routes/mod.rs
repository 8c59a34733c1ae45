//! Route tables

pub mod pool;
