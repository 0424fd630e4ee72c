#![doc = include_str!("../README.md")]

pub mod builtin;
pub mod middleware;
pub mod registry;

pub use builtin::*;
pub use middleware::*;
pub use registry::*;
