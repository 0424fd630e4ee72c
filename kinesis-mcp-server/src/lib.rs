#![doc = include_str!("../README.md")]

pub mod client;
pub mod config;
pub mod limits;
pub mod telemetry;
pub mod tools;

pub use client::{AwsKinesis, KinesisApi, KinesisError, KinesisService, Operation, Params};
pub use config::{LogFormat, ServerConfig};
pub use tools::{DESTRUCTIVE_DISABLED_ADVISORY, build_registry, register_all};
