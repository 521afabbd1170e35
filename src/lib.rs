pub mod database_ops;
pub mod env_boot;
pub mod legacy;
pub mod media;
pub mod migrate;
pub mod normalization;
pub mod storage;
pub mod tracing;
pub mod web;

pub mod util {
    pub mod env;
}
