//! Shared benchmark configuration and data generators.

#![allow(dead_code)]

pub mod criterion_config;
pub mod data;
