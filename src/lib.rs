//! A particle tree that morphs between a scattered cloud and an assembled
//! Christmas tree, plus the wish text shown over it.

pub mod component;
pub mod config;
pub mod sampler;
pub mod tree;
pub mod wish;
