//! Syntra — shared pieces of the `syntra` binary

pub mod render;
