//! Terminal output

pub mod render;
