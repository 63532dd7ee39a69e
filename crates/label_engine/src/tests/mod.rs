//! Cross-component tests and the fixtures they share

pub mod support;
