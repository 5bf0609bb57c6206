//! Syntax layer tests
//!
//! Entity model construction and tree shape.

pub mod tests_entity_model;
