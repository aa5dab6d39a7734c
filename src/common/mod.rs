//! Common types and utilities shared by the document layer and the facade.

pub mod error;
pub mod unit;
pub mod xml;

pub use error::{Error, Result};
pub use unit::Length;
