//! Role based authorization.

mod checker;

pub use checker::*;
