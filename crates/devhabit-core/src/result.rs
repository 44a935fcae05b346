//! Result type aliases for DevHabit.

use crate::DevHabitError;

/// A specialized `Result` type for DevHabit operations.
pub type DevHabitResult<T> = Result<T, DevHabitError>;
