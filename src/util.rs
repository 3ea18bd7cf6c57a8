/// Numeric kinds, literal parsing and conversion helpers.
///
/// This module defines the widening order shared by addition and argument
/// coercion, exact conversions between whole and floating-point numbers,
/// and the host platform's printed form of floating-point values.
pub mod num;
