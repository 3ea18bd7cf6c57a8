/// Host object support.
///
/// Defines `ObjectRef`, the shared handle to a host-created instance, and the
/// `Instance` trait natives use to downcast an object's state.
pub mod object;
/// Out-of-band annotation values.
///
/// Defines `Marker` values and the `OutputAnalyzer` trait. Markers are bound
/// like any other value but are attached to interaction entries instead of
/// being printed.
pub mod marker;

pub mod core;
