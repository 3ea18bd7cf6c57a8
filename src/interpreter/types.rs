/// The host type catalog.
///
/// Declares types with their supertypes and files the native
/// implementations that declarations in a document select by signature. It
/// replaces a reflective type system: nothing is discovered that the host
/// did not register.
pub mod catalog;
/// Textual type signatures.
///
/// Parses parameter lists such as `(int, String...)` and optional return
/// types into resolved `TypeRef`s.
pub mod signature;
/// The subclass index.
///
/// Records every type the first time it is referenced and keeps, for each,
/// the list of previously discovered subtypes.
pub mod discovery;
