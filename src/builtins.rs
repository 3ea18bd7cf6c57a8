use crate::{
    error::RuntimeError,
    interpreter::{
        types::catalog::{MemberKind, TypeCatalog},
        value::{core::Value, object::ObjectRef},
    },
};

/// Markers constructed from documents.
///
/// `interplay.Info` attaches a line of information to an interaction;
/// `interplay.Contains` and `interplay.LineCount` attach output checks.
pub mod annotations;
/// Lists and collections from `java.util`.
pub mod collections;
/// Objects, strings, boxed numbers, `Math` and `StringBuilder` from
/// `java.lang`.
pub mod lang;

/// A native implementation as stored in a table.
pub type HostFn = fn(&[Value]) -> Result<Value, String>;

/// One entry of a native table.
pub struct NativeDef {
    /// Constructor, static or instance member.
    pub kind:      MemberKind,
    /// The fully-qualified declaring type.
    pub type_name: &'static str,
    /// The member name; empty for constructors.
    pub name:      &'static str,
    /// The parameter signature.
    pub signature: &'static str,
    /// The implementation.
    pub func:      HostFn,
}

/// Defines a static table of natives.
///
/// Each entry names the member kind, the declaring type, the member name
/// (omitted for constructors), the signature and the implementing function:
///
/// ```text
/// Constructor "java.lang.Object" "()" => object_new,
/// Instance "java.lang.Object" . "toString" "()" => object_to_string,
/// ```
macro_rules! natives {
    (
        $table:ident {
            $(
                $kind:ident $type_name:literal $(. $name:literal)? $signature:literal => $func:expr
            ),* $(,)?
        }
    ) => {
        pub static $table: &[$crate::builtins::NativeDef] = &[
            $(
                $crate::builtins::NativeDef {
                    kind:      $crate::interpreter::types::catalog::MemberKind::$kind,
                    type_name: $type_name,
                    name:      natives!(@name $($name)?),
                    signature: $signature,
                    func:      $func,
                },
            )*
        ];
    };
    (@name) => { "" };
    (@name $name:literal) => { $name };
}

pub(crate) use natives;

/// Declares the default host types and files every native of the default
/// host library into `catalog`.
///
/// # Errors
/// Returns the first error raised while filing a native.
pub fn install(catalog: &mut TypeCatalog) -> Result<(), RuntimeError> {
    lang::declare(catalog);
    collections::declare(catalog);
    annotations::declare(catalog);

    for table in [lang::NATIVES, collections::NATIVES, annotations::NATIVES] {
        define_table(catalog, table)?;
    }

    Ok(())
}

/// Returns a catalog with the default host library installed.
///
/// # Errors
/// Returns the first error raised while filing a native table.
pub fn catalog() -> Result<TypeCatalog, RuntimeError> {
    let mut catalog = TypeCatalog::new();
    install(&mut catalog)?;
    Ok(catalog)
}

/// Files every entry of `table` into `catalog`.
///
/// # Errors
/// Returns the first error raised by the catalog.
pub fn define_table(catalog: &mut TypeCatalog, table: &[NativeDef]) -> Result<(), RuntimeError> {
    for def in table {
        match def.kind {
            MemberKind::Constructor => {
                catalog.define_constructor(def.type_name, def.signature, def.func)?;
            },
            MemberKind::Static => {
                catalog.define_static(def.type_name, def.name, def.signature, def.func)?;
            },
            MemberKind::Instance => {
                catalog.define_instance(def.type_name, def.name, def.signature, def.func)?;
            },
        }
    }

    Ok(())
}

/// Returns argument `index`, or an error naming the missing position.
///
/// # Errors
/// Returns a message if there is no such argument.
pub fn arg(args: &[Value], index: usize) -> Result<&Value, String> {
    args.get(index).ok_or_else(|| format!("missing argument {}", index + 1))
}

/// Returns argument `index` as a string slice.
///
/// # Errors
/// Returns a message if the argument is missing or not a string.
pub fn arg_str(args: &[Value], index: usize) -> Result<&str, String> {
    let value = arg(args, index)?;
    value.as_str().ok_or_else(|| format!("expected a string, found {}", value.type_name()))
}

/// Returns argument `index` as an `i32`.
///
/// # Errors
/// Returns a message if the argument is missing or not an `Int`.
pub fn arg_int(args: &[Value], index: usize) -> Result<i32, String> {
    match arg(args, index)? {
        Value::Int(value) => Ok(*value),
        other => Err(format!("expected an int, found {}", other.type_name())),
    }
}

/// Returns argument `index` as an `i64`.
///
/// # Errors
/// Returns a message if the argument is missing or not a `Long`.
pub fn arg_long(args: &[Value], index: usize) -> Result<i64, String> {
    match arg(args, index)? {
        Value::Long(value) => Ok(*value),
        other => Err(format!("expected a long, found {}", other.type_name())),
    }
}

/// Returns argument `index` as an `f64`.
///
/// # Errors
/// Returns a message if the argument is missing or not a `Double`.
pub fn arg_double(args: &[Value], index: usize) -> Result<f64, String> {
    match arg(args, index)? {
        Value::Double(value) => Ok(*value),
        other => Err(format!("expected a double, found {}", other.type_name())),
    }
}

/// Returns argument `index` as a host object.
///
/// # Errors
/// Returns a message if the argument is missing or not an object.
pub fn arg_object(args: &[Value], index: usize) -> Result<&ObjectRef, String> {
    let value = arg(args, index)?;
    value.as_object()
         .ok_or_else(|| format!("expected an object, found {}", value.type_name()))
}

/// Converts a length or index to an `Int` value.
///
/// # Errors
/// Returns a message if `n` does not fit 32 bits.
pub fn int_value(n: usize) -> Result<Value, String> {
    i32::try_from(n).map(Value::Int).map_err(|_| format!("{n} exceeds the int range"))
}

/// Converts an `Int` index to `usize`, checking it against `len`.
///
/// # Errors
/// Returns a message in the host's out-of-bounds wording.
pub fn index_in(index: i32, len: usize) -> Result<usize, String> {
    usize::try_from(index).ok()
                          .filter(|i| *i < len)
                          .ok_or_else(|| format!("Index {index} out of bounds for length {len}"))
}
