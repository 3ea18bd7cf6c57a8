use crate::{
    builtins::{arg_int, arg_str, natives},
    interpreter::{
        types::catalog::TypeCatalog,
        value::{
            core::Value,
            marker::{INFORMATION_TYPE, Marker, OutputAnalyzer},
        },
    },
};

/// Type of the analyzer that looks for a substring in the output.
pub const CONTAINS_TYPE: &str = "interplay.Contains";
/// Type of the analyzer that counts output lines.
pub const LINE_COUNT_TYPE: &str = "interplay.LineCount";

/// Passes if some output line contains the needle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contains {
    needle: String,
}

impl OutputAnalyzer for Contains {
    fn type_name(&self) -> &'static str {
        CONTAINS_TYPE
    }

    fn describe(&self) -> String {
        format!("output contains \"{}\"", self.needle)
    }

    fn analyze(&self, output: &[String]) -> Result<(), String> {
        if output.iter().any(|line| line.contains(&self.needle)) {
            Ok(())
        } else {
            Err(format!("no line contains \"{}\"", self.needle))
        }
    }
}

/// Passes if the output has exactly the expected number of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCount {
    expected: usize,
}

impl OutputAnalyzer for LineCount {
    fn type_name(&self) -> &'static str {
        LINE_COUNT_TYPE
    }

    fn describe(&self) -> String {
        format!("output has {} lines", self.expected)
    }

    fn analyze(&self, output: &[String]) -> Result<(), String> {
        if output.len() == self.expected {
            Ok(())
        } else {
            Err(format!("found {} lines", output.len()))
        }
    }
}

/// Declares the marker types.
pub fn declare(catalog: &mut TypeCatalog) {
    for name in [INFORMATION_TYPE, CONTAINS_TYPE, LINE_COUNT_TYPE] {
        catalog.declare_type(name, &[]);
    }
}

natives! {
    NATIVES {
        Constructor "interplay.Info" "(String)" => info_new,
        Constructor "interplay.Contains" "(String)" => contains_new,
        Constructor "interplay.LineCount" "(int)" => line_count_new,
    }
}

fn info_new(args: &[Value]) -> Result<Value, String> {
    arg_str(args, 0).map(|text| Value::from(Marker::information(text)))
}

fn contains_new(args: &[Value]) -> Result<Value, String> {
    let needle = arg_str(args, 0)?.to_string();
    Ok(Value::from(Marker::analyzer(Contains { needle })))
}

fn line_count_new(args: &[Value]) -> Result<Value, String> {
    let expected = arg_int(args, 0)?;
    let expected = usize::try_from(expected).map_err(|_| format!("negative line count {expected}"))?;
    Ok(Value::from(Marker::analyzer(LineCount { expected })))
}
