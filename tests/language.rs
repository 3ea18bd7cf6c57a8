use std::fs::{self};

use interplay::{
    builtins,
    config::InterpreterConfig,
    error::{Error, ParseError, RuntimeError},
    interpreter::{
        document::{core::Document, interaction::InteractionLine},
        value::core::Value,
    },
    load_document,
};
use pretty_assertions::assert_eq;
use walkdir::WalkDir;

#[test]
fn book_examples_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("book/src").into_iter()
                                .filter_map(Result::ok)
                                .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
    {
        let path = entry.path();
        let content =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        for (i, code) in extract_dsl_blocks(&content).into_iter().enumerate() {
            count += 1;
            if let Err(e) = load_document(&code, &InterpreterConfig::default()) {
                panic!("Document example {} in {:?} failed:\n{}\nError: {:?}",
                       i + 1,
                       path,
                       code,
                       e);
            }
        }
    }

    assert!(count > 0, "No document examples found in book/src");
}

fn extract_dsl_blocks(content: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut inside = false;
    let mut buf = String::new();

    for line in content.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```interplay") {
            inside = true;
            buf.clear();
            continue;
        }
        if inside && trimmed.starts_with("```") {
            inside = false;
            blocks.push(buf.clone());
            continue;
        }
        if inside {
            buf.push_str(line);
            buf.push('\n');
        }
    }

    blocks
}

fn assert_success(src: &str) -> Document {
    load_document(src, &InterpreterConfig::default()).unwrap_or_else(|e| {
                                                         panic!("Document failed: {e}")
                                                     })
}

fn assert_failure(src: &str) -> Error {
    match load_document(src, &InterpreterConfig::default()) {
        Ok(_) => panic!("Document loaded but was expected to fail"),
        Err(e) => e,
    }
}

fn runtime_failure(src: &str) -> RuntimeError {
    match assert_failure(src) {
        Error::Runtime { source, .. } => source,
        other => panic!("Expected a runtime error, got: {other}"),
    }
}

fn transcript(document: &Document) -> String {
    document.entries().iter().map(ToString::to_string).collect()
}

fn variable(document: &Document, name: &str) -> Value {
    document.environment()
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("{name} is not bound"))
}

#[test]
fn list_is_created_and_substituted() {
    let document = assert_success("<code>\nimport java.util.ArrayList\nconstructor \
                                   ArrayList()\nx = new ArrayList()\n</code>\n$x add");

    assert_eq!(transcript(&document), "[] add\n");
    assert_eq!(variable(&document, "x").type_name(), "java.util.ArrayList");
}

#[test]
fn addition_is_substituted() {
    let document = assert_success("> x = 3 + 4\n$x");

    assert_eq!(transcript(&document), "7\n");
}

#[test]
fn addition_promotes_operands() {
    let document = assert_success("> a = 1 + 2\n> b = 1 + 2L\n> c = 1 + 2.5\n> d = 2 + \"x\"\n> e \
                                   = 1.5f + 1");

    assert_eq!(variable(&document, "a"), Value::Int(3));
    assert_eq!(variable(&document, "b"), Value::Long(3));
    assert_eq!(variable(&document, "c"), Value::Double(3.5));
    assert_eq!(variable(&document, "d"), Value::from("2x"));
    assert_eq!(variable(&document, "e"), Value::Float(2.5));
}

#[test]
fn addition_uses_exactly_representable_kinds() {
    let document = assert_success("> a = 20000000 + 1.5f\n> b = 9007199254740993 + 1.0\n> c = \
                                   1.0 + 9007199254740993\n> d = 20000001 + 1.5f\n$a");

    assert_eq!(variable(&document, "a"), Value::Float(20_000_002.0));
    assert_eq!(variable(&document, "b"), Value::Long(9_007_199_254_740_994));
    assert_eq!(variable(&document, "c"), Value::Long(9_007_199_254_740_994));
    assert_eq!(variable(&document, "d"), Value::Float(20_000_002.0));
    assert_eq!(transcript(&document), "2.0000002E7\n");
}

#[test]
fn floating_values_print_like_the_host() {
    let document = assert_success("> x = 1.5 + 0\n> y = 10000000.0 + 0\n> z = 0.0001 + 0\n$x $y $z");

    assert_eq!(transcript(&document), "1.5 1.0E7 1.0E-4\n");
}

#[test]
fn integer_overflow_is_an_error() {
    let error = assert_failure("\n> big = 2147483647 + 1");

    assert!(matches!(error,
                     Error::Runtime { line: 2,
                                      source: RuntimeError::Overflow { .. }, }));
}

#[test]
fn quoted_text_keeps_its_blanks() {
    let document = assert_success("> s = \"  a,b  \"\n> t =   a,b  \n[$s] [$t]");

    assert_eq!(transcript(&document), "[  a,b  ] [a,b]\n");
}

#[test]
fn variables_are_read_back() {
    let document = assert_success("> x = 5\n> y = x + 1\n$y");

    assert_eq!(transcript(&document), "6\n");
}

#[test]
fn unbound_names_stay_verbatim() {
    let document = assert_success("cost: $price");

    assert_eq!(transcript(&document), "cost: $price\n");
}

#[test]
fn comments_are_ignored() {
    let document = assert_success("// header\n> x = 1 // set x\n$x");

    assert_eq!(transcript(&document), "1\n");
}

#[test]
fn slashes_inside_values_are_kept() {
    let document = assert_success("> u = http://example.org\n> v = a // note\n$u [$v]");

    assert_eq!(transcript(&document), "http://example.org [a]\n");
}

#[test]
fn host_library_installs() {
    assert!(builtins::catalog().is_ok());
    assert!(Document::new(&InterpreterConfig::default()).is_ok());
}

#[test]
fn import_is_idempotent() {
    assert_success("> import java.util.List\n> import java.util.List");
}

#[test]
fn import_of_a_second_type_with_the_same_short_name_fails() {
    let mut catalog = builtins::catalog().unwrap();
    catalog.declare_type("java.awt.List", &[]);
    let mut document = Document::with_catalog(catalog, &InterpreterConfig::default());

    let error = document.load("> import java.util.List\n> import java.awt.List")
                        .expect_err("conflicting import accepted");

    assert!(matches!(error,
                     Error::Runtime { line: 2,
                                      source: RuntimeError::AmbiguousImport { .. }, }));
}

#[test]
fn import_of_an_unknown_type_fails() {
    let error = runtime_failure("> import java.util.Nothing");

    assert!(matches!(error, RuntimeError::UnresolvableType { .. }));
}

#[test]
fn markers_are_attached_to_entries() {
    let source = "<code>
constructor interplay.Info(String)
constructor interplay.Contains(String)
hint = new interplay.Info(\"enter two numbers\")
check = new interplay.Contains(\"sum\")
</code>
$hint
<< 3 4
sum: 7
$check";
    let document = assert_success(source);

    let entries = document.entries();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].is_trivial());
    assert_eq!(entries[1].lines,
               vec![InteractionLine::Input("3 4".to_string()),
                    InteractionLine::Output("sum: 7".to_string())]);
    assert_eq!(entries[1].to_string(),
               "# enter two numbers\n<< 3 4\nsum: 7\n~ output contains \"sum\"\n");

    assert!(document.analyze(&["sum: 7".to_string()]).is_empty());
    assert_eq!(document.analyze(&["total: 7".to_string()]).len(), 1);
}

#[test]
fn line_count_marker_checks_output_length() {
    let document = assert_success("> constructor interplay.LineCount(int)\n> lines = new \
                                   interplay.LineCount(2)\none\ntwo\n$lines");

    assert!(document.analyze(&["one".to_string(), "two".to_string()]).is_empty());
    assert_eq!(document.analyze(&["one".to_string()]).len(), 1);
}

#[test]
fn leading_output_needs_no_empty_entry() {
    let document = assert_success("hello\n\n<< 1");

    assert_eq!(document.entries().len(), 2);
    assert_eq!(transcript(&document), "hello\n<< 1\n");
}

#[test]
fn static_operations_are_reached_through_the_type_name() {
    let document = assert_success("> static Math.max(int, int)\n> static Math.max(double, \
                                   double)\n> a = Math.max(3, 4)\n> b = Math.max(3, 4.5)");

    assert_eq!(variable(&document, "a"), Value::Int(4));
    assert_eq!(variable(&document, "b"), Value::Double(4.5));
}

#[test]
fn static_operation_is_not_confused_with_the_receiver() {
    let document = assert_success("> static String.join(CharSequence, Object...)\n> s = \
                                   String.join(\"-\", 1, 2, 3)");

    assert_eq!(variable(&document, "s"), Value::from("1-2-3"));
}

#[test]
fn failed_fallback_reports_the_receiver_error() {
    let error = runtime_failure("> y = nothing.foo()");

    assert!(matches!(error, RuntimeError::NoHandle { ref operation, .. } if operation == "foo"));
}

#[test]
fn virtual_operations_reach_known_subclasses() {
    let source = "<code>
import java.util.List
import java.util.ArrayList
constructor ArrayList()
virtual List.add(Object)
virtual List.size()
list = new ArrayList()
list.add(\"a\")
list.add(2)
n = list.size()
</code>
$list has $n";
    let document = assert_success(source);

    assert_eq!(transcript(&document), "[a, 2] has 2\n");
}

#[test]
fn virtual_operations_reach_later_subclasses() {
    let source = "<code>
import java.util.List
virtual List.add(Object)
import java.util.LinkedList
constructor LinkedList()
l = new LinkedList()
l.add(1)
</code>
$l";
    let document = assert_success(source);

    assert_eq!(transcript(&document), "[1]\n");
}

#[test]
fn list_containing_itself_prints_a_placeholder() {
    let source = "<code>
import java.util.ArrayList
constructor ArrayList()
virtual ArrayList.add(Object)
l = new ArrayList()
l.add(1)
l.add(l)
</code>
$l";
    let document = assert_success(source);

    assert_eq!(transcript(&document), "[1, (this Collection)]\n");
}

#[test]
fn huge_initial_capacity_is_accepted() {
    let document = assert_success("> import java.util.ArrayList\n> constructor ArrayList(int)\n> \
                                   big = new ArrayList(2147483647)\n$big");

    assert_eq!(transcript(&document), "[]\n");
}

#[test]
fn overloads_are_tried_in_registration_order() {
    let source = "<code>
import java.util.ArrayList
import java.util.Collection
constructor ArrayList(Collection)
constructor ArrayList(int)
virtual ArrayList.add(Object)
a = new ArrayList(5)
a.add(1)
b = new ArrayList(a)
</code>
$a $b";
    let document = assert_success(source);

    assert_eq!(transcript(&document), "[1] [1]\n");
}

#[test]
fn narrowed_signature_restricts_arguments() {
    let source = "<code>
import java.util.ArrayList
constructor ArrayList()
virtual java.util.List.add(Object) -> (String)
list = new ArrayList()
list.add(\"a\")
list.add(3)
</code>";

    let error = assert_failure(source);

    assert!(matches!(error,
                     Error::Runtime { line: 7,
                                      source: RuntimeError::NoMatchingOverload { .. }, }));
}

#[test]
fn narrowed_return_type_converts_results() {
    let document = assert_success("> static Integer.parseInt(String) -> (String): long\n> n = \
                                   Integer.parseInt(\"42\")");

    assert_eq!(variable(&document, "n"), Value::Long(42));
}

#[test]
fn narrowed_parameters_widen_to_the_declared_kinds() {
    let document = assert_success("> static Math.max(long, long) -> (int, int)\n> a = Math.max(3, 4)");

    assert_eq!(variable(&document, "a"), Value::Long(4));

    let error = runtime_failure("> static Math.max(long, long) -> (int, int)\n> a = Math.max(3L, 4L)");

    assert!(matches!(error, RuntimeError::NoMatchingOverload { .. }));
}

#[test]
fn too_many_arguments_match_no_overload() {
    let error = runtime_failure("> static Integer.sum(int, int)\n> x = Integer.sum(1, 2, 3)");

    assert!(matches!(error, RuntimeError::NoMatchingOverload { .. }));
}

#[test]
fn unregistered_constructor_has_no_handle() {
    let error = runtime_failure("> x = new java.util.ArrayList()");

    assert!(matches!(error, RuntimeError::NoHandle { .. }));
}

#[test]
fn declaration_without_native_fails() {
    let error = runtime_failure("> static Math.max(String, String)");

    assert!(matches!(error, RuntimeError::NoSuchMember { .. }));
}

#[test]
fn malformed_signatures_fail() {
    let unknown = runtime_failure("> constructor java.util.ArrayList(Foo)");
    let arity = runtime_failure("> constructor java.util.ArrayList(int) -> (int, int)");

    assert!(matches!(unknown, RuntimeError::MalformedSignature { .. }));
    assert!(matches!(arity, RuntimeError::MalformedSignature { .. }));
}

#[test]
fn file_blocks_are_stored() {
    let document = assert_success("<file=input.txt>\n3 4\n5\n</file>");

    assert_eq!(document.file("input.txt"),
               Some(&["3 4".to_string(), "5".to_string()][..]));
    assert!(document.entries().is_empty());
}

#[test]
fn file_block_needs_a_name() {
    let error = assert_failure("<file>\nx\n</file>");

    assert!(matches!(error, Error::Parse(ParseError::MissingFileName { line: 1 })));
}

#[test]
fn unknown_block_fails() {
    let error = assert_failure("text\n\n<table>\n</table>");

    assert!(matches!(error, Error::Parse(ParseError::UnknownBlock { ref id, line: 3 }) if id == "table"));
}

#[test]
fn unterminated_block_fails() {
    let error = assert_failure("<code>\nx = 1");

    assert!(matches!(error, Error::Parse(ParseError::UnterminatedBlock { .. })));
}

#[test]
fn block_tags_ignore_case() {
    let document = assert_success("<CODE>\nx = 2\n</Code>\n$x");

    assert_eq!(transcript(&document), "2\n");
}
