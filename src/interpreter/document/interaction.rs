use std::fmt;

use crate::interpreter::{
    document::scanner::SourceLine,
    value::{
        core::Value,
        marker::{Marker, OutputAnalyzer},
    },
};

/// Prefix marking a line the program under test reads.
pub const INPUT_PREFIX: &str = "<<";

/// One line of an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionLine {
    /// Text the program is expected to print.
    Output(String),
    /// Text fed to the program.
    Input(String),
}

impl InteractionLine {
    /// The line's text without the input prefix.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Output(text) | Self::Input(text) => text,
        }
    }

    /// Returns `true` for input lines.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }
}

impl fmt::Display for InteractionLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Output(text) => write!(f, "{text}"),
            Self::Input(text) => write!(f, "{INPUT_PREFIX} {text}"),
        }
    }
}

/// One recorded unit of expected textual exchange.
///
/// Markers bound to variables referenced in the interaction are attached to
/// the entry instead of being printed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionEntry {
    /// The lines in document order.
    pub lines:   Vec<InteractionLine>,
    /// Information and analyzer markers attached to the entry.
    pub markers: Vec<Marker>,
}

impl InteractionEntry {
    /// Returns `true` if the entry starts with an input line.
    #[must_use]
    pub fn carries_input(&self) -> bool {
        self.lines.first().is_some_and(InteractionLine::is_input)
    }

    /// Returns `true` if the entry has neither lines nor markers.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.lines.is_empty() && self.markers.is_empty()
    }

    /// The information texts attached to the entry.
    pub fn information(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().filter_map(|marker| match marker {
                                           Marker::Information(text) => Some(&**text),
                                           Marker::Analyzer(_) => None,
                                       })
    }

    /// The analyzers attached to the entry.
    pub fn analyzers(&self) -> impl Iterator<Item = &dyn OutputAnalyzer> {
        self.markers.iter().filter_map(|marker| match marker {
                                           Marker::Analyzer(analyzer) => Some(&**analyzer),
                                           Marker::Information(_) => None,
                                       })
    }

    /// Runs every attached analyzer against `output`.
    ///
    /// # Returns
    /// One message per failed analyzer; empty if all passed.
    #[must_use]
    pub fn analyze(&self, output: &[String]) -> Vec<String> {
        self.analyzers()
            .filter_map(|analyzer| {
                analyzer.analyze(output)
                        .err()
                        .map(|reason| format!("{}: {reason}", analyzer.describe()))
            })
            .collect()
    }
}

impl fmt::Display for InteractionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for info in self.information() {
            writeln!(f, "# {info}")?;
        }
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        for analyzer in self.analyzers() {
            writeln!(f, "~ {}", analyzer.describe())?;
        }
        Ok(())
    }
}

/// Builds an entry from the lines of an interaction block.
///
/// Each `$name` is replaced by the printed form of its bound value. A name
/// bound to a marker attaches the marker and removes the reference; a line
/// left blank by that removal is dropped. Unbound names stay as written.
///
/// # Example
/// ```
/// use interplay::interpreter::{
///     document::{interaction::build_entry, scanner::normalize},
///     value::{core::Value, marker::Marker},
/// };
///
/// let lookup = |name: &str| match name {
///     "x" => Some(Value::Int(7)),
///     "hint" => Some(Value::Marker(Marker::information("say seven"))),
///     _ => None,
/// };
/// let entry = build_entry(&normalize("$hint\nresult: $x $y\n<< $x"), lookup);
///
/// assert_eq!(entry.to_string(), "# say seven\nresult: 7 $y\n<< 7\n");
/// assert!(!entry.carries_input());
/// ```
pub fn build_entry(lines: &[SourceLine], lookup: impl Fn(&str) -> Option<Value>) -> InteractionEntry {
    let mut entry = InteractionEntry::default();

    for line in lines {
        let (body, input) = match line.text.strip_prefix(INPUT_PREFIX) {
            Some(rest) => (rest.strip_prefix(' ').unwrap_or(rest), true),
            None => (line.text.as_str(), false),
        };

        let before = entry.markers.len();
        let text = substitute(body, &lookup, &mut entry.markers);
        if entry.markers.len() > before && text.trim().is_empty() {
            continue;
        }

        entry.lines.push(if input {
                             InteractionLine::Input(text)
                         } else {
                             InteractionLine::Output(text)
                         });
    }

    entry
}

/// Replaces every bound `$name` in `text`, moving markers into `markers`.
fn substitute(text: &str,
              lookup: &impl Fn(&str) -> Option<Value>,
              markers: &mut Vec<Marker>)
              -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(dollar) = rest.find('$') {
        result.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];
        let name_len = identifier_len(after);

        if name_len == 0 {
            result.push('$');
            rest = after;
            continue;
        }

        let name = &after[..name_len];
        match lookup(name) {
            Some(Value::Marker(marker)) => markers.push(marker),
            Some(value) => result.push_str(&value.to_string()),
            None => {
                result.push('$');
                result.push_str(name);
            },
        }
        rest = &after[name_len..];
    }

    result.push_str(rest);
    result
}

fn identifier_len(text: &str) -> usize {
    if !text.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return 0;
    }

    text.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::interpreter::document::scanner::normalize;

    #[test]
    fn input_prefix_and_one_space_are_removed() {
        let entry = build_entry(&normalize("<<  two spaces\n<<none"), |_| None);

        assert_eq!(entry.lines,
                   vec![InteractionLine::Input(" two spaces".to_string()),
                        InteractionLine::Input("none".to_string())]);
        assert!(entry.carries_input());
    }

    #[test]
    fn marker_inside_a_line_is_removed() {
        let info = Marker::information("note");
        let entry = build_entry(&normalize("a $info b"), |_| Some(Value::Marker(info.clone())));

        assert_eq!(entry.lines, vec![InteractionLine::Output("a  b".to_string())]);
        assert_eq!(entry.markers, vec![info]);
    }

    #[test]
    fn stray_dollars_are_kept() {
        let entry = build_entry(&normalize("cost: 5$ or $1"), |_| Some(Value::Int(0)));

        assert_eq!(entry.lines, vec![InteractionLine::Output("cost: 5$ or $1".to_string())]);
    }
}
