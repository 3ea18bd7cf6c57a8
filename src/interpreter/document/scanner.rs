use crate::error::ParseError;

/// One line of normalized document text with its original line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// The 1-based line number in the raw document.
    pub number: usize,
    /// The line's text without terminator or trailing comment.
    pub text:   String,
}

/// A top-level unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `<id=args> ... </id>`
    Tagged {
        /// The block identifier in lower case.
        id:   String,
        /// The text after `=` in the opening tag.
        args: Option<String>,
        /// The lines between the tags.
        body: Vec<SourceLine>,
        /// The line of the opening tag.
        line: usize,
    },
    /// A line starting with `>`, without the marker.
    Code(SourceLine),
    /// Consecutive plain lines.
    Interaction(Vec<SourceLine>),
    /// One or more blank lines.
    Blank,
}

/// Normalizes raw document text into numbered lines.
///
/// Carriage returns before line ends are dropped, lines whose first
/// non-blank characters are `//` are removed, and a `//` comment preceded by
/// whitespace is cut from the end of a line.
///
/// # Example
/// ```
/// use interplay::interpreter::document::scanner::normalize;
///
/// let lines = normalize("a\r\n// note\nb // trailing\nhttp://x");
/// let texts: Vec<_> = lines.iter().map(|l| (l.number, l.text.as_str())).collect();
///
/// assert_eq!(texts, vec![(1, "a"), (3, "b"), (4, "http://x")]);
/// ```
#[must_use]
pub fn normalize(source: &str) -> Vec<SourceLine> {
    source.split('\n')
          .enumerate()
          .filter_map(|(index, raw)| {
              let text = raw.strip_suffix('\r').unwrap_or(raw);
              if text.trim_start().starts_with("//") {
                  return None;
              }
              Some(SourceLine { number: index + 1,
                                text:   strip_comment(text).to_string(), })
          })
          .collect()
}

fn strip_comment(text: &str) -> &str {
    text.match_indices("//")
        .find(|(index, _)| text[..*index].ends_with([' ', '\t']))
        .map_or(text, |(index, _)| text[..index].trim_end())
}

/// Splits normalized lines into blocks.
///
/// Blocks are tried in order: a tagged block opening at the start of a line,
/// a `>` code line, a blank run, and otherwise an interaction block that
/// extends to the next line that is blank or starts another block.
#[derive(Debug)]
pub struct Scanner {
    lines:    Vec<SourceLine>,
    position: usize,
    pending:  Option<SourceLine>,
}

impl Scanner {
    /// Creates a scanner over normalized lines.
    #[must_use]
    pub fn new(lines: Vec<SourceLine>) -> Self {
        Self { lines,
               position: 0,
               pending: None }
    }

    fn next_line(&mut self) -> Option<SourceLine> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }
        let line = self.lines.get(self.position).cloned()?;
        self.position += 1;
        Some(line)
    }

    fn peek_line(&self) -> Option<&SourceLine> {
        self.pending.as_ref().or_else(|| self.lines.get(self.position))
    }

    fn tagged(&mut self,
              first: &SourceLine,
              id: &str,
              args: Option<String>,
              rest: &str)
              -> Result<Block, ParseError> {
        let closing = format!("</{}>", id.to_ascii_lowercase());
        let mut body = Vec::new();
        let mut current = SourceLine { number: first.number,
                                       text:   rest.to_string(), };
        let mut on_tag_line = true;

        loop {
            if let Some(offset) = current.text.to_ascii_lowercase().find(&closing) {
                let before = &current.text[..offset];
                if !before.trim().is_empty() {
                    body.push(SourceLine { number: current.number,
                                           text:   before.to_string(), });
                }
                let after = &current.text[offset + closing.len()..];
                if !after.trim().is_empty() {
                    self.pending = Some(SourceLine { number: current.number,
                                                     text:   after.to_string(), });
                }
                break;
            }

            if !(on_tag_line && current.text.trim().is_empty()) {
                body.push(current);
            }
            on_tag_line = false;

            current = self.next_line()
                          .ok_or_else(|| ParseError::UnterminatedBlock { id:   id.to_string(),
                                                                         line: first.number, })?;
        }

        Ok(Block::Tagged { id: id.to_ascii_lowercase(),
                           args,
                           body,
                           line: first.number })
    }
}

impl Iterator for Scanner {
    type Item = Result<Block, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.next_line()?;

        if first.text.trim().is_empty() {
            while self.peek_line().is_some_and(|line| line.text.trim().is_empty()) {
                self.next_line();
            }
            return Some(Ok(Block::Blank));
        }

        if let Some((id, args, rest)) = opening_tag(&first.text) {
            let (id, rest) = (id.to_string(), rest.to_string());
            return Some(self.tagged(&first, &id, args, &rest));
        }

        if let Some(code) = first.text.strip_prefix('>') {
            return Some(Ok(Block::Code(SourceLine { number: first.number,
                                                    text:   code.to_string(), })));
        }

        let mut lines = vec![first];
        while self.peek_line().is_some_and(|line| starts_interaction(&line.text)) {
            if let Some(line) = self.next_line() {
                lines.push(line);
            }
        }

        Some(Ok(Block::Interaction(lines)))
    }
}

fn starts_interaction(text: &str) -> bool {
    !text.trim().is_empty() && !text.starts_with('>') && opening_tag(text).is_none()
}

/// Recognises `<id>` or `<id=args>` at the start of `text`.
///
/// Returns the id, the args and the text after the tag.
fn opening_tag(text: &str) -> Option<(&str, Option<String>, &str)> {
    let inner = text.strip_prefix('<')?;
    let id_len = inner.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-'))
                      .unwrap_or(inner.len());
    let id = &inner[..id_len];
    if !id.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let after_id = &inner[id_len..];
    let close = after_id.find('>')?;
    let args = match &after_id[..close] {
        "" => None,
        tail => Some(tail.strip_prefix('=')?.to_string()),
    };

    Some((id, args, &after_id[close + 1..]))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scan(source: &str) -> Vec<Block> {
        Scanner::new(normalize(source)).collect::<Result<_, _>>()
                                       .expect("scans")
    }

    fn line(number: usize, text: &str) -> SourceLine {
        SourceLine { number,
                     text: text.to_string() }
    }

    #[test]
    fn blocks_in_order() {
        let blocks = scan("<code>\nx = 1\n</code>\n> y = 2\n\n\nhello\n<< 3\n<file=a.txt>\nA\n</FILE>");

        assert_eq!(blocks,
                   vec![Block::Tagged { id:   "code".to_string(),
                                        args: None,
                                        body: vec![line(2, "x = 1")],
                                        line: 1, },
                        Block::Code(line(4, " y = 2")),
                        Block::Blank,
                        Block::Interaction(vec![line(7, "hello"), line(8, "<< 3")]),
                        Block::Tagged { id:   "file".to_string(),
                                        args: Some("a.txt".to_string()),
                                        body: vec![line(10, "A")],
                                        line: 9, }]);
    }

    #[test]
    fn single_line_block_and_trailing_text() {
        let blocks = scan("<code>x = 1</code> after");

        assert_eq!(blocks,
                   vec![Block::Tagged { id:   "code".to_string(),
                                        args: None,
                                        body: vec![line(1, "x = 1")],
                                        line: 1, },
                        Block::Interaction(vec![line(1, " after")])]);
    }

    #[test]
    fn comment_lines_do_not_split_interactions() {
        let blocks = scan("a\n  // hidden\nb");

        assert_eq!(blocks, vec![Block::Interaction(vec![line(1, "a"), line(3, "b")])]);
    }

    #[test]
    fn unterminated_block() {
        let result: Result<Vec<_>, _> = Scanner::new(normalize("x\n<code>\ny = 1")).collect();

        assert!(matches!(result, Err(ParseError::UnterminatedBlock { line: 2, .. })));
    }

    #[test]
    fn input_marker_is_not_a_tag() {
        assert_eq!(opening_tag("<< 42"), None);
        assert_eq!(opening_tag("<3"), None);
        assert_eq!(opening_tag("<file=out.txt> x"), Some(("file", Some("out.txt".to_string()), " x")));
    }
}
