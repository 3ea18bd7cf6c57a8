use logos::Logos;

/// Represents a lexical token of a code line.
///
/// Statements such as imports and declarations are recognised as a single
/// token so the reducer can hand them to the registry whole. Everything the
/// grammar does not give a meaning to lexes as `Word`, `Space` or `Char` and
/// accumulates into literal text.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// `import java.util.List`
    #[regex(r"import[ \t]+[A-Za-z_][A-Za-z0-9_.$]*", parse_import)]
    Import(String),
    /// `constructor T(..)`, `static T.op(..)` or `virtual T.op(..)`, with an
    /// optional `-> (..)` narrowed signature and `: R` return type.
    #[regex(r"(constructor|static|virtual)[ \t]+[A-Za-z_][A-Za-z0-9_.$]*[ \t]*\([^)\n]*\)([ \t]*->[ \t]*\([^)\n]*\)([ \t]*:[ \t]*[A-Za-z_][A-Za-z0-9_.$\[\]]*)?)?",
            parse_declaration,
            allow_greedy = true)]
    Declaration(Declaration),
    /// `.op(`
    #[regex(r"\.[ \t]*[A-Za-z_][A-Za-z0-9_]*[ \t]*\(", parse_call)]
    Call(String),
    /// `new T(`
    #[regex(r"new[ \t]+[A-Za-z_][A-Za-z0-9_.$]*[ \t]*\(", parse_new)]
    New(String),
    /// `name =`
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*[ \t]*=", parse_assign)]
    Assign(String),
    /// `,`
    #[token(",")]
    Comma,
    /// `)`
    #[token(")")]
    Close,
    /// `+`
    #[token("+")]
    Plus,
    /// A double-quoted run of text, quotes included.
    #[regex(r#""[^"\n]*""#, |lex| lex.slice().to_string(), allow_greedy = true)]
    Quoted(String),
    /// A run of letters, digits and underscores.
    #[regex(r"[A-Za-z0-9_]+", |lex| lex.slice().to_string())]
    Word(String),
    /// A run of blanks.
    #[regex(r"[ \t]+", |lex| lex.slice().to_string())]
    Space(String),
    /// Any other single character.
    #[regex(r"[^A-Za-z0-9_ \t\n,)+]", |lex| lex.slice().to_string())]
    Char(String),
    /// Line terminator.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        Token::NewLine
    })]
    NewLine,
}

/// A registration statement.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Declaration {
    /// What is being registered.
    pub kind:      DeclarationKind,
    /// The type as written.
    pub type_name: String,
    /// The operation name; `None` for constructors.
    pub operation: Option<String>,
    /// The parameter signature, parentheses included.
    pub params:    String,
    /// The narrowed signature after `->`, if any.
    pub narrowed:  Option<String>,
}

/// The keyword a declaration starts with.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DeclarationKind {
    /// `constructor`
    Constructor,
    /// `static`
    Static,
    /// `virtual`
    Virtual,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

fn parse_import(lex: &logos::Lexer<Token>) -> Option<String> {
    lex.slice().strip_prefix("import").map(|name| name.trim().to_string())
}

/// Splits a declaration into its keyword, target, and signatures.
///
/// # Returns
/// - `None` if a static or virtual declaration names no operation, which
///   makes the lexer report an error.
fn parse_declaration(lex: &logos::Lexer<Token>) -> Option<Declaration> {
    let (keyword, rest) = lex.slice().split_once([' ', '\t'])?;
    let kind = match keyword {
        "constructor" => DeclarationKind::Constructor,
        "static" => DeclarationKind::Static,
        "virtual" => DeclarationKind::Virtual,
        _ => return None,
    };

    let open = rest.find('(')?;
    let close = open + rest[open..].find(')')?;
    let target = rest[..open].trim();
    let narrowed = rest[close + 1..].trim()
                                    .strip_prefix("->")
                                    .map(|narrowed| narrowed.trim().to_string());

    let (type_name, operation) = match kind {
        DeclarationKind::Constructor => (target, None),
        _ => {
            let (type_name, operation) = target.rsplit_once('.')?;
            (type_name, Some(operation.to_string()))
        },
    };

    Some(Declaration { kind,
                       type_name: type_name.to_string(),
                       operation,
                       params: rest[open..=close].to_string(),
                       narrowed })
}

fn parse_call(lex: &logos::Lexer<Token>) -> String {
    lex.slice().trim_start_matches('.').trim_end_matches('(').trim().to_string()
}

fn parse_new(lex: &logos::Lexer<Token>) -> String {
    lex.slice()
       .trim_start_matches("new")
       .trim_end_matches('(')
       .trim()
       .to_string()
}

fn parse_assign(lex: &logos::Lexer<Token>) -> String {
    lex.slice().trim_end_matches('=').trim().to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        Token::lexer(source).map(|token| token.expect("lexes")).collect()
    }

    #[test]
    fn declarations_are_single_tokens() {
        assert_eq!(lex("virtual List.add(Object) -> (String): boolean"),
                   vec![Token::Declaration(Declaration { kind:      DeclarationKind::Virtual,
                                                         type_name: "List".to_string(),
                                                         operation: Some("add".to_string()),
                                                         params:    "(Object)".to_string(),
                                                         narrowed:  Some("(String): boolean".to_string()), })]);
        assert_eq!(lex("constructor java.util.ArrayList()"),
                   vec![Token::Declaration(Declaration { kind:      DeclarationKind::Constructor,
                                                         type_name: "java.util.ArrayList".to_string(),
                                                         operation: None,
                                                         params:    "()".to_string(),
                                                         narrowed:  None, })]);
    }

    #[test]
    fn static_declaration_requires_an_operation() {
        assert!(Token::lexer("static Math(int)").any(|token| token.is_err()));
    }

    #[test]
    fn calls_and_assignments() {
        assert_eq!(lex("x = new ArrayList().add(3, \"a b\")"),
                   vec![Token::Assign("x".to_string()),
                        Token::Space(" ".to_string()),
                        Token::New("ArrayList".to_string()),
                        Token::Close,
                        Token::Call("add".to_string()),
                        Token::Word("3".to_string()),
                        Token::Comma,
                        Token::Space(" ".to_string()),
                        Token::Quoted("\"a b\"".to_string()),
                        Token::Close]);
    }

    #[test]
    fn keywords_inside_words_are_text() {
        assert_eq!(lex("important news"),
                   vec![Token::Word("important".to_string()),
                        Token::Space(" ".to_string()),
                        Token::Word("news".to_string())]);
    }

    #[test]
    fn slashes_are_text_and_lines_are_counted() {
        let mut lexer = Token::lexer("http://x\nb");

        assert_eq!(lexer.next(), Some(Ok(Token::Word("http".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(Token::Char(":".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(Token::Char("/".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(Token::Char("/".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(Token::Word("x".to_string()))));
        assert_eq!(lexer.next(), Some(Ok(Token::NewLine)));
        assert_eq!(lexer.extras.line, 1);
        assert_eq!(lexer.next(), Some(Ok(Token::Word("b".to_string()))));
    }
}
