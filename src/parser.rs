use crate::reader;
use crate::tokens::Token;
use std::fmt;

/// One top-level form: the source text it came from and what it reads as.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub source: String,
    /// Synthetic list wrapping every node read from `source`.
    pub root: Token,
}

/// The brackets in the whole input don't balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError {
    /// Opening brackets left unclosed at the end of input. Negative when
    /// there are more `)` than `(`.
    pub unclosed: isize,
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unclosed > 0 {
            write!(f, "unbalanced brackets: {} unclosed '('", self.unclosed)
        } else {
            write!(f, "unbalanced brackets: {} unmatched ')'", -self.unclosed)
        }
    }
}

/// Split `source` into statements, one per top-level balanced form.
///
/// Fails as a whole if the brackets don't balance; no statement is returned
/// in that case.
pub fn split(source: &str) -> Result<Vec<Statement>, StructuralError> {
    let code = strip_comments(source);
    let statements = slice_statements(&code)?
        .into_iter()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| Statement {
            source: String::from(text),
            root: Token::List(reader::read(text)),
        })
        .collect::<Vec<_>>();
    log::debug!("split source into {} statements", statements.len());
    Ok(statements)
}

/// Drop everything from the first `;` on each line. A `;` directly after
/// a backslash is kept.
pub(crate) fn strip_comments(source: &str) -> String {
    source
        .split('\n')
        .map(|line| {
            let mut previous = None;
            for (index, c) in line.char_indices() {
                if c == ';' && previous != Some('\\') {
                    return &line[..index];
                }
                previous = Some(c);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// Brackets inside string literals are counted like any others. The reader
// does the same, so the two always agree on where a form ends; I'd rather
// they're consistently naive than subtly different.
fn slice_statements(code: &str) -> Result<Vec<&str>, StructuralError> {
    let mut statements = Vec::new();
    let mut depth: isize = 0;
    let mut start = 0;
    for (index, c) in code.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    statements.push(&code[start..=index]);
                    start = index + 1;
                }
            }
            _ => (),
        }
    }
    if depth != 0 {
        return Err(StructuralError { unclosed: depth });
    }
    // Whatever trails the last balanced form is kept, even if it's junk.
    statements.push(&code[start..]);
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(statements: &[Statement]) -> Vec<&str> {
        statements.iter().map(|s| s.source.as_str()).collect()
    }

    #[test]
    fn splits_top_level_forms() {
        let statements = split("(+ 2 3)\n(list 2 3)").unwrap();
        assert_eq!(sources(&statements), vec!["(+ 2 3)", "(list 2 3)"]);
    }

    #[test]
    fn multi_line_forms_stay_together() {
        let source = "(define \n\t(reverse lst) \n\t(if (eql (length lst) 0) \n\t\t(list)\n\t)\n)";
        let statements = split(source).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].source, source);
    }

    #[test]
    fn root_wraps_the_read_form() {
        let statements = split("(+ 2 3)").unwrap();
        assert_eq!(
            statements[0].root,
            Token::List(vec![Token::List(vec![
                Token::new_symbol("+"),
                Token::NumberLiteral(2.0),
                Token::NumberLiteral(3.0),
            ])])
        );
    }

    #[test]
    fn comments_are_removed() {
        let statements = split("; a comment\n(+ 1 2) ; trailing ; more\n;(ignored)").unwrap();
        assert_eq!(sources(&statements), vec!["(+ 1 2)"]);
    }

    #[test]
    fn escaped_semicolon_is_not_a_comment() {
        assert_eq!(strip_comments(r"(a \; b) ; gone"), r"(a \; b) ");
    }

    #[test]
    fn trailing_text_is_kept() {
        let statements = split("(set x 40)\nx").unwrap();
        assert_eq!(sources(&statements), vec!["(set x 40)", "x"]);
        assert_eq!(
            statements[1].root,
            Token::List(vec![Token::new_symbol("x")])
        );
    }

    #[test]
    fn blank_input_has_no_statements() {
        assert!(split("").unwrap().is_empty());
        assert!(split("  \n\t; only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn unclosed_bracket_is_an_error() {
        assert_eq!(split("(+ 2 3"), Err(StructuralError { unclosed: 1 }));
        assert_eq!(
            split("(+ 1 2)\n(list (+ 2 3)"),
            Err(StructuralError { unclosed: 1 })
        );
    }

    #[test]
    fn surplus_close_bracket_is_an_error() {
        let err = split("(+ 2 3))").unwrap_err();
        assert_eq!(err.unclosed, -1);
        assert_eq!(err.to_string(), "unbalanced brackets: 1 unmatched ')'");
    }

    #[test]
    fn bracket_in_comment_does_not_count() {
        assert_eq!(split("(+ 2 3) ; (").unwrap().len(), 1);
    }
}
