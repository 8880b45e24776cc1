use crate::tokens::Token;
use regex::Regex;

/// Read `text` into a sequence of sibling nodes.
///
/// Never fails. Malformed text is read as well as it can be: an unclosed
/// string swallows the rest of the input, an unclosed `(` takes everything
/// after it as its children. Bracket balance is checked by the parser, not
/// here.
pub fn read(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let (token, remainder) = read_form(rest);
        log::trace!("read {} ({})", token, token.kind());
        tokens.push(token);
        rest = remainder.trim();
    }
    tokens
}

// `text` is non-empty and has no leading whitespace.
fn read_form(text: &str) -> (Token, &str) {
    if text.starts_with('(') {
        read_list(text)
    } else if text.starts_with('"') {
        read_string(text)
    } else {
        read_atom(text)
    }
}

fn read_list(text: &str) -> (Token, &str) {
    match matching_bracket(text) {
        Some(close) => (Token::List(read(&text[1..close])), &text[close + 1..]),
        None => (Token::List(read(&text[1..])), ""),
    }
}

/// Byte index of the `)` closing the `(` that `text` starts with.
fn matching_bracket(text: &str) -> Option<usize> {
    let mut depth: isize = 0;
    for (index, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => (),
        }
    }
    None
}

fn read_string(text: &str) -> (Token, &str) {
    let contents = &text[1..];
    match contents.find('"') {
        Some(close) => (
            Token::StringLiteral(String::from(&contents[..close])),
            &contents[close + 1..],
        ),
        None => (Token::StringLiteral(String::from(contents)), ""),
    }
}

fn read_atom(text: &str) -> (Token, &str) {
    let end = text.find(char::is_whitespace).unwrap_or_else(|| text.len());
    let (word, rest) = text.split_at(end);
    let token = match parse_number(word) {
        Some(n) => Token::NumberLiteral(n),
        None => Token::new_symbol(word),
    };
    (token, rest)
}

/// Decimal numbers only: optional sign, digits with an optional fraction,
/// optional exponent, or an explicit infinity.
pub(crate) fn parse_number(word: &str) -> Option<f64> {
    lazy_static! {
        static ref NUMBER_RE: Regex = Regex::new(
            r#"(?x)                          # ignore whitespace in this pattern & allow comments
                ^
                (?P<sign>[+-])?
                (?:
                    (?P<infinity>Infinity)
                    |(?:\d+\.?\d*|\.\d+)     # 12, 12., 12.5, .5
                     (?:[eE][+-]?\d+)?       # optional exponent
                )
                $
            "#
        )
        .unwrap();
    }
    let caps = NUMBER_RE.captures(word)?;
    if caps.name("infinity").is_some() {
        return match caps.name("sign").map(|m| m.as_str()) {
            Some("-") => Some(f64::NEG_INFINITY),
            _ => Some(f64::INFINITY),
        };
    }
    word.parse::<f64>().ok()
}
