// Strings in source are taken verbatim by the reader: there's no escape
// processing on the way in at all. So the only place escapes show up is when
// we echo a string back, and I've kept that to the three that matter for
// reading the output: \\, \" and \n. Keys are the letter after the
// backslash, values the character it stands for.

use bimap::BiMap;

lazy_static! {
    static ref ESCAPES: BiMap<char, char> = {
        let mut m = BiMap::new();
        m.insert('\\', '\\');
        m.insert('"', '"');
        m.insert('n', '\n');
        m
    };
}

/// Quote `contents` for echoing, escaping anything in `ESCAPES`.
pub(crate) fn string_repr(contents: &str) -> String {
    let escaped: String = contents
        .chars()
        .flat_map(|c| match ESCAPES.get_by_right(&c) {
            Some(&letter) => vec!['\\', letter],
            None => vec![c],
        })
        .collect();
    format!("\"{}\"", escaped)
}

/// Inverse of [`string_repr`], for text produced by it.
#[cfg(test)]
fn string_unrepr(repr: &str) -> String {
    let mut chars = repr[1..repr.len() - 1].chars();
    let mut output = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    output.push(*ESCAPES.get_by_left(&escaped).unwrap_or(&escaped));
                }
            }
            c => output.push(c),
        }
    }
    output
}
