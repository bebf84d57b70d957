//! Text cleaning and indentation helpers.
//!
//! The cleaner escapes exactly five characters and decodes exactly the five
//! entities it emits, so cleaning already-clean text is a no-op:
//!
//! | char | entity   |
//! |------|----------|
//! | `&`  | `&amp;`  |
//! | `<`  | `&lt;`   |
//! | `>`  | `&gt;`   |
//! | `"`  | `&quot;` |
//! | `'`  | `&#39;`  |

const ENTITIES: [(char, &str); 5] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#39;"),
];

/// Width of one indentation level in rendered output.
pub const INDENT_WIDTH: usize = 2;

/// Escapes `& < > " '` as HTML entities.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match ENTITIES.iter().find(|(ch, _)| *ch == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Decodes the five entities produced by [`escape_html`] in a single pass.
///
/// Any other `&` sequence is left as is.
pub fn unescape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES.iter().find(|(_, entity)| rest.starts_with(entity)) {
            Some((c, entity)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Removes control characters other than newline and tab.
pub fn strip_control(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Cleans free text for storage.
///
/// Strips control characters, trims surrounding whitespace and HTML-escapes
/// the result. Previously escaped entities are decoded first so that
/// `clean_text(clean_text(s)) == clean_text(s)`.
pub fn clean_text(s: &str) -> String {
    let stripped = strip_control(s);
    escape_html(&unescape_html(stripped.trim()))
}

/// Returns the leading whitespace for `level` indentation levels.
pub fn indent(level: usize) -> String {
    " ".repeat(level * INDENT_WIDTH)
}
