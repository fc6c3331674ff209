//! Lexical sanitization of C/C++ source text.
//!
//! Blanks comment and string/char literal contents to spaces while keeping
//! every byte position and newline intact, so downstream passes can count
//! lines and braces on sanitized text without re-deriving comment state.
//! Decorative code inside doc comments or string literals would otherwise
//! produce false declaration and call matches.
//!
//! Performance characteristics:
//! - Single forward pass, O(n) in input bytes
//! - No lookback, no recursion, one output allocation

/// Character-level states of the sanitizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    StringLiteral,
    CharLiteral,
}

/// Replaces comment and literal contents with spaces, preserving layout.
///
/// Invariants:
/// - output byte length equals input byte length
/// - newlines are never blanked, so line numbers computed from either
///   text are identical
/// - idempotent: sanitizing sanitized text is a no-op
pub fn sanitize(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut state = State::Code;
    let mut i = 0;

    while i < bytes.len() {
        let ch = bytes[i];
        let next = bytes.get(i + 1).copied();

        match state {
            State::Code => {
                if ch == b'/' && next == Some(b'/') {
                    out.extend_from_slice(b"  ");
                    state = State::LineComment;
                    i += 2;
                    continue;
                }
                if ch == b'/' && next == Some(b'*') {
                    out.extend_from_slice(b"  ");
                    state = State::BlockComment;
                    i += 2;
                    continue;
                }
                if ch == b'"' {
                    out.push(b' ');
                    state = State::StringLiteral;
                    i += 1;
                    continue;
                }
                if ch == b'\'' {
                    out.push(b' ');
                    state = State::CharLiteral;
                    i += 1;
                    continue;
                }
                out.push(ch);
                i += 1;
            }

            State::LineComment => {
                if ch == b'\n' {
                    out.push(b'\n');
                    state = State::Code;
                } else {
                    out.push(b' ');
                }
                i += 1;
            }

            State::BlockComment => {
                if ch == b'*' && next == Some(b'/') {
                    out.extend_from_slice(b"  ");
                    state = State::Code;
                    i += 2;
                    continue;
                }
                out.push(if ch == b'\n' { b'\n' } else { b' ' });
                i += 1;
            }

            State::StringLiteral | State::CharLiteral => {
                if ch == b'\\' {
                    // Escape sequences are consumed without interpretation.
                    // A newline still wins over the escape: the line layout
                    // invariant must hold even for malformed input.
                    out.push(b' ');
                    if let Some(n) = next {
                        out.push(if n == b'\n' { b'\n' } else { b' ' });
                        i += 2;
                    } else {
                        i += 1;
                    }
                    continue;
                }
                let quote = if state == State::StringLiteral { b'"' } else { b'\'' };
                if ch == quote {
                    out.push(b' ');
                    state = State::Code;
                } else {
                    out.push(if ch == b'\n' { b'\n' } else { b' ' });
                }
                i += 1;
            }
        }
    }

    // Blanked bytes are ASCII spaces and kept bytes are copied verbatim
    // from valid UTF-8 input, so the buffer is always valid UTF-8.
    String::from_utf8(out).expect("sanitized bytes are valid UTF-8")
}

/// Finds the closing parenthesis matching the `(` at `open`.
///
/// Scans forward with a depth counter, tracking string/char literals with a
/// local quote flag so parentheses or quotes embedded in default arguments
/// do not corrupt the depth count. Returns `None` if the text ends before
/// the depth returns to zero; callers treat that as "not a recognizable
/// declaration", never as fatal.
pub fn find_closing_paren(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }

    let mut depth: usize = 0;
    let mut in_literal: Option<u8> = None;
    let mut i = open;

    while i < bytes.len() {
        let ch = bytes[i];

        if let Some(quote) = in_literal {
            if ch == b'\\' {
                i += 2;
                continue;
            }
            if ch == quote {
                in_literal = None;
            }
            i += 1;
            continue;
        }

        match ch {
            b'"' | b'\'' => in_literal = Some(ch),
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_starts(text: &str) -> Vec<usize> {
        std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect()
    }

    #[test]
    fn test_length_and_line_invariant() {
        let text = "int a; // trailing\n/* block\n spans */ int b;\nchar c = 'x';\n";
        let clean = sanitize(text);
        assert_eq!(clean.len(), text.len());
        assert_eq!(line_starts(&clean), line_starts(text));
    }

    #[test]
    fn test_idempotent() {
        let text = "void f() { s = \"a // not a comment\"; } /* tail */";
        let once = sanitize(text);
        assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn test_line_comment_blanked() {
        let clean = sanitize("int x; // int fake();\nint y;");
        assert!(!clean.contains("fake"));
        assert!(clean.contains("int x;"));
        assert!(clean.contains("int y;"));
    }

    #[test]
    fn test_block_comment_preserves_newlines() {
        let clean = sanitize("/* int foo();\n   int bar(); */\nint real;");
        assert!(!clean.contains("foo"));
        assert!(!clean.contains("bar"));
        assert_eq!(clean.matches('\n').count(), 2);
        assert!(clean.contains("int real;"));
    }

    #[test]
    fn test_string_contents_blanked() {
        let clean = sanitize("call(\"quicksort(v)\");");
        assert!(!clean.contains("quicksort"));
        assert!(clean.starts_with("call("));
        assert!(clean.ends_with(");"));
    }

    #[test]
    fn test_escaped_quote_stays_in_literal() {
        let clean = sanitize("s = \"a\\\"b\"; g();");
        assert!(clean.contains("g();"));
        assert!(!clean.contains('a'));
        assert!(!clean.contains('b'));
    }

    #[test]
    fn test_char_literal_with_escape() {
        let clean = sanitize("char c = '\\''; next();");
        assert!(clean.contains("next();"));
    }

    #[test]
    fn test_newline_inside_literal_preserved() {
        // Malformed input: unterminated string spanning a newline.
        let text = "s = \"abc\ndef\";";
        let clean = sanitize(text);
        assert_eq!(clean.len(), text.len());
        assert_eq!(clean.matches('\n').count(), 1);
    }

    #[test]
    fn test_comment_markers_inside_literal_ignored() {
        let clean = sanitize("s = \"// /*\"; int live;");
        assert!(clean.contains("int live;"));
    }

    #[test]
    fn test_find_closing_paren_simple() {
        let text = "f(a, b)";
        assert_eq!(find_closing_paren(text, 1), Some(6));
    }

    #[test]
    fn test_find_closing_paren_nested() {
        let text = "f(g(h(x)), y)";
        assert_eq!(find_closing_paren(text, 1), Some(12));
    }

    #[test]
    fn test_find_closing_paren_literal_parens() {
        let text = "f(\")(\", ')')";
        assert_eq!(find_closing_paren(text, 1), Some(text.len() - 1));
    }

    #[test]
    fn test_find_closing_paren_escaped_quote_in_literal() {
        let text = "f(\"\\\")\", x)";
        assert_eq!(find_closing_paren(text, 1), Some(text.len() - 1));
    }

    #[test]
    fn test_find_closing_paren_unbalanced() {
        assert_eq!(find_closing_paren("f(a, (b", 1), None);
    }

    #[test]
    fn test_find_closing_paren_not_a_paren() {
        assert_eq!(find_closing_paren("fx", 0), None);
    }
}
