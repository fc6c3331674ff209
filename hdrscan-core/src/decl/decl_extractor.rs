//! Declaration extraction from C/C++ source text.
//!
//! Recognizes function, method, class, struct and concept declarations with
//! regex signatures over sanitized lines, carrying brace depth and a class
//! scope stack across lines. Deliberately lexical: no preprocessor, no
//! symbol table, no AST. Precision beats recall — candidates that do not
//! resolve to a balanced, terminated signature are discarded silently, since
//! false positives pollute every downstream consumer.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::decl::scope::{Access, ScopeStack};
use crate::sanitize::{find_closing_paren, sanitize};

/// Statement-start and signature-name keywords that disqualify a candidate.
const CONTROL_KEYWORDS: &[&str] = &[
    "if",
    "for",
    "while",
    "switch",
    "catch",
    "return",
    "sizeof",
    "static_assert",
    "static_cast",
    "dynamic_cast",
    "const_cast",
    "reinterpret_cast",
    "new",
    "delete",
];

/// What kind of declaration was recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeclKind {
    Function,
    Method,
    Class,
    Struct,
    Concept,
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Function => "function",
            DeclKind::Method => "method",
            DeclKind::Class => "class",
            DeclKind::Struct => "struct",
            DeclKind::Concept => "concept",
        }
    }
}

/// Visibility of a declaration at its site: public at global/namespace
/// scope or in a public class section, non-public otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    NonPublic,
}

/// A recognized declaration. Identity for deduplication is `(name, line)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Source file label the declaration was extracted from.
    pub file: String,
    /// 1-based source line of the signature.
    pub line: usize,
    pub kind: DeclKind,
    pub name: String,
    pub visibility: Visibility,
}

/// Which function-like terminators count as declarations.
///
/// The coverage matrix wants definitions only (body-opening `{`, the
/// header-only library policy); the documentation gate also accepts bare
/// prototypes terminated by `;`. Class/struct/concept recognition is
/// identical in both modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    Definitions,
    All,
}

fn class_decl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:template\s*<.*>\s*)?(class|struct)\s+([A-Za-z_]\w*)\b")
            .expect("hardcoded regex pattern is valid")
    })
}

fn concept_decl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^concept\s+([A-Za-z_]\w*)\s*=").expect("hardcoded regex pattern is valid")
    })
}

fn access_specifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(public|private|protected)\s*:\s*$").expect("hardcoded regex pattern is valid")
    })
}

fn name_before_paren_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(~?[A-Za-z_]\w*|operator[^\s(]+)\s*\(")
            .expect("hardcoded regex pattern is valid")
    })
}

/// Everything allowed between the closing parenthesis and the terminator:
/// cv-qualifier, noexcept clause, trailing-return type, `= default/delete`.
fn signature_suffix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?:const\b[^;{}]*)?(?:noexcept(?:\([^)]*\))?[^;{}]*)?(?:->\s*[^;{}]+)?\s*(?:=\s*(?:default|delete))?\s*([;{])\s*$",
        )
        .expect("hardcoded regex pattern is valid")
    })
}

fn defaulted_or_deleted_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\)\s*=\s*(default|delete)\s*;").expect("hardcoded regex pattern is valid")
    })
}

/// Screens a sanitized line down to a candidate declaration statement.
///
/// Rejections, in order: no `(`; trimmed line does not end with `;` or `{`;
/// preprocessor directive, `using`, `typedef`; statement starts with a
/// control keyword; an `=` that is not part of `= default;` / `= delete;`
/// (those lines are usually assignments or invocations in a body).
fn declaration_statement(line: &str) -> Option<&str> {
    if !line.contains('(') {
        return None;
    }
    let end = line.trim_end();
    if !(end.ends_with(';') || end.ends_with('{')) {
        return None;
    }

    let s = line.trim();
    if s.starts_with('#') || s.starts_with("using ") || s.starts_with("typedef ") {
        return None;
    }

    let lowered = s.to_lowercase();
    for kw in CONTROL_KEYWORDS {
        if lowered.starts_with(&format!("{kw} ")) || lowered.starts_with(&format!("{kw}(")) {
            return None;
        }
    }

    if s.contains('=') && !defaulted_or_deleted_regex().is_match(s) {
        return None;
    }

    Some(s)
}

/// Matches a function-like signature on a candidate line.
///
/// Finds the leftmost name whose parameter list balances and
/// whose tail is a valid signature suffix, then applies the ordered checks:
/// control-keyword names are rejected; an empty prefix (no return type) is
/// accepted only for a constructor or destructor of the enclosing class,
/// otherwise the line is a likely call expression, not a declaration.
fn parse_function_candidate(line: &str, current_class: Option<&str>) -> Option<(String, char)> {
    let stmt = declaration_statement(line)?;

    for caps in name_before_paren_regex().captures_iter(stmt) {
        let whole = caps.get(0)?;
        let name_match = caps.get(1)?;
        let open = whole.end() - 1;

        let close = match find_closing_paren(stmt, open) {
            Some(i) => i,
            None => continue,
        };
        let suffix = &stmt[close + 1..];
        let suffix_caps = match signature_suffix_regex().captures(suffix) {
            Some(c) => c,
            None => continue,
        };
        let terminator = suffix_caps[1].chars().next()?;

        // First structural match decides; the checks below do not retry
        // against later candidates on the same line.
        let name = name_match.as_str();
        if CONTROL_KEYWORDS.contains(&name) {
            return None;
        }

        let prefix = stmt[..name_match.start()].trim();
        let is_ctor_or_dtor = current_class
            .map_or(false, |c| name == c || name.strip_prefix('~') == Some(c));
        if prefix.is_empty() && !is_ctor_or_dtor {
            return None;
        }

        return Some((name.to_string(), terminator));
    }

    None
}

/// Records a declaration unless its `(name, line)` identity was seen.
#[allow(clippy::too_many_arguments)]
fn push_decl(
    decls: &mut Vec<Declaration>,
    seen: &mut HashSet<(String, usize)>,
    file: &str,
    name: &str,
    line: usize,
    kind: DeclKind,
    public: bool,
) {
    if seen.insert((name.to_string(), line)) {
        decls.push(Declaration {
            file: file.to_string(),
            line,
            kind,
            name: name.to_string(),
            visibility: if public { Visibility::Public } else { Visibility::NonPublic },
        });
    }
}

/// Extracts declarations from one file's source text.
///
/// The text is sanitized first (comments and literals blanked), then walked
/// line by line with persistent brace depth and scope-stack state. Output is
/// deduplicated by `(name, line)` and sorted by `(name, line)`.
pub fn extract_declarations(file: &str, text: &str, mode: ExtractMode) -> Vec<Declaration> {
    let sanitized = sanitize(text);

    let mut decls: Vec<Declaration> = Vec::new();
    let mut seen: HashSet<(String, usize)> = HashSet::new();
    let mut scopes = ScopeStack::new();
    // Malformed input can net below zero; keep the counter signed.
    let mut depth: i64 = 0;

    for (idx, line) in sanitized.lines().enumerate() {
        let line_no = idx + 1;
        let stripped = line.trim();

        // Member lines sit exactly at the class body depth; free
        // declarations at global scope or one namespace level.
        let in_decl_scope = match scopes.top() {
            Some(frame) => depth == frame.depth,
            None => depth <= 1,
        };

        if in_decl_scope {
            if let Some(caps) = class_decl_regex().captures(stripped) {
                let kind = if &caps[1] == "class" { DeclKind::Class } else { DeclKind::Struct };
                let name = &caps[2];
                push_decl(&mut decls, &mut seen, file, name, line_no, kind, scopes.public_context());

                // struct members default to public access, class to private
                let default_access =
                    if kind == DeclKind::Struct { Access::Public } else { Access::Private };
                if stripped.contains('{') {
                    scopes.defer(name, default_access, true);
                } else if !stripped.contains(';') {
                    scopes.defer(name, default_access, false);
                }
            }
        }

        if let Some(caps) = access_specifier_regex().captures(stripped) {
            let access = match &caps[1] {
                "public" => Access::Public,
                "protected" => Access::Protected,
                _ => Access::Private,
            };
            scopes.set_access(access);
        }

        if in_decl_scope {
            if let Some(caps) = concept_decl_regex().captures(stripped) {
                push_decl(
                    &mut decls,
                    &mut seen,
                    file,
                    &caps[1],
                    line_no,
                    DeclKind::Concept,
                    scopes.public_context(),
                );
            }
        }

        if in_decl_scope {
            if let Some((name, terminator)) = parse_function_candidate(line, scopes.current_class())
            {
                if mode == ExtractMode::All || terminator == '{' {
                    let kind =
                        if scopes.in_class() { DeclKind::Method } else { DeclKind::Function };
                    push_decl(&mut decls, &mut seen, file, &name, line_no, kind, scopes.public_context());
                }
            }
        }

        let before = depth;
        let opens = line.bytes().filter(|&b| b == b'{').count() as i64;
        let closes = line.bytes().filter(|&b| b == b'}').count() as i64;
        depth += opens - closes;
        scopes.after_line(before, depth, opens > 0);
    }

    decls.sort_by(|a, b| a.name.cmp(&b.name).then(a.line.cmp(&b.line)));
    decls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(decls: &[Declaration]) -> Vec<&str> {
        decls.iter().map(|d| d.name.as_str()).collect()
    }

    fn find<'a>(decls: &'a [Declaration], name: &str) -> &'a Declaration {
        decls
            .iter()
            .find(|d| d.name == name)
            .unwrap_or_else(|| panic!("missing declaration {name}"))
    }

    #[test]
    fn test_free_function_definition() {
        let text = "int quicksort(int * v, int n) {\n  return 0;\n}\n";
        let decls = extract_declarations("a.H", text, ExtractMode::Definitions);
        assert_eq!(names(&decls), vec!["quicksort"]);
        let d = find(&decls, "quicksort");
        assert_eq!(d.kind, DeclKind::Function);
        assert_eq!(d.line, 1);
        assert_eq!(d.visibility, Visibility::Public);
    }

    #[test]
    fn test_prototype_skipped_in_definitions_mode() {
        let text = "int f(int x);\n";
        assert!(extract_declarations("a.H", text, ExtractMode::Definitions).is_empty());
        let all = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(names(&all), vec!["f"]);
    }

    #[test]
    fn test_no_declarations_inside_comments() {
        let text = "/* int foo(); */\n// int bar() {}\nint real() {\n}\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(names(&decls), vec!["real"]);
    }

    #[test]
    fn test_visibility_scoping() {
        let text = "class C {\npublic:\n  void a();\nprivate:\n  void b();\n};\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(find(&decls, "a").visibility, Visibility::Public);
        assert_eq!(find(&decls, "a").kind, DeclKind::Method);
        assert_eq!(find(&decls, "b").visibility, Visibility::NonPublic);
        // class itself is public at global scope, with private default body
        assert_eq!(find(&decls, "C").visibility, Visibility::Public);
    }

    #[test]
    fn test_struct_default_access_is_public() {
        let text = "struct P {\n  int norm() const {\n    return 0;\n  }\n};\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(find(&decls, "norm").visibility, Visibility::Public);
    }

    #[test]
    fn test_class_default_access_is_private() {
        let text = "class C {\n  void hidden();\n};\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(find(&decls, "hidden").visibility, Visibility::NonPublic);
    }

    #[test]
    fn test_constructor_exemption() {
        let text = "class Widget {\npublic:\n  Widget();\n  ~Widget();\n};\nWidget();\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        // ctor and dtor accepted despite the empty prefix; the same-named
        // free call at global scope is rejected
        let lines: Vec<usize> =
            decls.iter().filter(|d| d.name.starts_with('~') || d.name == "Widget").map(|d| d.line).collect();
        assert!(lines.contains(&3));
        assert!(decls.iter().any(|d| d.name == "~Widget" && d.line == 4));
        assert!(!decls.iter().any(|d| d.line == 6));
    }

    #[test]
    fn test_deferred_class_body() {
        let text = "template <typename T>\nclass DynList\n  : public Dlink\n{\npublic:\n  void append(T item) {\n  }\n};\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(find(&decls, "DynList").kind, DeclKind::Class);
        let m = find(&decls, "append");
        assert_eq!(m.kind, DeclKind::Method);
        assert_eq!(m.visibility, Visibility::Public);
    }

    #[test]
    fn test_concept_declaration() {
        let text = "template <typename T>\nconcept Sortable = requires(T t) { t.sort(); };\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        let c = find(&decls, "Sortable");
        assert_eq!(c.kind, DeclKind::Concept);
        assert_eq!(c.line, 2);
    }

    #[test]
    fn test_control_keywords_rejected() {
        let text = "void g() {\n}\nwhile (pending()) {\n}\nswitch (x) {\n}\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(names(&decls), vec!["g"]);
    }

    #[test]
    fn test_preprocessor_using_typedef_rejected() {
        let text = "#define CHECK(x) assert(x)\nusing Fn = void (*)(int);\ntypedef int (*Cmp)(int, int);\n";
        assert!(extract_declarations("a.H", text, ExtractMode::All).is_empty());
    }

    #[test]
    fn test_assignment_lines_rejected() {
        let text = "int n = count(v);\nauto r = f();\n";
        assert!(extract_declarations("a.H", text, ExtractMode::All).is_empty());
    }

    #[test]
    fn test_defaulted_and_deleted_accepted() {
        let text = "class C {\npublic:\n  C() = default;\n  C(const C &) = delete;\n};\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        let ctors: Vec<_> = decls.iter().filter(|d| d.name == "C" && d.kind == DeclKind::Method).collect();
        assert_eq!(ctors.len(), 2);
    }

    #[test]
    fn test_operator_name() {
        let text = "struct V {\n  bool operator<(const V & r) const {\n    return false;\n  }\n};\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert!(decls.iter().any(|d| d.name == "operator<"));
    }

    #[test]
    fn test_noexcept_and_trailing_return() {
        let text = "auto size() const noexcept -> size_t {\n  return 0;\n}\nvoid swap(V & a, V & b) noexcept(true) {\n}\n";
        let decls = extract_declarations("a.H", text, ExtractMode::Definitions);
        assert_eq!(names(&decls), vec!["size", "swap"]);
    }

    #[test]
    fn test_nested_parens_in_parameters() {
        let text = "int apply(int (*fn)(int, int), int seed) {\n  return 0;\n}\n";
        let decls = extract_declarations("a.H", text, ExtractMode::Definitions);
        assert_eq!(names(&decls), vec!["apply"]);
    }

    #[test]
    fn test_body_lines_not_extracted_in_class() {
        let text = "class C {\npublic:\n  int depth() {\n    helper(1);\n    return probe();\n  }\n};\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(names(&decls), vec!["C", "depth"]);
    }

    #[test]
    fn test_namespace_level_allowed() {
        let text = "namespace Aleph {\nint top_level(int x) {\n  return x;\n}\n}\n";
        let decls = extract_declarations("a.H", text, ExtractMode::Definitions);
        assert_eq!(names(&decls), vec!["top_level"]);
    }

    #[test]
    fn test_dedup_and_sort_order() {
        let text = "void b() {\n}\nvoid a() {\n}\nvoid a(int x) {\n}\n";
        let decls = extract_declarations("a.H", text, ExtractMode::Definitions);
        let pairs: Vec<(&str, usize)> = decls.iter().map(|d| (d.name.as_str(), d.line)).collect();
        assert_eq!(pairs, vec![("a", 3), ("a", 5), ("b", 1)]);
    }

    #[test]
    fn test_forward_declaration_does_not_open_scope() {
        let text = "class Fwd;\nvoid f() {\n}\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(find(&decls, "f").kind, DeclKind::Function);
        assert!(decls.iter().any(|d| d.name == "Fwd" && d.kind == DeclKind::Class));
    }

    #[test]
    fn test_scope_pops_after_class_close() {
        let text = "class C {\npublic:\n  void m();\n};\nvoid free_fn() {\n}\n";
        let decls = extract_declarations("a.H", text, ExtractMode::All);
        assert_eq!(find(&decls, "free_fn").kind, DeclKind::Function);
        assert_eq!(find(&decls, "m").kind, DeclKind::Method);
    }

    #[test]
    fn test_string_literal_signature_ignored() {
        let text = "const char * msg = \"void ghost() {\";\n";
        assert!(extract_declarations("a.H", text, ExtractMode::All).is_empty());
    }
}
