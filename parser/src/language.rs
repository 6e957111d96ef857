//! @ai:module:intent Define language-specific comment formats and declaration patterns
//! @ai:module:layer domain
//! @ai:module:public_api Language, CommentStyle, detect_language, is_supported_file
//! @ai:module:stateless true

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// @ai:intent Represents a supported programming language with its comment syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Rust,
    Python,
    TypeScript,
    JavaScript,
    Go,
    Java,
    C,
    Cpp,
    Php,
}

const ALL_LANGUAGES: [Language; 9] = [
    Language::Rust,
    Language::Python,
    Language::TypeScript,
    Language::JavaScript,
    Language::Go,
    Language::Java,
    Language::C,
    Language::Cpp,
    Language::Php,
];

/// @ai:intent Comment style configuration for a language
#[derive(Debug, Clone)]
pub struct CommentStyle {
    pub single_line: Vec<&'static str>,
    pub doc_line: Vec<&'static str>,
    pub block_start: Option<&'static str>,
    pub block_end: Option<&'static str>,
    pub block_line_prefix: Option<&'static str>,
}

/// @ai:intent A declaration-line pattern; `kind` falls back to `default_kind` when not captured
pub(crate) struct DeclarationPattern {
    pub default_kind: &'static str,
    pub regex: Regex,
}

impl DeclarationPattern {
    /// @ai:intent Match a source line, returning (kind, name)
    /// @ai:effects pure
    pub(crate) fn matches<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.regex.captures(line)?;
        let name = caps.name("name")?.as_str();
        let kind = caps.name("kind").map_or(self.default_kind, |m| m.as_str());
        Some((kind, name))
    }
}

const C_FAMILY_METHOD: (&str, &str) = (
    // Also matches call sites such as `return foo(`; only lines right below a comment block matter.
    "function",
    r"^\s*(?:public|private|protected)?\s*(?:static\s+)?(?:[\w<>\[\],*&:]+\s+)+[*&]?(?P<name>\w+)\s*\(",
);

static DECLARATION_PATTERNS: LazyLock<HashMap<Language, Vec<DeclarationPattern>>> =
    LazyLock::new(|| {
        let table: [(Language, &'static [(&'static str, &'static str)]); 9] = [
            (
                Language::Rust,
                &[("fn", r#"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:async|const|unsafe|extern\s+"[^"]*")\s+)*(?P<kind>fn|struct|enum|trait|type|mod|union|static|const)\s+(?P<name>\w+)"#)],
            ),
            (
                Language::Python,
                &[("def", r"^\s*(?:async\s+)?(?P<kind>def|class)\s+(?P<name>\w+)")],
            ),
            (
                Language::TypeScript,
                &[("function", r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?(?:async\s+)?(?P<kind>function|class|interface|enum|type)\s+(?P<name>\w+)")],
            ),
            (
                Language::JavaScript,
                &[("function", r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?(?P<kind>function|class)\s+(?P<name>\w+)")],
            ),
            (
                Language::Go,
                &[("func", r"^\s*(?P<kind>func|type)\s+(?:\([^)]*\)\s+)?(?P<name>\w+)")],
            ),
            (
                Language::Java,
                &[
                    ("class", r"^\s*(?:(?:public|private|protected|abstract|final|static|sealed)\s+)*(?P<kind>class|interface|enum|record|@interface)\s+(?P<name>\w+)"),
                    C_FAMILY_METHOD,
                ],
            ),
            (
                Language::C,
                &[
                    ("struct", r"^\s*(?:typedef\s+)?(?P<kind>struct|enum|union)\s+(?P<name>\w+)"),
                    C_FAMILY_METHOD,
                ],
            ),
            (
                Language::Cpp,
                &[
                    ("class", r"^\s*(?:template\s*<[^>]*>\s*)?(?:typedef\s+)?(?P<kind>struct|class|enum|union|namespace)\s+(?P<name>\w+)"),
                    C_FAMILY_METHOD,
                ],
            ),
            (
                Language::Php,
                &[
                    ("function", r"^\s*(?:(?:abstract|final|public|private|protected|static|readonly)\s+)*(?P<kind>function|class|interface|trait|enum)\s+&?(?P<name>\w+)"),
                    ("property", r"^\s*(?:(?:public|private|protected|static|readonly|var)\s+)+(?:\??[\w\\]+\s+)?\$(?P<name>\w+)"),
                ],
            ),
        ];

        table
            .into_iter()
            .map(|(lang, patterns)| {
                let compiled = patterns
                    .iter()
                    .map(|&(default_kind, pattern)| DeclarationPattern {
                        default_kind,
                        regex: Regex::new(pattern).expect("Invalid regex pattern"),
                    })
                    .collect();
                (lang, compiled)
            })
            .collect()
    });

impl Language {
    /// @ai:intent Get the comment style for this language
    /// @ai:effects pure
    pub fn comment_style(&self) -> CommentStyle {
        match self {
            Language::Rust => CommentStyle {
                single_line: vec!["//"],
                doc_line: vec!["///", "//!"],
                block_start: Some("/*"),
                block_end: Some("*/"),
                block_line_prefix: Some("*"),
            },
            Language::Python => CommentStyle {
                single_line: vec!["#"],
                doc_line: vec!["#"],
                block_start: Some("\"\"\""),
                block_end: Some("\"\"\""),
                block_line_prefix: None,
            },
            Language::Php => CommentStyle {
                single_line: vec!["//", "#"],
                doc_line: vec![],
                block_start: Some("/*"),
                block_end: Some("*/"),
                block_line_prefix: Some("*"),
            },
            Language::TypeScript
            | Language::JavaScript
            | Language::Go
            | Language::Java
            | Language::C
            | Language::Cpp => CommentStyle {
                single_line: vec!["//"],
                doc_line: vec!["//"],
                block_start: Some("/*"),
                block_end: Some("*/"),
                block_line_prefix: Some("*"),
            },
        }
    }

    /// @ai:intent Patterns matching a declaration line for this language
    /// @ai:effects pure
    pub(crate) fn declaration_patterns(&self) -> &'static [DeclarationPattern] {
        DECLARATION_PATTERNS
            .get(self)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// @ai:intent Get file extensions for this language
    /// @ai:effects pure
    pub fn extensions(&self) -> &[&str] {
        match self {
            Language::Rust => &["rs"],
            Language::Python => &["py", "pyi"],
            Language::TypeScript => &["ts", "tsx"],
            Language::JavaScript => &["js", "jsx", "mjs"],
            Language::Go => &["go"],
            Language::Java => &["java"],
            Language::C => &["c", "h"],
            Language::Cpp => &["cpp", "cc", "cxx", "hpp", "hh", "hxx"],
            Language::Php => &["php", "phtml"],
        }
    }

    /// @ai:intent Get language name as string
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Go => "go",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Php => "php",
        }
    }
}

/// @ai:intent Detect the programming language from a file path
/// @ai:pre path is a valid file path
/// @ai:post result is Some if extension is recognized
/// @ai:example ("test.rs") -> Some(Rust)
/// @ai:example ("Model.php") -> Some(Php)
/// @ai:example ("test.txt") -> None
/// @ai:effects pure
pub fn detect_language(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?;
    ALL_LANGUAGES
        .into_iter()
        .find(|lang| lang.extensions().contains(&ext))
}

/// @ai:intent Check if a file should be scanned based on extension
/// @ai:effects pure
pub fn is_supported_file(path: &Path) -> bool {
    detect_language(path).is_some()
}
