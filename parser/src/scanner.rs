//! @ai:module:intent Find annotation blocks in doc comment text, line by line
//! @ai:module:layer domain
//! @ai:module:public_api Scanner, RawAnnotation, strip_decoration
//! @ai:module:stateless true
//!
//! The scanner walks a comment one physical line at a time. A line whose
//! content (after comment decoration) starts with `@Name` opens an
//! annotation. When the text after the name ends with `(`, following lines
//! are accumulated until one ends with `)`.
//!
//! A new marker seen while a block is still open force-completes the open
//! block and is replayed as the start of the next one, so no marker is lost
//! to a missing `)`.

use regex::Regex;
use std::iter::Enumerate;
use std::str::Lines;
use std::sync::LazyLock;

static RE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z0-9_]+)(.*)$").expect("Invalid regex"));

static RE_LEADING_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:/\*+|\*+|//+!?)?\s*").expect("Invalid regex"));

static RE_TRAILING_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\*+/\s*$").expect("Invalid regex"));

/// @ai:intent One annotation block as found in the text, parameters still raw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAnnotation {
    /// Name as written; case folding happens in the table.
    pub name: String,
    /// Everything after the name, continuation lines joined with a space.
    pub params: String,
    /// 1-based line of the `@` marker.
    pub line: usize,
}

/// @ai:intent Iterator over the annotation blocks of a doc comment, in document order
/// @ai:invariant at most one block is open at a time
pub struct Scanner<'a> {
    lines: Enumerate<Lines<'a>>,
    replay: Option<(usize, &'a str)>,
}

impl<'a> Scanner<'a> {
    pub fn new(doc: &'a str) -> Self {
        Self {
            lines: doc.lines().enumerate(),
            replay: None,
        }
    }

    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        self.replay
            .take()
            .or_else(|| self.lines.next().map(|(idx, raw)| (idx + 1, strip_decoration(raw))))
    }
}

impl Iterator for Scanner<'_> {
    type Item = RawAnnotation;

    fn next(&mut self) -> Option<RawAnnotation> {
        let mut open: Option<RawAnnotation> = None;

        loop {
            let Some((line, content)) = self.next_line() else {
                if let Some(block) = &open {
                    tracing::debug!(
                        "Unterminated @{} block from line {} closed at end of comment",
                        block.name,
                        block.line
                    );
                }
                return open;
            };

            let Some(block) = open.as_mut() else {
                if let Some(caps) = RE_MARKER.captures(content) {
                    let rest = caps.get(2).map_or("", |m| m.as_str());
                    let annotation = RawAnnotation {
                        name: caps[1].to_string(),
                        params: rest.trim().to_string(),
                        line,
                    };
                    if opens_block(rest) {
                        open = Some(annotation);
                    } else {
                        return Some(annotation);
                    }
                }
                continue;
            };

            if RE_MARKER.is_match(content) {
                tracing::debug!(
                    "@{} block from line {} interrupted by a new marker on line {}",
                    block.name,
                    block.line,
                    line
                );
                self.replay = Some((line, content));
                return open;
            }

            let content = content.trim_end();
            if !content.is_empty() {
                block.params.push(' ');
                block.params.push_str(content);
            }
            if content.ends_with(')') {
                return open;
            }
        }
    }
}

/// @ai:intent Strip comment decoration from one physical line
/// @ai:example ("   * @Entity") -> "@Entity"
/// @ai:example ("/** @Entity */") -> "@Entity"
/// @ai:example ("/// @Id") -> "@Id"
/// @ai:effects pure
pub fn strip_decoration(line: &str) -> &str {
    let line = match RE_TRAILING_CLOSE.find(line) {
        Some(m) => &line[..m.start()],
        None => line,
    };
    match RE_LEADING_DECORATION.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

fn opens_block(rest: &str) -> bool {
    rest.trim_end().ends_with('(')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(doc: &str) -> Vec<(String, String)> {
        Scanner::new(doc).map(|a| (a.name, a.params)).collect()
    }

    fn block(name: &str, params: &str) -> (String, String) {
        (name.to_string(), params.to_string())
    }

    #[test]
    fn test_single_line_annotations() {
        let doc = "/**\n * Some prose.\n *\n * @Entity\n * @Table(name = users)\n */";
        assert_eq!(
            scan(doc),
            vec![block("Entity", ""), block("Table", "(name = users)")]
        );
    }

    #[test]
    fn test_inline_comment() {
        assert_eq!(scan("/** @Entity */"), vec![block("Entity", "")]);
    }

    #[test]
    fn test_prose_at_sign_is_not_a_marker() {
        let doc = " * @author Jane Doe <jane@example.com>\n * mail me at jane@example.com";
        assert_eq!(scan(doc), vec![block("author", "Jane Doe <jane@example.com>")]);
    }

    #[test]
    fn test_multi_line_block() {
        let doc = "/**\n * @Worker(\n *   queue = mail,\n *   retries = 3\n * )\n * @Other\n */";
        let blocks: Vec<_> = Scanner::new(doc).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].name, "Worker");
        assert_eq!(blocks[0].params, "( queue = mail, retries = 3 )");
        assert_eq!(blocks[0].line, 2);
        assert_eq!(blocks[1].name, "Other");
        assert_eq!(blocks[1].line, 6);
    }

    #[test]
    fn test_new_marker_forces_completion_and_is_replayed() {
        let doc = " * @Worker(\n *   queue = mail,\n * @Id\n * @Column(name = id)";
        assert_eq!(
            scan(doc),
            vec![
                block("Worker", "( queue = mail,"),
                block("Id", ""),
                block("Column", "(name = id)"),
            ]
        );
    }

    #[test]
    fn test_unterminated_block_is_kept() {
        assert_eq!(
            scan(" * @Worker(\n *   queue = mail"),
            vec![block("Worker", "( queue = mail")]
        );
    }

    #[test]
    fn test_strip_decoration() {
        assert_eq!(strip_decoration("   * @Entity"), "@Entity");
        assert_eq!(strip_decoration("/** @Entity */"), "@Entity");
        assert_eq!(strip_decoration("//! @Module"), "@Module");
        assert_eq!(strip_decoration(" */"), "");
        assert_eq!(strip_decoration("plain text"), "plain text");
    }
}
