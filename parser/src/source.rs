//! @ai:module:intent Provide doc comment text for declarations, from source files or dynamic input
//! @ai:module:layer application
//! @ai:module:public_api CommentSource, SourceFile, Declaration, CommentBlock
//! @ai:module:depends_on language, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::language::{detect_language, CommentStyle, Language};
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// @ai:intent Capability of yielding the doc comment attached to something
pub trait CommentSource {
    /// `Ok(None)` when nothing is attached; `Err(NoComment)` when the subject
    /// cannot carry a comment at all.
    fn doc_comment(&self) -> Result<Option<Cow<'_, str>>>;
}

impl CommentSource for str {
    fn doc_comment(&self) -> Result<Option<Cow<'_, str>>> {
        Ok(Some(Cow::Borrowed(self)))
    }
}

impl CommentSource for String {
    fn doc_comment(&self) -> Result<Option<Cow<'_, str>>> {
        Ok(Some(Cow::Borrowed(self.as_str())))
    }
}

impl<T: CommentSource> CommentSource for Option<T> {
    fn doc_comment(&self) -> Result<Option<Cow<'_, str>>> {
        match self {
            Some(inner) => inner.doc_comment(),
            None => Ok(None),
        }
    }
}

/// Dynamic declarations: `{"name": "User", "doc": "/** @Entity */"}`.
/// `docComment` is accepted as an alias of `doc`.
impl CommentSource for serde_json::Value {
    fn doc_comment(&self) -> Result<Option<Cow<'_, str>>> {
        let object = self.as_object().ok_or_else(|| {
            Error::UnsupportedInput(format!("expected a declaration object, got {}", json_kind(self)))
        })?;

        let doc = object
            .get("doc")
            .or_else(|| object.get("docComment"))
            .ok_or_else(|| Error::NoComment {
                subject: object
                    .get("name")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("declaration")
                    .to_string(),
            })?;

        match doc {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::String(text) => Ok(Some(Cow::Borrowed(text.as_str()))),
            other => Err(Error::UnsupportedInput(format!(
                "doc comment must be a string, got {}",
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// @ai:intent A declaration found in a source file, with its preceding doc comment
#[derive(Debug, Clone, Serialize)]
pub struct Declaration {
    pub name: String,
    pub kind: String,
    pub line: usize,
    pub doc: Option<String>,
}

impl CommentSource for Declaration {
    fn doc_comment(&self) -> Result<Option<Cow<'_, str>>> {
        Ok(self.doc.as_deref().map(Cow::Borrowed))
    }
}

/// @ai:intent Represents a block of consecutive comment lines, markers removed
#[derive(Debug, Clone)]
pub struct CommentBlock {
    pub lines: Vec<String>,
    /// 1-based line the block ends on; declarations attach by it.
    pub end_line: usize,
}

impl CommentBlock {
    /// @ai:intent Join the block's lines into doc comment text
    /// @ai:effects pure
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// @ai:intent Source file split into a module-level doc comment and its declarations
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub language: Language,
    pub module_doc: Option<String>,
    pub declarations: Vec<Declaration>,
}

impl SourceFile {
    /// @ai:intent Read and split a source file
    /// @ai:pre path exists and is readable
    /// @ai:post Err(UnsupportedInput) when the extension is not a known language
    /// @ai:effects fs:read
    pub fn read(path: &Path) -> Result<Self> {
        let language = detect_language(path).ok_or_else(|| {
            Error::UnsupportedInput(format!("{}: not a recognized source file", path.display()))
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self::parse(path, &content, language))
    }

    /// @ai:intent Split already-loaded source text
    /// @ai:effects pure
    pub fn parse(path: &Path, content: &str, language: Language) -> Self {
        let blocks = extract_comment_blocks(content, &language.comment_style());
        let declarations = extract_declarations(content, language, &blocks);

        let first_declaration = declarations.first().map(|d| d.line);
        let module_doc = blocks
            .first()
            .filter(|block| match first_declaration {
                // A block directly above the first declaration belongs to it.
                Some(line) => block.end_line + 2 < line,
                None => true,
            })
            .map(CommentBlock::text);

        Self {
            path: path.to_path_buf(),
            language,
            module_doc,
            declarations,
        }
    }
}

impl CommentSource for SourceFile {
    fn doc_comment(&self) -> Result<Option<Cow<'_, str>>> {
        Ok(self.module_doc.as_deref().map(Cow::Borrowed))
    }
}

/// @ai:intent Extract all comment blocks from source content
/// @ai:post consecutive comment lines form one block; a code or blank line ends the block
/// @ai:edge_cases multi-line block comments are tracked across lines
/// @ai:effects pure
fn extract_comment_blocks(content: &str, style: &CommentStyle) -> Vec<CommentBlock> {
    let mut blocks = Vec::new();
    let mut current_block: Option<CommentBlock> = None;
    let mut in_block_comment = false;

    for (line_idx, line) in content.lines().enumerate() {
        let line_number = line_idx + 1;
        let trimmed = line.trim();

        let comment = if in_block_comment {
            let (text, closed) = block_comment_body(trimmed, style);
            in_block_comment = !closed;
            Some(text)
        } else if let Some((text, closed)) = open_block_comment(trimmed, style) {
            // Each block comment is its own doc comment.
            if let Some(block) = current_block.take() {
                blocks.push(block);
            }
            in_block_comment = !closed;
            Some(text)
        } else {
            extract_single_line_comment(trimmed, style)
        };

        match comment {
            Some(content) => match &mut current_block {
                Some(block) => {
                    block.lines.push(content);
                    block.end_line = line_number;
                }
                None => {
                    current_block = Some(CommentBlock {
                        lines: vec![content],
                        end_line: line_number,
                    });
                }
            },
            None => {
                if let Some(block) = current_block.take() {
                    blocks.push(block);
                }
            }
        }
    }

    if let Some(block) = current_block {
        blocks.push(block);
    }

    blocks
}

/// Start of a block comment: returns its first line's text and whether it also closes.
fn open_block_comment(line: &str, style: &CommentStyle) -> Option<(String, bool)> {
    let start = style.block_start?;
    let rest = line.strip_prefix(start)?.trim_end();

    // The end marker is looked for before the `*` run is dropped, or `/**/`
    // would lose its closing `*` and stay open.
    let (body, closed) = match style.block_end.and_then(|end| rest.strip_suffix(end)) {
        Some(body) => (body, true),
        None => (rest, false),
    };

    Some((body.trim_start_matches('*').trim().to_string(), closed))
}

/// A line inside an open block comment.
fn block_comment_body(line: &str, style: &CommentStyle) -> (String, bool) {
    let (body, closed) = match style.block_end.and_then(|end| line.strip_suffix(end)) {
        Some(body) => (body, true),
        None => (line, false),
    };

    let body = match style.block_line_prefix {
        Some(prefix) => body.trim_start().strip_prefix(prefix).unwrap_or(body),
        None => body,
    };

    (body.trim().to_string(), closed)
}

/// @ai:intent Extract comment content from a single line comment
/// @ai:effects pure
fn extract_single_line_comment(line: &str, style: &CommentStyle) -> Option<String> {
    style
        .doc_line
        .iter()
        .chain(style.single_line.iter())
        .find_map(|prefix| line.strip_prefix(prefix))
        .map(|content| content.trim().to_string())
}

/// @ai:intent Find declarations and attach the comment block right above each
/// @ai:effects pure
fn extract_declarations(content: &str, language: Language, blocks: &[CommentBlock]) -> Vec<Declaration> {
    let patterns = language.declaration_patterns();
    let mut declarations = Vec::new();

    for (line_idx, line) in content.lines().enumerate() {
        let line_number = line_idx + 1;

        let Some((kind, name)) = patterns.iter().find_map(|p| p.matches(line)) else {
            continue;
        };

        let doc = find_preceding_comment_block(line_number, blocks).map(CommentBlock::text);

        declarations.push(Declaration {
            name: name.to_string(),
            kind: kind.to_string(),
            line: line_number,
            doc,
        });
    }

    declarations
}

/// @ai:intent Find the comment block ending one or two lines above a line
/// @ai:effects pure
fn find_preceding_comment_block(line: usize, blocks: &[CommentBlock]) -> Option<&CommentBlock> {
    blocks
        .iter()
        .find(|block| block.end_line + 1 == line || block.end_line + 2 == line)
}
