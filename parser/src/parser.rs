//! @ai:module:intent Run the scan, split, coerce and merge pipeline over a doc comment
//! @ai:module:layer application
//! @ai:module:public_api parse_annotations, parse_annotations_strict, annotations_for, annotations_for_strict
//! @ai:module:depends_on scanner, params, table, source, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::params::{resolve_params, resolve_params_lenient};
use crate::scanner::Scanner;
use crate::source::CommentSource;
use crate::table::{AnnotationTable, InvalidValue};

/// @ai:intent Parse every annotation in a doc comment into a table
/// @ai:pre none; any text is accepted
/// @ai:post never fails; undecodable embedded values are kept as text and listed in `invalid_values()`
/// @ai:example ("/** @Entity */") -> {entity: true}
/// @ai:example ("@param a\n@param b") -> {param: [a, b]}
/// @ai:effects pure
/// @ai:idempotent true
pub fn parse_annotations(doc: &str) -> AnnotationTable {
    let mut table = AnnotationTable::new();
    let mut errors = Vec::new();

    for raw in Scanner::new(doc) {
        let value = resolve_params_lenient(&raw.params, &mut errors);

        for err in errors.drain(..) {
            if let Error::InvalidValue { raw: text, source, .. } = err {
                tracing::warn!(
                    "Invalid value for @{} on line {}: {}",
                    raw.name,
                    raw.line,
                    source
                );
                table.record_invalid(InvalidValue {
                    annotation: raw.name.to_lowercase(),
                    line: raw.line,
                    raw: text,
                    message: source.to_string(),
                });
            }
        }

        table.merge(&raw.name, value);
    }

    table
}

/// @ai:intent Parse a doc comment, failing on the first undecodable embedded value
/// @ai:post Err(InvalidValue) names the annotation whose value failed
/// @ai:effects pure
pub fn parse_annotations_strict(doc: &str) -> Result<AnnotationTable> {
    let mut table = AnnotationTable::new();

    for raw in Scanner::new(doc) {
        let value = resolve_params(&raw.params).map_err(|e| e.for_annotation(&raw.name))?;
        table.merge(&raw.name, value);
    }

    Ok(table)
}

/// @ai:intent Read the doc comment of a source and parse it
/// @ai:post absent or blank comment => empty table
/// @ai:post Err only when the source cannot provide a comment at all
pub fn annotations_for<S: CommentSource + ?Sized>(source: &S) -> Result<AnnotationTable> {
    Ok(match source.doc_comment()? {
        Some(doc) if !doc.trim().is_empty() => parse_annotations(&doc),
        _ => AnnotationTable::new(),
    })
}

/// Strict counterpart of [`annotations_for`].
pub fn annotations_for_strict<S: CommentSource + ?Sized>(source: &S) -> Result<AnnotationTable> {
    match source.doc_comment()? {
        Some(doc) if !doc.trim().is_empty() => parse_annotations_strict(&doc),
        _ => Ok(AnnotationTable::new()),
    }
}
