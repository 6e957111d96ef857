//! @ai:module:intent Annotation parser library for doc comments
//! @ai:module:layer infrastructure
//! @ai:module:public_api parser, table, value, source, cache, scan, config, output, error
//! @ai:module:stateless true
//!
//! # Anno
//!
//! Parses `@Name`-style annotations out of doc comments into a table of typed
//! values, for comments taken from source files or supplied directly.
//!
//! ## Example
//!
//! ```rust
//! use anno_parser::{parse_annotations, AnnotationValue};
//!
//! let table = parse_annotations(
//!     "/**\n * @Entity(table = users)\n * @param a\n * @param b\n */",
//! );
//!
//! assert!(table.has_annotation(&["entity", "table"]));
//! assert_eq!(table.as_list("param").len(), 2);
//! assert_eq!(table.get("PARAM"), table.get("param"));
//! assert_eq!(
//!     table.get("entity").and_then(|e| e.as_params()).and_then(|p| p.get("table")),
//!     Some(&AnnotationValue::from("users"))
//! );
//! ```

pub mod cache;
pub mod coerce;
pub mod config;
pub mod error;
pub mod language;
pub mod output;
pub mod params;
pub mod parser;
pub mod scan;
pub mod scanner;
pub mod source;
pub mod table;
pub mod value;

mod fuzz_tests;

pub use cache::AnnotationCache;
pub use config::ScanConfig;
pub use error::{Error, Result};
pub use language::{detect_language, is_supported_file, Language};
pub use output::{format_scan_result, format_table, to_json, OutputFormat};
pub use parser::{annotations_for, annotations_for_strict, parse_annotations, parse_annotations_strict};
pub use scan::{scan_directory, scan_file, scan_manifest, BatchScanner, ScanResult};
pub use source::{CommentSource, Declaration, SourceFile};
pub use table::{AnnotationTable, InvalidValue};
pub use value::{AnnotationValue, Params};
