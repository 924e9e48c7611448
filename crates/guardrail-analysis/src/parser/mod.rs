//! Parser frontend — tree-sitter PHP parsing.
//!
//! Files that fail to parse are skipped at debug level; a skipped file
//! contributes to no pass at all. Parsing is rayon-parallel and merged in
//! input order, which together with the scanner's sorted output keeps
//! edge-insertion order deterministic.

mod php;

pub use php::{PhpParser, SourceUnit};
pub(crate) use php::{line_of, node_text};

use rayon::prelude::*;

use crate::scanner::SourceFile;

/// Parse a batch of files in parallel, preserving input order.
/// Returns the parsed units and the number of files skipped.
pub fn parse_all(files: Vec<SourceFile>) -> (Vec<SourceUnit>, usize) {
    let total = files.len();
    let parsed: Vec<Option<SourceUnit>> = files
        .into_par_iter()
        .map_init(PhpParser::default, |parser, file| parser.parse_unit(file))
        .collect();
    let units: Vec<SourceUnit> = parsed.into_iter().flatten().collect();
    let skipped = total - units.len();
    (units, skipped)
}
