//! Public loading API (§6.1, §6.4): the two surface formats, an explicit
//! options struct, and the top-level entry points a consumer actually calls.

use std::fs;
use std::path::Path;

use crate::cancel::CancellationToken;
use crate::error::{BlueprintError, Result};
use crate::schema::ast::Blueprint;
use crate::schema::decode::decode_blueprint;
use crate::treeview::{self, TreeNode};

/// The two surface syntaxes a Blueprint document may be authored in
/// (§6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Jwcc,
}

/// Options threaded through a single decode call. `cancellation` is polled
/// at the two coarse stage boundaries a decode passes through (raw bytes
/// → node tree, node tree → schema AST) rather than between every single
/// field — cheap enough for the CPU-bound, in-memory decode this crate
/// performs, and simpler than threading a token through every recursive
/// schema decoder (§5).
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub cancellation: Option<CancellationToken>,
    /// Build a [`TreeNode`] alongside the `Blueprint` (§4.9). Off by
    /// default: most callers only need the schema AST.
    pub tree_view: bool,
}

/// The result of a successful decode: the schema AST, plus an optional
/// tree view if `DecodeOptions::tree_view` was set.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub blueprint: Blueprint,
    pub tree: Option<TreeNode>,
}

fn check_cancelled(options: &DecodeOptions) -> Result<()> {
    if options.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled) {
        return Err(BlueprintError::Cancelled);
    }
    Ok(())
}

/// Decodes a buffer in the given [`Format`] (§6.1: filesystem path or
/// in-memory buffer behave identically).
#[tracing::instrument(level = "debug", skip(bytes, options))]
pub fn load(bytes: &[u8], format: Format, options: &DecodeOptions) -> Result<LoadResult> {
    let text = std::str::from_utf8(bytes).map_err(|e| BlueprintError::Lex(e.to_string()))?;
    check_cancelled(options)?;

    let blueprint = match format {
        Format::Yaml => {
            let node = crate::decode::yaml::parse(text)?;
            check_cancelled(options)?;
            decode_blueprint(&node)?
        }
        Format::Jwcc => {
            let node = crate::decode::jwcc::parse(text)?;
            check_cancelled(options)?;
            decode_blueprint(&node)?
        }
    };

    let tree = options.tree_view.then(|| treeview::build(&blueprint));
    Ok(LoadResult { blueprint, tree })
}

#[tracing::instrument(level = "debug", skip(src, options))]
pub fn from_yaml_str(src: &str, options: &DecodeOptions) -> Result<LoadResult> {
    load(src.as_bytes(), Format::Yaml, options)
}

#[tracing::instrument(level = "debug", skip(src, options))]
pub fn from_jwcc_str(src: &str, options: &DecodeOptions) -> Result<LoadResult> {
    load(src.as_bytes(), Format::Jwcc, options)
}

#[tracing::instrument(level = "debug", skip(options))]
pub fn from_yaml_path(path: &Path, options: &DecodeOptions) -> Result<LoadResult> {
    let bytes = fs::read(path)?;
    load(&bytes, Format::Yaml, options)
}

#[tracing::instrument(level = "debug", skip(options))]
pub fn from_jwcc_path(path: &Path, options: &DecodeOptions) -> Result<LoadResult> {
    let bytes = fs::read(path)?;
    load(&bytes, Format::Jwcc, options)
}
