//! One-shot edit pipeline: parse, change, render

use crate::config::TreeConfig;
use crate::error::TreeResult;
use crate::tree::ConfigTree;
use cfgtree_model::{changes_from_file, ParseOptions, PayloadParser};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Parse `conf`, apply the change list in `edit`, render the result to `out`
///
/// Returns the edited tree.
///
/// # Errors
/// Returns error if parsing, loading the edits, any change, or rendering
/// fails. Nothing is rendered unless every change applied.
pub fn change_me<P, W>(
    parser: &P,
    conf: &Path,
    edit: &Path,
    options: &ParseOptions,
    config: TreeConfig,
    out: &mut W,
) -> TreeResult<ConfigTree>
where
    P: PayloadParser + ?Sized,
    W: Write + ?Sized,
{
    info!(conf = %conf.display(), edit = %edit.display(), "modifying configuration");

    let payload = parser.parse(conf, options)?;
    let changes = changes_from_file(edit)?;

    let mut tree = ConfigTree::with_config(payload, config);
    tree.change_set(changes)?;
    tree.render(out)?;

    Ok(tree)
}
