//! `bcdl history` – inspect `<output>/.bcdl/downloaded`.

use anyhow::{bail, Context, Result};
use bcdl_core::history::HistoryStore;
use bcdl_core::options::history_path_for;
use std::path::Path;

use crate::cli::HistoryCommand;

pub fn run_history(action: HistoryCommand) -> Result<()> {
    match action {
        HistoryCommand::Count { output } => {
            let store = open_existing(&output)?;
            println!("{}", store.len());
        }
        HistoryCommand::Check {
            title,
            format,
            output,
        } => {
            let store = open_existing(&output)?;
            if store.contains(&title, format) {
                println!("downloaded: {} ({})", title, format);
            } else {
                println!("not downloaded: {} ({})", title, format);
            }
        }
        HistoryCommand::List { output } => {
            let store = open_existing(&output)?;
            for fp in store.iter() {
                println!("{}", fp);
            }
        }
    }
    Ok(())
}

/// Open the history without creating it: inspecting a directory must not
/// turn it into a download target.
fn open_existing(output: &Path) -> Result<HistoryStore> {
    let path = history_path_for(output);
    if !path.is_file() {
        bail!("no download history at {}", path.display());
    }
    HistoryStore::open(&path).with_context(|| format!("open history: {}", path.display()))
}
