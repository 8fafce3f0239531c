use std::path::PathBuf;

use clap::Parser;

/// Command-line and environment settings for the `grouplist` binary.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "grouplist", version, about = "Show list records grouped by list id")]
pub struct Config {
    /// Directory holding the record assets.
    #[arg(long, env = "GROUPLIST_ASSET_DIR", default_value = "assets")]
    pub asset_dir: PathBuf,

    /// Asset to load; the extension picks the decoder (.json or .csv).
    #[arg(long, env = "GROUPLIST_SOURCE", default_value = "hiring.json")]
    pub source: String,

    /// Print the grouped result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Print group headers only.
    #[arg(long)]
    pub collapsed: bool,
}
