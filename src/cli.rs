use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "faceit-h2h", version, about = "Head-to-head FACEIT championship stats")]
pub struct Args {
    #[arg(long, global = true, help = "Output raw JSON instead of tables")]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error), RUST_LOG wins when set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Aggregate past championship matches of the two teams in a match room
    Stats {
        /// e.g. https://www.faceit.com/en/cs2/room/1-abc...
        link: String,

        /// Only count matches the two teams played against each other
        #[arg(long = "head-to-head", default_value_t = false)]
        head_to_head: bool,

        /// Stats requests in flight at once
        #[arg(long, default_value_t = 1)]
        concurrency: usize,

        /// Ignore the saved column preference and print every metric
        #[arg(long = "all-columns", default_value_t = false)]
        all_columns: bool,
    },

    Config {
        #[command(subcommand)]
        cmd: ConfigSubcommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Store the FACEIT Data API key
    SetKey { key: String },

    /// Print the settings file location and whether a key is stored
    Show,

    /// List player table columns and their visibility
    Columns,

    /// Hide player table columns
    Hide {
        #[arg(value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },

    /// Show player table columns
    Unhide {
        #[arg(value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },

    /// Forget the saved column preference
    ResetColumns,
}
