use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "confedit", bin_name = "confedit", version)]
pub struct ConfeditArgs {
    /// Write the result to a temp file and diff it against the input
    /// instead of printing it; exits 0 if no differences, non-zero if
    /// `diff` itself errored.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Disable color in the dry-run diff output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable verbose diagnostic logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Input file, or `-` for stdin.
    pub file: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pretty-print the input.
    Format,

    /// Print one `KIND VALUE` record per token.
    Tokens {
        /// Include SOI/EOI and label gap content (COMMENT/DIRECTIVE/UNKNOWN).
        #[arg(long)]
        processed: bool,
    },

    /// Insert text at sites matched by the look-around patterns.
    Insert {
        /// Text to insert.
        text: String,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Replace tokens matching `from` with `to`, substituting captures.
    Replace {
        /// Pattern to match.
        from: String,
        /// Replacement template (may reference `**1`..`**9`).
        to: String,

        #[command(flatten)]
        site: SiteArgs,
    },

    /// Extract the text matched by `from`, optionally through a template.
    Extract {
        /// Pattern to match.
        from: String,
        /// Optional output template (may reference `**1`..`**9`); the raw
        /// match is printed verbatim when omitted.
        to: Option<String>,

        /// Dedent extracted output by its minimum non-blank-line indent.
        #[arg(long)]
        strip_whitespace: bool,

        #[command(flatten)]
        site: SiteArgs,
    },
}

#[derive(Debug, Clone, clap::Args)]
pub struct SiteArgs {
    /// Require this pattern to match ending at the site's preceding token.
    #[arg(long = "look-behind")]
    pub look_behind: Option<String>,

    /// Require this pattern to match starting at the site's token.
    #[arg(long = "look-ahead")]
    pub look_ahead: Option<String>,

    /// Alter at most this many matching sites. Requires `--offset`'s
    /// counterpart relationship to hold: `--offset` requires `--limit`.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Skip this many leading matching sites before altering any.
    #[arg(long, requires = "limit")]
    pub offset: Option<usize>,
}

impl SiteArgs {
    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(0)
    }
}
