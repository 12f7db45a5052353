use clap::builder::BoolishValueParser;
use clap::{Args, Parser, Subcommand};
use clinkding::config::Overrides;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0 (commit: abc1234, built: 2024-01-15)" otherwise
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("CLINKDING_GIT_HASH");
    const BUILD_DATE: &str = env!("CLINKDING_BUILD_DATE");
    const IS_RELEASE: &str = env!("CLINKDING_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{} (commit: {}, built: {})", VERSION, GIT_HASH, BUILD_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "clinkding", bin_name = "clinkding", version = get_version())]
#[command(about = "Modern CLI for the linkding bookmark manager")]
#[command(long_about = "clinkding is a command-line interface for linkding, a self-hosted \
bookmark manager.\n\nUse --json or --plain for script-friendly output.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/clinkding/config.yaml)
    #[arg(short, long, global = true, env = "LINKDING_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Linkding instance URL
    #[arg(short, long, global = true, env = "LINKDING_URL")]
    pub url: Option<String>,

    /// API token
    #[arg(short, long, global = true, env = "LINKDING_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output as tab-separated plain text
    #[arg(long, global = true)]
    pub plain: bool,

    /// Disable colors
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            url: self.url.clone(),
            token: self.token.clone(),
            json: self.json,
            plain: self.plain,
            no_color: self.no_color,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage bookmarks
    #[command(subcommand, alias = "b")]
    Bookmarks(BookmarkCommands),

    /// Manage tags
    #[command(subcommand, alias = "t")]
    Tags(TagCommands),

    /// Manage bundles (saved searches)
    #[command(subcommand)]
    Bundles(BundleCommands),

    /// Manage bookmark assets (attached files)
    #[command(subcommand, alias = "a")]
    Assets(AssetCommands),

    /// User account information
    #[command(subcommand)]
    User(UserCommands),

    /// Manage clinkding configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct ListArgs {
    /// Search query (linkding search syntax)
    #[arg(short = 'Q', long)]
    pub query: Option<String>,

    /// Maximum results (default: defaults.bookmark_limit, 100)
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Results to skip
    #[arg(short, long, default_value_t = 0)]
    pub offset: u32,

    /// List archived bookmarks
    #[arg(long)]
    pub archived: bool,

    /// Only bookmarks modified since (RFC 3339 or relative: 24h, 7d, 1y)
    #[arg(long, value_name = "DATE")]
    pub modified_since: Option<String>,

    /// Only bookmarks added since (RFC 3339 or relative: 24h, 7d, 1y)
    #[arg(long, value_name = "DATE")]
    pub added_since: Option<String>,

    /// Only bookmarks matching this bundle
    #[arg(long, value_name = "BUNDLE_ID")]
    pub bundle: Option<u64>,
}

#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct CreateArgs {
    /// URL to bookmark
    pub url: String,

    /// Bookmark title
    #[arg(long)]
    pub title: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Notes (Markdown)
    #[arg(long)]
    pub notes: Option<String>,

    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,

    /// Share the bookmark
    #[arg(long)]
    pub shared: bool,

    /// Mark as unread
    #[arg(long)]
    pub unread: bool,

    /// Create directly in the archive
    #[arg(long)]
    pub archived: bool,

    /// Skip automatic metadata scraping
    #[arg(long)]
    pub no_scraping: bool,
}

#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct UpdateArgs {
    /// Bookmark ID
    pub id: String,

    /// New URL
    #[arg(long)]
    pub new_url: Option<String>,

    /// New title
    #[arg(long)]
    pub title: Option<String>,

    /// New description
    #[arg(long)]
    pub description: Option<String>,

    /// New notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Replace all tags (comma-separated)
    #[arg(long, conflicts_with_all = ["add_tags", "remove_tags"])]
    pub tags: Option<String>,

    /// Add tags (comma-separated)
    #[arg(long)]
    pub add_tags: Option<String>,

    /// Remove tags (comma-separated)
    #[arg(long)]
    pub remove_tags: Option<String>,

    /// Set shared status
    #[arg(long, value_name = "true|false", value_parser = BoolishValueParser::new())]
    pub shared: Option<bool>,

    /// Set unread status
    #[arg(long, value_name = "true|false", value_parser = BoolishValueParser::new())]
    pub unread: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum BookmarkCommands {
    /// List bookmarks
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a bookmark
    Get {
        /// Bookmark ID
        id: String,
    },

    /// Check whether a URL is already bookmarked
    Check {
        /// URL to check
        url: String,
    },

    /// Create a bookmark
    #[command(alias = "add")]
    Create(CreateArgs),

    /// Update a bookmark
    #[command(alias = "edit")]
    Update(UpdateArgs),

    /// Archive a bookmark
    Archive {
        /// Bookmark ID
        id: String,
    },

    /// Restore a bookmark from the archive
    Unarchive {
        /// Bookmark ID
        id: String,
    },

    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark ID
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// List tags
    #[command(alias = "ls")]
    List {
        /// Maximum results
        #[arg(short, long, default_value_t = 100)]
        limit: u32,

        /// Results to skip
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
    },

    /// Show a tag
    Get {
        /// Tag ID
        id: String,
    },

    /// Create a tag
    Create {
        /// Tag name
        name: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum BundleCommands {
    /// List bundles
    #[command(alias = "ls")]
    List,

    /// Show a bundle
    Get {
        /// Bundle ID
        id: String,
    },

    /// Create a bundle
    Create {
        /// Bundle name
        name: String,

        /// Description
        #[arg(long)]
        description: Option<String>,
    },

    /// Update a bundle
    Update {
        /// Bundle ID
        id: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a bundle
    #[command(alias = "rm")]
    Delete {
        /// Bundle ID
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssetCommands {
    /// List a bookmark's assets
    #[command(alias = "ls")]
    List {
        /// Bookmark ID
        bookmark_id: String,
    },

    /// Show an asset
    Get {
        /// Bookmark ID
        bookmark_id: String,
        /// Asset ID
        asset_id: String,
    },

    /// Upload a file as an asset
    Upload {
        /// Bookmark ID
        bookmark_id: String,
        /// File to upload
        file: PathBuf,
    },

    /// Download an asset
    Download {
        /// Bookmark ID
        bookmark_id: String,
        /// Asset ID
        asset_id: String,
        /// Output path (default: the asset's display name)
        path: Option<PathBuf>,

        /// Output path
        #[arg(short, long, conflicts_with = "path")]
        output: Option<PathBuf>,
    },

    /// Delete an asset
    #[command(alias = "rm")]
    Delete {
        /// Bookmark ID
        bookmark_id: String,
        /// Asset ID
        asset_id: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show the user profile
    Profile,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create a config file interactively
    Init,

    /// Show the merged configuration
    Show,

    /// Test the connection to linkding
    Test,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("clinkding").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["bookmarks", "list", "--json", "-u", "https://l.example", "--limit", "5"]);
        assert!(cli.json);
        assert_eq!(cli.url.as_deref(), Some("https://l.example"));
        match cli.command {
            Commands::Bookmarks(BookmarkCommands::List(args)) => {
                assert_eq!(args.limit, Some(5));
                assert_eq!(args.offset, 0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn update_parses_boolish_values() {
        let cli = parse(&["bookmarks", "update", "3", "--shared", "false", "--unread", "yes"]);
        match cli.command {
            Commands::Bookmarks(BookmarkCommands::Update(args)) => {
                assert_eq!(args.shared, Some(false));
                assert_eq!(args.unread, Some(true));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn update_rejects_tags_with_add_tags() {
        let result = Cli::try_parse_from([
            "clinkding", "bookmarks", "update", "3", "--tags", "a", "--add-tags", "b",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn download_accepts_positional_output() {
        let cli = parse(&["assets", "download", "1", "2", "out.html"]);
        match cli.command {
            Commands::Assets(AssetCommands::Download { path, output, .. }) => {
                assert_eq!(path, Some(PathBuf::from("out.html")));
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
