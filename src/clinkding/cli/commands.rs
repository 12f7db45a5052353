//! # CLI Layer
//!
//! Turns parsed arguments into [`LinkdingApi`] calls and hands the results to the
//! [`Formatter`]. This is the only code that prompts the user or picks an exit code.
//!
//! ## Structure
//!
//! - `run()`: parse, set up logging and config, dispatch, map errors to exit codes
//! - `handle_*()`: one handler per resource command group
//! - `AppContext`: the API facade plus the formatter, built once credentials are known

use super::prompt::{self, delete_question};
use super::setup::{
    AssetCommands, BookmarkCommands, BundleCommands, Cli, Commands, ConfigCommands, CreateArgs,
    ListArgs, TagCommands, UpdateArgs, UserCommands,
};
use chrono::Utc;
use clap::Parser;
use clinkding::api::{parse_id, parse_since, parse_tags, BookmarkChanges, LinkdingApi, TagChange};
use clinkding::client::Client;
use clinkding::config::{redact_token, Config, ConfigFile};
use clinkding::error::{Error, Result};
use clinkding::gateway::bookmarks::ListOptions;
use clinkding::model::{BookmarkCreate, BundleCreate, BundleUpdate};
use clinkding::output::{views, Detail, Formatter, ListNotes, RecordView};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

struct AppContext {
    api: LinkdingApi,
    out: Formatter,
}

/// Runs the CLI and returns the process exit code.
pub fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version requests are not errors; usage errors exit like any other.
            let _ = e.print();
            return if e.use_stderr() { 1 } else { 0 };
        }
    };
    init_tracing(cli.verbose);

    let config = match Config::load(cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            Formatter::default().error(&e.to_string());
            return e.exit_code();
        }
    };
    debug!(path = %config.path.display(), url = %config.url, mode = ?config.output_mode(), "configuration resolved");

    let out = Formatter::new(&config);
    match dispatch(cli.command, &config, out) {
        Ok(()) => 0,
        Err(e) => {
            debug!(error = ?e, "command failed");
            out.error(&e.to_string());
            e.exit_code()
        }
    }
}

fn init_tracing(verbose: bool) {
    let mut filter = EnvFilter::try_from_env("CLINKDING_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        if let Ok(directive) = "clinkding=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch(command: Commands, config: &Config, out: Formatter) -> Result<()> {
    if let Commands::Config(cmd) = command {
        return handle_config(cmd, config, out);
    }

    let ctx = init_context(config, out)?;
    match command {
        Commands::Bookmarks(cmd) => handle_bookmarks(&ctx, cmd, config),
        Commands::Tags(cmd) => handle_tags(&ctx, cmd),
        Commands::Bundles(cmd) => handle_bundles(&ctx, cmd),
        Commands::Assets(cmd) => handle_assets(&ctx, cmd),
        Commands::User(UserCommands::Profile) => {
            let profile = ctx.api.profile()?;
            ctx.out.print_record(&profile, &views::profile(&profile))
        }
        Commands::Config(_) => Ok(()),
    }
}

fn init_context(config: &Config, out: Formatter) -> Result<AppContext> {
    config.require_credentials()?;
    let client = Client::new(&config.url, &config.token)?;
    Ok(AppContext {
        api: LinkdingApi::new(client),
        out,
    })
}

/// Asks before a destructive action. Without a terminal, or with `--force`, there is
/// nothing to ask and the action proceeds.
fn confirmed(force: bool, question: impl FnOnce() -> Result<String>) -> Result<bool> {
    if force || !prompt::interactive() {
        return Ok(true);
    }
    prompt::confirm(&question()?)
}

fn handle_bookmarks(ctx: &AppContext, cmd: BookmarkCommands, config: &Config) -> Result<()> {
    match cmd {
        BookmarkCommands::List(args) => list_bookmarks(ctx, args, config),
        BookmarkCommands::Get { id } => {
            let bookmark = ctx.api.get_bookmark(parse_id(&id, "bookmark")?)?;
            ctx.out.print_record(&bookmark, &views::bookmark(&bookmark))
        }
        BookmarkCommands::Check { url } => {
            let check = ctx.api.check_url(&url)?;
            ctx.out.print_record(&check, &views::bookmark_check(&check, &url))
        }
        BookmarkCommands::Create(args) => create_bookmark(ctx, args),
        BookmarkCommands::Update(args) => update_bookmark(ctx, args),
        BookmarkCommands::Archive { id } => {
            let id = parse_id(&id, "bookmark")?;
            ctx.api.archive_bookmark(id)?;
            ctx.out.success(&format!("Bookmark #{} archived", id));
            Ok(())
        }
        BookmarkCommands::Unarchive { id } => {
            let id = parse_id(&id, "bookmark")?;
            ctx.api.unarchive_bookmark(id)?;
            ctx.out.success(&format!("Bookmark #{} unarchived", id));
            Ok(())
        }
        BookmarkCommands::Delete { id, force } => {
            let id = parse_id(&id, "bookmark")?;
            let proceed = confirmed(force, || {
                let bookmark = ctx.api.get_bookmark(id)?;
                Ok(delete_question("bookmark", id, bookmark.display_title()))
            })?;
            if !proceed {
                ctx.out.info("Aborted.");
                return Ok(());
            }
            ctx.api.delete_bookmark(id)?;
            ctx.out.success(&format!("Bookmark #{} deleted", id));
            Ok(())
        }
    }
}

fn list_bookmarks(ctx: &AppContext, args: ListArgs, config: &Config) -> Result<()> {
    let now = Utc::now();
    let since = |flag: &str, value: Option<String>| -> Result<Option<String>> {
        value
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_since(&v, now).map_err(|e| Error::Validation(format!("--{}: {}", flag, e))))
            .transpose()
    };

    let limit = args.limit.unwrap_or(config.defaults.bookmark_limit);
    let opts = ListOptions {
        query: args.query,
        limit,
        offset: args.offset,
        archived: args.archived,
        modified_since: since("modified-since", args.modified_since)?,
        added_since: since("added-since", args.added_since)?,
        bundle: args.bundle,
    };

    let page = ctx.api.list_bookmarks(&opts)?;
    let notes = ListNotes {
        empty: None,
        more: Some(more_hint(opts.offset, opts.limit)),
    };
    ctx.out.print_list(&page, &notes)
}

fn more_hint(offset: u32, limit: u32) -> String {
    format!("Use --offset {} to see more", offset.saturating_add(limit))
}

fn create_bookmark(ctx: &AppContext, args: CreateArgs) -> Result<()> {
    let payload = BookmarkCreate {
        url: args.url,
        title: args.title.unwrap_or_default(),
        description: args.description.unwrap_or_default(),
        notes: args.notes.unwrap_or_default(),
        tag_names: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
        is_archived: args.archived,
        unread: args.unread,
        shared: args.shared,
    };
    let bookmark = ctx.api.create_bookmark(&payload, args.no_scraping)?;
    ctx.out
        .print_record(&bookmark, &views::bookmark_saved(&bookmark, "Bookmark created!"))
}

fn update_bookmark(ctx: &AppContext, args: UpdateArgs) -> Result<()> {
    let id = parse_id(&args.id, "bookmark")?;
    let tags = match (args.tags, args.add_tags, args.remove_tags) {
        (Some(tags), _, _) => TagChange::Replace(parse_tags(&tags)),
        (None, None, None) => TagChange::Keep,
        (None, add, remove) => TagChange::Merge {
            add: add.as_deref().map(parse_tags).unwrap_or_default(),
            remove: remove.as_deref().map(parse_tags).unwrap_or_default(),
        },
    };
    let changes = BookmarkChanges {
        url: args.new_url,
        title: args.title,
        description: args.description,
        notes: args.notes,
        tags,
        shared: args.shared,
        unread: args.unread,
    };
    let bookmark = ctx.api.update_bookmark(id, changes)?;
    ctx.out
        .print_record(&bookmark, &views::bookmark_saved(&bookmark, "Bookmark updated!"))
}

fn handle_tags(ctx: &AppContext, cmd: TagCommands) -> Result<()> {
    match cmd {
        TagCommands::List { limit, offset } => {
            let page = ctx.api.list_tags(limit, offset)?;
            let notes = ListNotes {
                empty: None,
                more: Some(more_hint(offset, limit)),
            };
            ctx.out.print_list(&page, &notes)
        }
        TagCommands::Get { id } => {
            let tag = ctx.api.get_tag(parse_id(&id, "tag")?)?;
            ctx.out.print_record(&tag, &views::tag(&tag))
        }
        TagCommands::Create { name } => {
            let tag = ctx.api.create_tag(&name)?;
            ctx.out.print_record(&tag, &views::tag_created(&tag))
        }
    }
}

fn handle_bundles(ctx: &AppContext, cmd: BundleCommands) -> Result<()> {
    match cmd {
        BundleCommands::List => {
            let page = ctx.api.list_bundles()?;
            ctx.out.print_list(&page, &ListNotes::default())
        }
        BundleCommands::Get { id } => {
            let bundle = ctx.api.get_bundle(parse_id(&id, "bundle")?)?;
            ctx.out.print_record(&bundle, &views::bundle(&bundle))
        }
        BundleCommands::Create { name, description } => {
            let payload = BundleCreate {
                name,
                description: description.unwrap_or_default(),
            };
            let bundle = ctx.api.create_bundle(&payload)?;
            ctx.out
                .print_record(&bundle, &views::bundle_saved(&bundle, "Bundle created!"))
        }
        BundleCommands::Update {
            id,
            name,
            description,
        } => {
            let id = parse_id(&id, "bundle")?;
            let bundle = ctx.api.update_bundle(id, &BundleUpdate { name, description })?;
            ctx.out
                .print_record(&bundle, &views::bundle_saved(&bundle, "Bundle updated!"))
        }
        BundleCommands::Delete { id, force } => {
            let id = parse_id(&id, "bundle")?;
            let proceed = confirmed(force, || {
                let bundle = ctx.api.get_bundle(id)?;
                Ok(delete_question("bundle", id, &bundle.name))
            })?;
            if !proceed {
                ctx.out.info("Aborted.");
                return Ok(());
            }
            ctx.api.delete_bundle(id)?;
            ctx.out.success(&format!("Bundle #{} deleted", id));
            Ok(())
        }
    }
}

fn handle_assets(ctx: &AppContext, cmd: AssetCommands) -> Result<()> {
    match cmd {
        AssetCommands::List { bookmark_id } => {
            let bookmark_id = parse_id(&bookmark_id, "bookmark")?;
            let page = ctx.api.list_assets(bookmark_id)?;
            let notes = ListNotes {
                empty: Some(format!("No assets found for bookmark #{}", bookmark_id)),
                more: None,
            };
            ctx.out.print_list(&page, &notes)
        }
        AssetCommands::Get {
            bookmark_id,
            asset_id,
        } => {
            let asset = ctx
                .api
                .get_asset(parse_id(&bookmark_id, "bookmark")?, parse_id(&asset_id, "asset")?)?;
            ctx.out.print_record(&asset, &views::asset(&asset))
        }
        AssetCommands::Upload { bookmark_id, file } => {
            let asset = ctx.api.upload_asset(parse_id(&bookmark_id, "bookmark")?, &file)?;
            ctx.out.print_record(&asset, &views::asset_uploaded(&asset))
        }
        AssetCommands::Download {
            bookmark_id,
            asset_id,
            path,
            output,
        } => {
            let bookmark_id = parse_id(&bookmark_id, "bookmark")?;
            let asset_id = parse_id(&asset_id, "asset")?;
            let target = match output.or(path) {
                Some(target) => target,
                None => {
                    let asset = ctx.api.get_asset(bookmark_id, asset_id)?;
                    default_download_path(&asset.display_name, asset_id)
                }
            };
            ctx.out.info(&format!("Downloading to {}", target.display()));
            ctx.api.download_asset(bookmark_id, asset_id, &target)?;
            let shown = std::fs::canonicalize(&target).unwrap_or(target);
            ctx.out
                .success(&format!("Asset downloaded to: {}", shown.display()));
            Ok(())
        }
        AssetCommands::Delete {
            bookmark_id,
            asset_id,
            force,
        } => {
            let bookmark_id = parse_id(&bookmark_id, "bookmark")?;
            let asset_id = parse_id(&asset_id, "asset")?;
            let proceed = confirmed(force, || {
                let asset = ctx.api.get_asset(bookmark_id, asset_id)?;
                Ok(delete_question("asset", asset_id, &asset.display_name))
            })?;
            if !proceed {
                ctx.out.info("Aborted.");
                return Ok(());
            }
            ctx.api.delete_asset(bookmark_id, asset_id)?;
            ctx.out.success(&format!("Asset #{} deleted", asset_id));
            Ok(())
        }
    }
}

/// The asset's display name reduced to a bare file name, or `asset-<id>`.
fn default_download_path(display_name: &str, asset_id: u64) -> PathBuf {
    Path::new(display_name.trim())
        .file_name()
        .filter(|name| !name.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("asset-{}", asset_id)))
}

fn handle_config(cmd: ConfigCommands, config: &Config, out: Formatter) -> Result<()> {
    match cmd {
        ConfigCommands::Init => config_init(config, out),
        ConfigCommands::Show => {
            let view = config_view(config);
            let value = serde_json::json!({
                "config_file": config.path,
                "url": config.url,
                "token": redact_token(&config.token),
                "defaults": config.defaults,
            });
            out.print_record(&value, &view)
        }
        ConfigCommands::Test => {
            let ctx = init_context(config, out)?;
            out.info(&format!("Testing connection to {}...", config.url));
            let profile = ctx.api.profile()?;
            let view = RecordView {
                plain: vec!["ok".to_string(), config.url.clone()],
                detail: Detail::new()
                    .success("Connection successful!")
                    .blank()
                    .section("User profile")
                    .item("Theme", &profile.theme)
                    .item("Bookmark date display", &profile.bookmark_date_display)
                    .item("Sharing enabled", profile.enable_sharing)
                    .item("Favicons enabled", profile.enable_favicons),
            };
            out.print_record(&profile, &view)
        }
    }
}

fn env_or_unset(key: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "(not set)".to_string())
}

fn config_view(config: &Config) -> RecordView {
    let env_token = std::env::var("LINKDING_TOKEN").unwrap_or_default();
    RecordView {
        plain: vec![
            config.path.display().to_string(),
            config.url.clone(),
            redact_token(&config.token),
            config.defaults.bookmark_limit.to_string(),
            config.defaults.output_format.to_string(),
        ],
        detail: Detail::new()
            .section("Configuration")
            .item("Config file", config.path.display())
            .item("URL", if config.url.is_empty() { "(not set)" } else { config.url.as_str() })
            .item("Token", redact_token(&config.token))
            .item("Default bookmark limit", config.defaults.bookmark_limit)
            .item("Default output format", config.defaults.output_format)
            .blank()
            .section("Environment variables")
            .item("LINKDING_URL", env_or_unset("LINKDING_URL"))
            .item("LINKDING_TOKEN", redact_token(&env_token))
            .item("NO_COLOR", env_or_unset("NO_COLOR")),
    }
}

fn config_init(config: &Config, out: Formatter) -> Result<()> {
    let path = &config.path;
    if !prompt::interactive() {
        return Err(Error::Config(
            "config init needs an interactive terminal; write the config file by hand instead".into(),
        ));
    }
    let existing = ConfigFile::load(path)?;
    if path.exists() {
        out.info(&format!("Config file already exists at: {}", path.display()));
        if !prompt::confirm("Overwrite?")? {
            out.info("Aborted.");
            return Ok(());
        }
    }

    out.info("Configure clinkding");
    let url = prompt::input("Linkding URL", existing.url.as_deref().or(Some(config.url.as_str())))?;
    let token = prompt::secret("API Token")?;
    // Validates the URL and token format without a network call.
    Client::new(&url, &token)?;

    let file = ConfigFile {
        url: Some(url),
        token: Some(token),
        defaults: existing.defaults,
    };
    file.save(path)?;
    debug!(path = %path.display(), "config file written");

    out.success(&format!("Configuration saved to: {}", path.display()));
    out.info("Test your configuration with: clinkding config test");
    Ok(())
}
