//! Command handlers. Each takes the resolved [`Context`] and reports through
//! [`crate::ui`]; library errors are lifted into `anyhow` here.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};

use super::orchestration::{run_bump_workflow, BumpWorkflowArgs, ChangelogResult};
use super::{Commands, ConfigCommand};
use crate::activity;
use crate::audit::run_audit;
use crate::changelog;
use crate::config::{self, flatten, Origin, ResolvedConfig, ResolvedValue, Settings};
use crate::rollback::{perform_rollback, RollbackOutcome};
use crate::ui::{self, Theme};
use crate::version_file::{LoadOutcome, VersionFile};

/// Everything a command needs from one invocation
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    pub config: ResolvedConfig,
    pub config_path: PathBuf,
    /// Explicit `--profile`, used to scope `config delete`
    pub profile: Option<String>,
    pub theme: Theme,
}

impl Context {
    pub fn new(config: ResolvedConfig, config_path: PathBuf, profile: Option<String>) -> Result<Self> {
        let settings = config.settings().context("Invalid configuration values")?;
        let theme = Theme::new(settings.emoji_fallback, settings.silent);
        Ok(Context {
            settings,
            config,
            config_path,
            profile,
            theme,
        })
    }
}

/// Run one parsed command
pub fn dispatch(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Init => init(ctx),
        Commands::Bump {
            level,
            pre,
            message,
            no_changelog,
        } => bump(ctx, level, pre, message, no_changelog),
        Commands::Version => show_version(ctx),
        Commands::Log { lines } => show_log(ctx, lines),
        Commands::Rollback { version_only, yes } => rollback(ctx, version_only, yes),
        Commands::Reset { yes } => reset(ctx, yes),
        Commands::Audit { strict } => audit(ctx, strict),
        Commands::Config { command } => match command {
            ConfigCommand::Show => config_show(ctx),
            ConfigCommand::Get { key } => config_get(ctx, &key),
            ConfigCommand::Set { key, value } => config_set(ctx, &key, &value),
            ConfigCommand::Delete { keys, yes } => config_delete(ctx, &keys, yes),
        },
    }
}

fn init(ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;
    let version_file = VersionFile::new(&settings.version_file);

    if version_file.exists() {
        ui::display_status(
            &ctx.theme,
            &format!("{} already exists", settings.version_file.display()),
        );
    } else {
        let loaded = version_file.load()?;
        ui::display_success(
            &ctx.theme,
            &format!(
                "Created {} at {}",
                settings.version_file.display(),
                loaded.version
            ),
        );
    }

    if changelog::ensure_exists(&settings.changelog_file)? {
        ui::display_success(
            &ctx.theme,
            &format!("Created {}", settings.changelog_file.display()),
        );
    } else {
        ui::display_status(
            &ctx.theme,
            &format!("{} already exists", settings.changelog_file.display()),
        );
    }

    fs::create_dir_all(&settings.log_dir)
        .with_context(|| format!("Failed to create {}", settings.log_dir.display()))?;
    note_activity(settings, "init");
    Ok(())
}

fn bump(
    ctx: &Context,
    level: Option<String>,
    pre: Option<String>,
    message: Option<String>,
    no_changelog: bool,
) -> Result<()> {
    let message = if no_changelog {
        None
    } else if message.is_some() {
        message
    } else if !ctx.theme.silent && console::user_attended() {
        Some(ui::prompt_line("Changelog message (leave blank to skip)")?)
    } else {
        None
    };

    let args = BumpWorkflowArgs {
        level,
        pre_label: pre,
        message,
    };
    let result = run_bump_workflow(&args, &ctx.settings)?;

    report_load_outcome(&ctx.theme, &ctx.settings.version_file, &result.load_outcome);
    ui::display_version_change(
        &ctx.theme,
        &result.previous.to_string(),
        &result.current.to_string(),
    );

    match result.changelog {
        ChangelogResult::Added => ui::display_success(
            &ctx.theme,
            &format!("Changelog updated: {}", ctx.settings.changelog_file.display()),
        ),
        ChangelogResult::BlankMessage => {
            ui::display_status(&ctx.theme, "Empty changelog message, no entry written")
        }
        ChangelogResult::MissingHeading => ui::display_warning(
            &ctx.theme,
            &format!(
                "{} has no `{}` heading; entry not written (require_changelog_heading)",
                ctx.settings.changelog_file.display(),
                changelog::TITLE
            ),
        ),
        ChangelogResult::NotRequested => {}
    }

    ui::display_success(
        &ctx.theme,
        &format!("{} bump complete: {}", result.level, result.current),
    );
    Ok(())
}

fn show_version(ctx: &Context) -> Result<()> {
    let loaded = VersionFile::new(&ctx.settings.version_file).load()?;
    report_load_outcome(&ctx.theme, &ctx.settings.version_file, &loaded.outcome);
    ui::display_version(&ctx.theme, &loaded.version.to_string());
    Ok(())
}

fn show_log(ctx: &Context, lines: usize) -> Result<()> {
    let recent = changelog::recent_lines(&ctx.settings.changelog_file, lines)?;
    if recent.is_empty() {
        ui::display_warning(
            &ctx.theme,
            &format!("No entries in {}", ctx.settings.changelog_file.display()),
        );
        return Ok(());
    }
    ui::display_recent_lines(&ctx.theme, &recent);
    Ok(())
}

fn rollback(ctx: &Context, version_only: bool, yes: bool) -> Result<()> {
    let version_file = VersionFile::new(&ctx.settings.version_file);
    if !version_file.backup_path().exists() {
        ui::display_warning(&ctx.theme, "No backup found, nothing to roll back");
        return Ok(());
    }

    if !yes && !ui::confirm_action("Restore the previous version from backup?")? {
        ui::display_status(&ctx.theme, "Rollback cancelled");
        return Ok(());
    }

    match perform_rollback(&version_file, &ctx.settings.changelog_file, version_only)? {
        RollbackOutcome::NoBackup => {
            ui::display_warning(&ctx.theme, "No backup found, nothing to roll back");
        }
        RollbackOutcome::Restored {
            version,
            changelog_section_removed,
        } => {
            ui::display_success(&ctx.theme, &format!("Version restored to {}", version));
            if changelog_section_removed {
                ui::display_success(&ctx.theme, "Removed the latest changelog section");
            }
            note_activity(&ctx.settings, &format!("rollback to {}", version));
        }
    }
    Ok(())
}

fn reset(ctx: &Context, yes: bool) -> Result<()> {
    if !yes && !ui::confirm_action("Delete the version file and changelog?")? {
        ui::display_status(&ctx.theme, "Reset cancelled");
        return Ok(());
    }

    let version_file = VersionFile::new(&ctx.settings.version_file);
    let targets = [
        version_file.path().to_path_buf(),
        version_file.backup_path(),
        ctx.settings.changelog_file.clone(),
    ];

    let mut removed = 0;
    for path in &targets {
        if remove_if_present(path)? {
            ui::display_success(&ctx.theme, &format!("Deleted {}", path.display()));
            removed += 1;
        }
    }

    if removed == 0 {
        ui::display_status(&ctx.theme, "Nothing to reset");
    } else {
        note_activity(&ctx.settings, "reset");
    }
    Ok(())
}

fn audit(ctx: &Context, strict: bool) -> Result<()> {
    let report = run_audit(&ctx.settings, strict);
    ui::display_audit_report(&ctx.theme, &report);
    if report.has_errors() {
        bail!(
            "Audit found {} error(s)",
            report.count(crate::audit::Severity::Error)
        );
    }
    Ok(())
}

fn config_show(ctx: &Context) -> Result<()> {
    let entries: Vec<(String, ResolvedValue)> = flatten(ctx.config.values())
        .into_iter()
        .map(|(key, value)| {
            let origin = ctx
                .config
                .value_with_origin(&key)
                .map(|resolved| resolved.origin)
                .unwrap_or(Origin::Default);
            (key, ResolvedValue { value, origin })
        })
        .collect();

    ui::display_config_entries(&ctx.theme, ctx.config.active_profile(), &entries);
    Ok(())
}

fn config_get(ctx: &Context, key: &str) -> Result<()> {
    config::KeyPath::parse(key)?;
    match ctx.config.value_with_origin(key) {
        Some(resolved) => ui::display_config_value(key, &resolved),
        None => ui::display_warning(&ctx.theme, &format!("Key not found: {}", key)),
    }
    Ok(())
}

fn config_set(ctx: &Context, key: &str, raw: &str) -> Result<()> {
    let value = config::set_value(key, raw, &ctx.config_path)?;
    ui::display_success(
        &ctx.theme,
        &format!(
            "Set {} = {} in {}",
            key,
            ui::format_value(&value),
            ctx.config_path.display()
        ),
    );
    Ok(())
}

fn config_delete(ctx: &Context, keys: &[String], yes: bool) -> Result<()> {
    let outcome = config::try_delete_keys(
        keys,
        ctx.profile.as_deref(),
        &ctx.config_path,
        !yes,
        |key| {
            ui::confirm_action(&format!("Delete `{}`?", key))
                .context("Failed to read confirmation")
        },
    )?;

    for key in &outcome.deleted {
        ui::display_success(&ctx.theme, &format!("Deleted {}", key));
    }
    for key in &outcome.not_found {
        ui::display_warning(&ctx.theme, &format!("Key not found: {}", key));
    }
    for key in &outcome.declined {
        ui::display_status(&ctx.theme, &format!("Kept {}", key));
    }
    Ok(())
}

fn report_load_outcome(theme: &Theme, path: &Path, outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Loaded => {}
        LoadOutcome::Created => ui::display_status(
            theme,
            &format!("{} not found, starting from the default version", path.display()),
        ),
        LoadOutcome::Repaired { invalid } => ui::display_warning(
            theme,
            &format!(
                "{} held an invalid version ({:?}) and was reset to the default",
                path.display(),
                invalid
            ),
        ),
    }
}

fn remove_if_present(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to delete {}", path.display())),
    }
}

fn note_activity(settings: &Settings, message: &str) {
    if let Err(e) = activity::record(&settings.activity_log, message) {
        tracing::warn!(error = %e, "could not record activity");
    }
}
