use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::{Level as TraceLevel, debug, info};
use tracing_subscriber::FmtSubscriber;

use miniapp_theme::admin::AdminGate;
use miniapp_theme::config::{BuildOverrides, FeatureFlag, FontChoice, PaletteKey, ThemeConfig, ThemeMode};
use miniapp_theme::constants;
use miniapp_theme::persistence::{self, FileStore, ThemeStore};
use miniapp_theme::preference::SystemPreference;
use miniapp_theme::sdk::HostBridge;
use miniapp_theme::session::ThemeSession;
use miniapp_theme::style::CssVariables;

/// Mini app theme and feature-flag editor
#[derive(Debug, Parser)]
#[command(name = "miniapp-theme", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current configuration as JSON
    Show,

    /// Print the resolved theme as a CSS :root block
    Css,

    /// Set the color mode (system, light or dark)
    SetMode { mode: ThemeMode },

    /// Edit branding, palette colors and feature flags
    Edit(EditArgs),

    /// Write the configuration to miniapp-theme.json
    Export {
        /// Target directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Load a configuration from a JSON file and apply it
    Import {
        file: PathBuf,

        /// Commit even when auto-apply is off
        #[arg(long)]
        save: bool,
    },

    /// Forget the stored configuration and return to defaults
    Reset,

    /// Show or change the editor auto-apply toggle
    AutoApply { enabled: Option<bool> },

    /// Admin gate for editing commands
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Debug, Subcommand)]
enum AdminAction {
    Login { passcode: String },
    Logout,
    Status,
}

#[derive(Debug, clap::Args)]
struct EditArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    subtitle: Option<String>,
    #[arg(long)]
    logo_url: Option<String>,
    #[arg(long)]
    accent: Option<String>,
    #[arg(long)]
    accent_foreground: Option<String>,
    #[arg(long)]
    font: Option<FontChoice>,
    #[arg(long)]
    announcement: Option<String>,
    #[arg(long)]
    show_announcement: Option<bool>,

    /// Palette targeted by --color
    #[arg(long, default_value = "dark")]
    palette: PaletteKey,

    /// Palette color as FIELD=VALUE (e.g. panelMuted=#0f172a), repeatable
    #[arg(long = "color", value_name = "FIELD=VALUE")]
    colors: Vec<String>,

    /// Link as FIELD=VALUE (e.g. primaryUrl=https://...), repeatable
    #[arg(long = "link", value_name = "FIELD=VALUE")]
    links: Vec<String>,

    /// Feature flag to switch on, repeatable
    #[arg(long)]
    enable: Vec<FeatureFlag>,

    /// Feature flag to switch off, repeatable
    #[arg(long)]
    disable: Vec<FeatureFlag>,

    /// Commit even when auto-apply is off
    #[arg(long)]
    save: bool,
}

/// What to do with an edited or imported draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DraftAction {
    Commit,
    Preview,
}

/// An explicit save always commits; otherwise auto-apply decides
fn draft_action(auto_apply: bool, save: bool) -> DraftAction {
    if save || auto_apply {
        DraftAction::Commit
    } else {
        DraftAction::Preview
    }
}

fn init_tracing() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var(constants::env::LOG_LEVEL)
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn split_assignment(raw: &str) -> Result<(&str, &str)> {
    raw.split_once('=')
        .with_context(|| format!("Expected FIELD=VALUE, got '{raw}'"))
}

fn require_unlocked(gate: &AdminGate<FileStore>) -> Result<()> {
    if !gate.is_unlocked() {
        bail!("Admin gate is locked; run `miniapp-theme admin login <PASSCODE>` first");
    }
    Ok(())
}

fn commit_or_preview<S, V>(
    session: &mut ThemeSession<S, V>,
    bridge: &HostBridge,
    next: ThemeConfig,
    action: DraftAction,
) -> Result<()>
where
    S: miniapp_theme::KeyValueStore,
    V: miniapp_theme::StyleSurface,
{
    match action {
        DraftAction::Commit => {
            session.set_config(next);
            bridge.emit("theme_saved", None);
            info!("Theme updated");
        }
        DraftAction::Preview => {
            println!("{}", persistence::export_json(&next)?);
            info!("Auto-apply is off; draft not saved (pass --save to commit)");
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let overrides = BuildOverrides::compiled();
    let bridge = HostBridge::default();
    bridge.ready();

    let store = ThemeStore::with_default_baseline(FileStore::open_default());
    debug!(dir = %store.store().dir().display(), "Theme store");
    let mut gate = AdminGate::new(FileStore::open_session(), &overrides);
    let mut session = ThemeSession::start(store, SystemPreference::detect(), CssVariables::new());

    match cli.command {
        Command::Show => {
            println!("{}", session.export_json()?);
        }
        Command::Css => {
            print!("{}", session.surface().to_stylesheet());
        }
        Command::SetMode { mode } => {
            require_unlocked(&gate)?;
            session.set_mode(mode);
            info!(mode = %mode, resolved = %session.resolved_mode(), "Mode updated");
            bridge.emit("theme_saved", Some(&json!({ "mode": mode.as_str() })));
        }
        Command::Edit(args) => {
            require_unlocked(&gate)?;
            let mut next = session.config().clone();

            if let Some(title) = args.title {
                next.title = title;
            }
            if let Some(subtitle) = args.subtitle {
                next.subtitle = subtitle;
            }
            if let Some(logo_url) = args.logo_url {
                next.logo_url = logo_url;
            }
            if let Some(accent) = args.accent {
                next.accent = accent;
            }
            if let Some(accent_foreground) = args.accent_foreground {
                next.accent_foreground = accent_foreground;
            }
            if let Some(font) = args.font {
                next.font = font;
            }
            if let Some(text) = args.announcement {
                next.announcement_text = text;
            }
            if let Some(show) = args.show_announcement {
                next.show_announcement = show;
            }

            let palette = next.palettes.get_mut(args.palette);
            for raw in &args.colors {
                let (field, value) = split_assignment(raw)?;
                let target = palette
                    .field_mut(field)
                    .with_context(|| format!("Unknown palette field '{field}'"))?;
                *target = value.to_string();
            }
            for raw in &args.links {
                let (field, value) = split_assignment(raw)?;
                let target = next
                    .links
                    .field_mut(field)
                    .with_context(|| format!("Unknown link field '{field}'"))?;
                *target = value.to_string();
            }
            for flag in args.enable {
                next.features.set(flag, true);
            }
            for flag in args.disable {
                next.features.set(flag, false);
            }

            let action = draft_action(session.store().auto_apply(), args.save);
            commit_or_preview(&mut session, &bridge, next, action)?;
        }
        Command::Export { out } => {
            let path = session.export_to_file(&out)?;
            println!("{}", path.display());
        }
        Command::Import { file, save } => {
            require_unlocked(&gate)?;
            let next = session
                .store()
                .import_from_file(&file)
                .await
                .with_context(|| format!("Import of {} failed", file.display()))?;
            let action = draft_action(session.store().auto_apply(), save);
            commit_or_preview(&mut session, &bridge, next, action)?;
        }
        Command::Reset => {
            require_unlocked(&gate)?;
            session.reset();
        }
        Command::AutoApply { enabled } => {
            if let Some(enabled) = enabled {
                require_unlocked(&gate)?;
                session.store_mut().set_auto_apply(enabled);
            }
            println!("{}", session.store().auto_apply());
        }
        Command::Admin { action } => match action {
            AdminAction::Login { passcode } => gate.login(&passcode)?,
            AdminAction::Logout => gate.logout(),
            AdminAction::Status => {
                let state = if gate.is_unlocked() { "unlocked" } else { "locked" };
                println!("{state}");
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use miniapp_theme::persistence::MemoryStore;
    use miniapp_theme::preference::SystemPreference;

    #[test]
    fn test_draft_action() {
        assert_eq!(draft_action(true, false), DraftAction::Commit);
        assert_eq!(draft_action(true, true), DraftAction::Commit);
        assert_eq!(draft_action(false, true), DraftAction::Commit);
        assert_eq!(draft_action(false, false), DraftAction::Preview);
    }

    #[test]
    fn test_edit_save_flag_parses() {
        let cli = Cli::try_parse_from(["miniapp-theme", "edit", "--title", "Saved", "--save"]).unwrap();
        let Command::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert!(args.save);
        assert_eq!(args.title.as_deref(), Some("Saved"));

        let cli = Cli::try_parse_from(["miniapp-theme", "import", "theme.json", "--save"]).unwrap();
        assert!(matches!(cli.command, Command::Import { save: true, .. }));
    }

    #[test]
    fn test_save_commits_with_auto_apply_off() {
        let shared = MemoryStore::new();
        let mut store = ThemeStore::with_default_baseline(shared.clone());
        store.set_auto_apply(false);
        let mut session = ThemeSession::start(store, SystemPreference::new(false), CssVariables::new());
        let bridge = HostBridge::default();

        let mut draft = session.config().clone();
        draft.title = "Draft".to_string();

        let action = draft_action(session.store().auto_apply(), false);
        commit_or_preview(&mut session, &bridge, draft.clone(), action).unwrap();
        assert_ne!(session.config().title, "Draft");

        let action = draft_action(session.store().auto_apply(), true);
        commit_or_preview(&mut session, &bridge, draft.clone(), action).unwrap();
        assert_eq!(session.config(), &draft);

        let reloaded = ThemeStore::with_default_baseline(shared).load();
        assert_eq!(reloaded.title, "Draft");
    }
}
