#![forbid(unsafe_code)]

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{Level as TraceLevel, info, warn};
use tracing_subscriber::FmtSubscriber;

use koder::app::{AppContext, Application};
use koder::bus::AppEvent;
use koder::config::{PreferenceIntent, Preferences};
use koder::constants::margin;
use koder::language::{LanguageRegistry, MenuEntry, menu};
use koder::widget::{MemoryWidget, TextWidget};
use koder::window::{EditorWindow, WindowIntent};

/// Koder editor core
#[derive(Parser, Debug)]
#[command(name = "koder", version, about = "Koder editor core")]
struct Args {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or change preferences
    #[command(subcommand)]
    Prefs(PrefsCommand),

    /// List languages as they appear in the language menu
    Languages {
        /// Group languages by first letter
        #[arg(long)]
        compact: bool,
    },

    /// Type a file into a headless editor window and report the result
    Replay {
        file: PathBuf,

        /// Language to select before typing, by name or lexer
        #[arg(long)]
        language: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    /// Print the effective preferences as JSON
    Show,

    /// Stage KEY=VALUE changes, apply them and save
    Set {
        #[arg(required = true, value_name = "KEY=VALUE")]
        changes: Vec<String>,
    },
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
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
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;
    Ok(())
}

fn load_preferences(path: &std::path::Path) -> Preferences {
    let (preferences, error) = Preferences::load_or_default(path);
    if let Some(err) = error {
        warn!(error = %err, "Continuing with default preferences");
    }
    preferences
}

fn prefs_show(settings: PathBuf) -> Result<()> {
    let preferences = load_preferences(&settings);
    let json =
        serde_json::to_string_pretty(&preferences).context("Failed to serialize preferences")?;
    println!("{json}");
    Ok(())
}

fn prefs_set(settings: PathBuf, changes: &[String]) -> Result<()> {
    let intents = changes
        .iter()
        .map(|change| {
            let (key, value) = change
                .split_once('=')
                .ok_or_else(|| anyhow!("expected KEY=VALUE, got '{change}'"))?;
            PreferenceIntent::parse(key.trim(), value)
                .with_context(|| format!("Invalid change '{change}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut app: Application<MemoryWidget> = Application::from_settings(&settings);
    if let Some(err) = app.take_config_error() {
        warn!(error = %err, "Continuing with default preferences");
    }

    let session = app.open_preferences();
    for intent in intents {
        session.handle(intent);
    }
    session.handle(PreferenceIntent::Apply);
    app.close_preferences();
    app.pump();

    if let Some(err) = app.take_config_error() {
        return Err(err).context("Preferences were applied but not saved");
    }
    info!(path = %settings.display(), "Preferences saved");
    Ok(())
}

fn print_menu(entries: &[MenuEntry], depth: usize) {
    for entry in entries {
        let indent = "  ".repeat(depth);
        match entry {
            MenuEntry::Item { id, label } => println!("{indent}{label} ({id})"),
            MenuEntry::Group { label, items } => {
                println!("{indent}{label}/");
                print_menu(items, depth + 1);
            }
        }
    }
}

fn languages(compact: bool) {
    let mut registry = LanguageRegistry::builtin();
    registry.sort_alphabetically();
    print_menu(&menu::build(&registry, compact), 0);
}

async fn replay(settings: PathBuf, file: PathBuf, language: Option<String>) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let context = AppContext::new(load_preferences(&settings));
    let mut window = EditorWindow::new(MemoryWidget::new(), context.clone(), Some(file.clone()));

    if let Some(name) = language {
        let id = context
            .languages
            .find_by_name(&name)
            .map(|def| def.id)
            .ok_or_else(|| anyhow!("unknown language '{name}'"))?;
        window.handle_intent(WindowIntent::LanguageSelected(id));
    }

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        window.widget_mut().type_char(c);
        window.process_notifications();

        if c == '\n' {
            // Indentation the editor carried over is not typed a second time
            let widget = window.widget();
            let caret = widget.caret();
            let start = widget.line_start(widget.line_from_position(caret));
            for carried in widget.text_range(start, caret).chars() {
                if chars.next_if_eq(&carried).is_none() {
                    break;
                }
            }
        }
    }

    // Hand the window to its own task and shut it down the way the editor does
    let handle = tokio::spawn(window.run());
    context.bus.publish(AppEvent::EditorQuitting);
    let window = handle.await.context("Window task failed")?;

    let widget = window.widget();
    if widget.len_chars() == 0 && !text.is_empty() {
        bail!("replay produced an empty buffer");
    }
    println!("{}", widget.text());
    println!("---");
    println!("title: {}", window.title());
    println!("lines: {}", widget.line_count());
    println!("line number margin: {}px", widget.margin_width(margin::NUMBER));
    match window.analyzer().brace_highlight() {
        Some((open, close)) => println!("brace highlight: {open}..{close}"),
        None => println!("brace highlight: none"),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_logging()?;
    let args = Args::parse();
    let settings = args.settings.unwrap_or_else(Preferences::default_path);

    match args.command {
        Command::Prefs(PrefsCommand::Show) => prefs_show(settings),
        Command::Prefs(PrefsCommand::Set { changes }) => prefs_set(settings, &changes),
        Command::Languages { compact } => {
            languages(compact);
            Ok(())
        }
        Command::Replay { file, language } => replay(settings, file, language).await,
    }
}
