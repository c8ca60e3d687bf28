//! markmoji - Markdown editor core with live HTML preview

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::{ColoredString, Colorize};

use markmoji::cli::{default_preview_path, CliArgs, CliCommand, ThemeArgs};
use markmoji::config::{persist_theme_changes, MarkmojiConfig};
use markmoji::keymap::{Command, Keymap};
use markmoji::markdown::{handler_snippet, handlers, Converter, MarkmojiConverter};
use markmoji::messages::Msg;
use markmoji::model::{AppModel, DisplayFactory, EditorWindow, WindowId};
use markmoji::preview::PreviewDisplay;
use markmoji::runtime::{
    load_theme, prepare_catalog, Console, HtmlFileDisplay, NullDisplay, Runtime, RuntimeOptions,
};
use markmoji::syntax::{LanguageId, SyntaxStyler};
use markmoji::theme::{ThemeTarget, TokenAttributes};

fn main() -> Result<()> {
    let args = CliArgs::parse();
    markmoji::tracing::init();

    let mut config = MarkmojiConfig::load();
    if let Some(assets) = args.assets {
        config.assets_dir = Some(assets);
    }

    match args.command {
        CliCommand::Render {
            input,
            output,
            styled,
            theme,
        } => render(config, &input, output.as_deref(), styled, &theme),
        CliCommand::Watch {
            input,
            output,
            open,
            theme,
        } => watch(config, input, output, open, &theme),
        CliCommand::Themes {
            target,
            combinations,
            json,
        } => themes(&config, target, combinations, json),
        CliCommand::Highlight {
            input,
            language,
            theme,
        } => highlight(&config, &input, language.as_deref(), &theme),
        CliCommand::Handlers => {
            for handler in handlers() {
                println!(
                    "{}  {:<11} {:<11} {}",
                    handler.emoji,
                    handler.name,
                    format!("{:?}", handler.kind).to_lowercase(),
                    handler_snippet(handler.emoji)
                );
            }
            Ok(())
        }
    }
}

fn render(
    config: MarkmojiConfig,
    input: &Path,
    output: Option<&Path>,
    styled: bool,
    theme_args: &ThemeArgs,
) -> Result<()> {
    let catalog = prepare_catalog(&config)?;
    let theme = load_theme(&catalog, &theme_args.apply(&config.theme))?;
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let converter = MarkmojiConverter::new();
    let mut window = EditorWindow::new(WindowId(1), theme, Box::new(NullDisplay));
    window.load(input.to_path_buf(), &text);
    let result = window.render_now(&converter as &dyn Converter);
    tracing::info!("Rendered {} in {:?}", input.display(), result.elapsed);

    let html = if styled {
        window.styled_html()
    } else {
        window.raw_html()
    };
    match output {
        Some(path) => std::fs::write(path, &html)
            .with_context(|| format!("writing {}", path.display()))?,
        None => std::io::stdout()
            .write_all(html.as_bytes())
            .context("writing to stdout")?,
    }

    if result.failed {
        anyhow::bail!("could not parse {}; wrote the error document", input.display());
    }
    Ok(())
}

fn watch(
    config: MarkmojiConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    open: bool,
    theme_args: &ThemeArgs,
) -> Result<()> {
    let catalog = prepare_catalog(&config)?;
    let theme = load_theme(&catalog, &theme_args.apply(&config.theme))?;
    if theme_args.is_empty() {
        if let Some(path) = markmoji::config_paths::config_file() {
            persist_theme_changes(&theme, path);
        }
    }

    let preview_path = output.unwrap_or_else(|| default_preview_path(&input));
    let first_preview = preview_path.clone();
    let displays: DisplayFactory = Box::new(move |id: WindowId| -> Box<dyn PreviewDisplay> {
        if id == WindowId(1) {
            Box::new(HtmlFileDisplay::new(&first_preview).open_in_browser(open))
        } else {
            let stem = first_preview
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Box::new(HtmlFileDisplay::new(
                first_preview.with_file_name(format!("{}.{}.html", stem, id)),
            ))
        }
    });

    let options = RuntimeOptions {
        background_render: true,
        watch_files: true,
        render_debounce: config.render_debounce(),
    };
    let console = Console::new(&catalog, Keymap::with_defaults());
    let model = AppModel::new(
        catalog,
        theme,
        Arc::new(MarkmojiConverter::new()),
        config,
        displays,
    );

    let mut runtime = Runtime::new(model, options)?;
    runtime.dispatch(Msg::command(Command::Open(input.clone())));
    console.spawn(runtime.sender()).context("starting console")?;

    eprintln!(
        "{} {} {} {} (type 'help' for commands)",
        "Previewing".green().bold(),
        input.display(),
        "at".dimmed(),
        preview_path.display()
    );
    runtime.run()
}

fn themes(
    config: &MarkmojiConfig,
    target: Option<ThemeTarget>,
    combinations: bool,
    json: bool,
) -> Result<()> {
    let catalog = prepare_catalog(config)?;

    if combinations {
        let names: Vec<String> = catalog.combinations().iter().map(ToString::to_string).collect();
        if json {
            println!("{}", serde_json::to_string_pretty(&names)?);
        } else {
            for name in names {
                println!("{}", name);
            }
        }
        return Ok(());
    }

    let targets = match target {
        Some(target) => vec![target],
        None => ThemeTarget::ALL.to_vec(),
    };

    if json {
        let listing: std::collections::BTreeMap<String, _> = targets
            .iter()
            .map(|t| (t.to_string(), catalog.discover(*t)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for target in targets {
        let active = config.theme.get(target);
        println!("{}", target.to_string().bold());
        for (family, variants) in catalog.discover(target) {
            let variants: Vec<String> = variants
                .into_iter()
                .map(|variant| {
                    if active.family == family && active.variant == variant {
                        format!("{}*", variant).green().to_string()
                    } else {
                        variant
                    }
                })
                .collect();
            println!("  {}: {}", family, variants.join(", "));
        }
    }
    Ok(())
}

fn highlight(
    config: &MarkmojiConfig,
    input: &Path,
    language: Option<&str>,
    theme_args: &ThemeArgs,
) -> Result<()> {
    let language = match language {
        Some(name) => {
            LanguageId::from_name(name).with_context(|| format!("unknown language '{}'", name))?
        }
        None => LanguageId::from_path(input),
    };
    let catalog = prepare_catalog(config)?;
    let selection = theme_args.apply(&config.theme);
    let style = catalog.resolve_editor(&selection.editor)?;
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let chars: Vec<char> = source.chars().collect();
    let mut out = std::io::stdout().lock();
    for span in SyntaxStyler::new().styled_spans(&source, language, &style) {
        let Some(text) = chars.get(span.chars.clone()) else {
            continue;
        };
        let text: String = text.iter().collect();
        write!(out, "{}", paint(&text, &span.attributes))?;
    }
    out.flush()?;
    Ok(())
}

fn paint(text: &str, attributes: &TokenAttributes) -> ColoredString {
    let mut painted = text.normal();
    if let Some(color) = attributes.color {
        painted = painted.truecolor(color.r, color.g, color.b);
    }
    if attributes.bold {
        painted = painted.bold();
    }
    if attributes.italic {
        painted = painted.italic();
    }
    if attributes.underline {
        painted = painted.underline();
    }
    painted
}
