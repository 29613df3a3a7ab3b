//! Command-line interface for the GP editor core
//! This binary runs the editor's parsers, highlighter and graph layout outside the editor.
//!
//! Usage:
//!   gp tokens `<path>` [--language `<lang>`] [--format simple|json]   - Print the token stream
//!   gp check `<path>` [--language `<lang>`]                           - Report error tokens, exit 1 if any
//!   gp highlight `<path>` [--language `<lang>`] [--format simple|json] - Print per-line style ranges
//!   gp layout `<graph>` [--algorithm `<name>`] [--direction `<dir>`]  - Lay out a JSON/YAML graph
//!
//! Every command accepts `--config <file>` and `--set key=value` to adjust the configuration.

use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use gp_config::{GpConfig, Loader};
use gp_layout::{Graph, LayoutAlgorithm, LayoutDirection, LayoutEngine};
use gp_parser::gp::highlighting::highlight_lines;
use gp_parser::gp::{BlockHighlight, ConditionParser, EditorBuffer, ProgramParser, Tokenizer};
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    init_log();
    let matches = cli().get_matches();
    let (name, sub) = matches
        .subcommand()
        .context("a subcommand is required")?;
    let config = load_config(sub)?;

    match name {
        "tokens" => handle_tokens_command(sub, &config),
        "check" => handle_check_command(sub, &config),
        "highlight" => handle_highlight_command(sub, &config),
        "layout" => handle_layout_command(sub, &config),
        other => bail!("Unknown command '{}'", other),
    }
}

fn init_log() {
    let _ = env_logger::builder()
        .format_level(false)
        .format_target(false)
        .format_timestamp(None)
        .try_init();
}

fn cli() -> Command {
    Command::new("gp")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting GP programs and laying out GP graphs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            source_command("tokens", "Print the token stream of a GP source file")
                .arg(format_arg()),
        )
        .subcommand(source_command(
            "check",
            "Report the error tokens of a GP source file; exits with 1 when there are any",
        ))
        .subcommand(
            source_command("highlight", "Print the style ranges of every line").arg(format_arg()),
        )
        .subcommand(
            Command::new("layout")
                .about("Lay out a graph and print it as JSON")
                .arg(
                    Arg::new("path")
                        .help("Graph file (.json, .yaml or .yml)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("algorithm")
                        .long("algorithm")
                        .short('a')
                        .help(format!(
                            "Layout algorithm: {} (default: from configuration, circular for unplaced graphs)",
                            LayoutAlgorithm::names().join(", ")
                        )),
                )
                .arg(
                    Arg::new("direction")
                        .long("direction")
                        .short('d')
                        .help("Tree growth direction: top_to_bottom, bottom_to_top, left_to_right, right_to_left"),
                )
                .args(config_args()),
        )
}

fn source_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new("path")
                .help("Path to the GP source file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("language")
                .long("language")
                .short('l')
                .help("Source language")
                .value_parser(["program", "condition"])
                .default_value("program"),
        )
        .args(config_args())
}

fn format_arg() -> Arg {
    Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format")
        .value_parser(["simple", "json"])
        .default_value("simple")
}

fn config_args() -> [Arg; 2] {
    [
        Arg::new("config")
            .long("config")
            .short('c')
            .help("Configuration file layered over the built-in defaults"),
        Arg::new("set")
            .long("set")
            .value_name("KEY=VALUE")
            .help("Override one configuration key, e.g. layout.margin=40")
            .action(ArgAction::Append),
    ]
}

fn load_config(matches: &ArgMatches) -> Result<GpConfig> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for setting in matches.get_many::<String>("set").into_iter().flatten() {
        let (key, value) = setting
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got '{}'", setting))?;
        loader = loader
            .set_override(key.trim(), value.trim())
            .with_context(|| format!("Invalid override '{}'", setting))?;
    }
    loader.build().context("Failed to load configuration")
}

fn read_source(matches: &ArgMatches) -> Result<(String, String)> {
    let path = matches
        .get_one::<String>("path")
        .context("path is required")?;
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    Ok((path.clone(), text))
}

fn language(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("language")
        .map(String::as_str)
        .unwrap_or("program")
}

fn format(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("simple")
}

/// Handle the tokens command
fn handle_tokens_command(matches: &ArgMatches, config: &GpConfig) -> Result<()> {
    let (_, text) = read_source(matches)?;
    let output = match language(matches) {
        "condition" => render_tokens(buffer::<ConditionParser>(&text, config), format(matches))?,
        _ => render_tokens(buffer::<ProgramParser>(&text, config), format(matches))?,
    };
    println!("{}", output);
    Ok(())
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches, config: &GpConfig) -> Result<()> {
    let (path, text) = read_source(matches)?;
    let diagnostics = match language(matches) {
        "condition" => diagnostics(&buffer::<ConditionParser>(&text, config)),
        _ => diagnostics(&buffer::<ProgramParser>(&text, config)),
    };
    if diagnostics.is_empty() {
        println!("{}: no errors", path);
        return Ok(());
    }
    for (offset, message) in &diagnostics {
        let (line, column) = line_column(&text, *offset);
        eprintln!("{}:{}:{}: {}", path, line, column, message);
    }
    eprintln!("{}: {} error(s)", path, diagnostics.len());
    std::process::exit(1);
}

/// Handle the highlight command
fn handle_highlight_command(matches: &ArgMatches, config: &GpConfig) -> Result<()> {
    let (_, text) = read_source(matches)?;
    let blocks = match language(matches) {
        "condition" => highlight(&buffer::<ConditionParser>(&text, config)),
        _ => highlight(&buffer::<ProgramParser>(&text, config)),
    };
    let output = match format(matches) {
        "json" => serde_json::to_string_pretty(&blocks).context("Error formatting highlights")?,
        _ => blocks
            .iter()
            .enumerate()
            .map(|(index, block)| render_block(index + 1, block))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    println!("{}", output);
    Ok(())
}

/// Handle the layout command
fn handle_layout_command(matches: &ArgMatches, config: &GpConfig) -> Result<()> {
    let path = matches
        .get_one::<String>("path")
        .context("path is required")?;
    let mut graph = read_graph(Path::new(path))?;

    let algorithm = matches
        .get_one::<String>("algorithm")
        .map(|name| name.parse::<LayoutAlgorithm>())
        .transpose()?;
    let direction = matches
        .get_one::<String>("direction")
        .map(|name| name.parse::<LayoutDirection>())
        .transpose()?;

    let engine = LayoutEngine::new(config.layout.clone());
    match algorithm {
        Some(algorithm) => engine.apply_layout(&mut graph, algorithm, direction),
        None if graph.needs_initial_layout() => engine.ensure_initial_layout(&mut graph).map(|_| ()),
        None => engine.apply_layout(&mut graph, config.layout.algorithm, direction),
    }
    .with_context(|| format!("Failed to lay out {}", path))?;

    let json = serde_json::to_string_pretty(&graph).context("Error formatting graph")?;
    println!("{}", json);
    Ok(())
}

fn buffer<P: Tokenizer + Default>(text: &str, config: &GpConfig) -> EditorBuffer<P> {
    let mut buffer = EditorBuffer::new(P::default(), config.highlighting.clone());
    buffer.set_text(text);
    buffer.reparse();
    buffer
}

fn render_tokens<P: Tokenizer>(buffer: EditorBuffer<P>, format: &str) -> Result<String> {
    match format {
        "json" => serde_json::to_string_pretty(buffer.tokens()).context("Error formatting tokens"),
        _ => Ok(buffer
            .tokens()
            .iter()
            .map(|token| token.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn diagnostics<P: Tokenizer>(buffer: &EditorBuffer<P>) -> Vec<(usize, String)> {
    buffer
        .tokens()
        .errors()
        .map(|token| {
            let description = token.description.as_deref().unwrap_or("Error");
            (token.start, format!("{} ({:?})", description, token.text))
        })
        .collect()
}

fn highlight<P: Tokenizer>(buffer: &EditorBuffer<P>) -> Vec<BlockHighlight> {
    highlight_lines(buffer.highlighter(), buffer.tokens(), buffer.text())
}

fn render_block(line: usize, block: &BlockHighlight) -> String {
    let ranges = block
        .ranges
        .iter()
        .map(|range| format!("{}..{} {}", range.start, range.end(), range.class.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}: {}", line, ranges).trim_end().to_string()
}

/// 1-based line and column (in characters) of a byte offset.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |at| at + 1);
    (line, before[line_start..].chars().count() + 1)
}

fn read_graph(path: &Path) -> Result<Graph> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let graph = if is_yaml {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Invalid graph in {}", path.display()))?
    } else {
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid graph in {}", path.display()))?
    };
    Ok(graph)
}

