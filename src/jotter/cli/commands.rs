use super::render::{print_messages, render_screen, ScreenOptions};
use super::setup::{Cli, Commands, OutputFormat};
use super::tui;
use clap::Parser;
use console::Term;
use jotter::api::{CmdMessage, JotterApi};
use jotter::config::{JotterConfig, JotterPaths, KEYS};
use jotter::error::{JotterError, Result};
use jotter::export::{workspace_json, workspace_markdown};
use jotter::ids::{IdGenerator, IdSource};
use jotter::logging::init_logging;
use jotter::model::{Block, BlockType, Page, PageId};
use jotter::script;
use jotter::workspace::Workspace;
use log::info;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

const UNTITLED: &str = "Untitled";

struct AppContext {
    config: JotterConfig,
    paths: JotterPaths,
    use_color: bool,
}

impl AppContext {
    fn screen_options(&self) -> ScreenOptions {
        ScreenOptions {
            use_color: self.use_color,
            ..ScreenOptions::plain(self.config.sidebar_width)
        }
    }
}

enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context(&cli)?;

    match cli.command {
        None => handle_interactive(&ctx),
        Some(Commands::Script { file, format }) => handle_script(&ctx, file, format),
        Some(Commands::Export { format }) => handle_export(&ctx, format),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let paths = JotterPaths::resolve()?;
    let config = JotterConfig::load(&paths.config_dir)?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    init_logging(level, &paths.log_dir)?;

    let use_color = !cli.no_color && console::colors_enabled();
    info!(
        "event=cli_start command={} color={}",
        command_name(&cli.command),
        use_color
    );

    Ok(AppContext {
        config,
        paths,
        use_color,
    })
}

fn command_name(command: &Option<Commands>) -> &'static str {
    match command {
        None => "interactive",
        Some(Commands::Script { .. }) => "script",
        Some(Commands::Export { .. }) => "export",
        Some(Commands::Config { .. }) => "config",
    }
}

/// The starting workspace the config asks for.
fn new_api(config: &JotterConfig) -> JotterApi<IdSource> {
    let mut ids = IdSource::from_kind(config.id_source);
    let mut api = if config.welcome_page {
        JotterApi::welcome(ids)
    } else {
        let page = untitled_page(&mut ids);
        JotterApi::new(Workspace::new(page), ids)
    };
    if api.workspace().is_sidebar_open() != config.sidebar_open {
        api.toggle_sidebar();
    }
    api
}

fn untitled_page<G: IdGenerator>(ids: &mut G) -> Page {
    let id = PageId::new(ids.next_id());
    let block = Block::empty(ids, BlockType::Paragraph);
    Page::new(id, UNTITLED, vec![block])
}

fn render_output<G: IdGenerator>(
    api: &JotterApi<G>,
    format: OutputFormat,
    options: &ScreenOptions,
) -> Result<String> {
    let mut output = match format {
        OutputFormat::Screen => render_screen(api, options)?,
        OutputFormat::Markdown => workspace_markdown(api.workspace())?,
        OutputFormat::Json => workspace_json(api.workspace())?,
    };
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn read_script(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) if path.as_os_str() != "-" => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn handle_script(ctx: &AppContext, file: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let source = read_script(file)?;
    let lines = script::parse(&source)?;
    let mut api = new_api(&ctx.config);
    let options = ctx.screen_options();

    info!("event=script_start steps={}", lines.len());
    let messages = script::run(&mut api, &lines, |api| {
        println!("{}", render_output(api, format, &options)?);
        Ok(())
    })?;

    print!("{}", render_output(&api, format, &options)?);
    print_messages(&messages, ctx.use_color);
    info!("event=script_done status=ok messages={}", messages.len());
    Ok(())
}

fn handle_export(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let api = new_api(&ctx.config);
    print!("{}", render_output(&api, format, &ctx.screen_options())?);
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let mut messages = Vec::new();
    match action {
        ConfigAction::ShowAll => {
            for key in KEYS {
                if let Some(value) = ctx.config.get(key) {
                    println!("{} = {}", key, value);
                }
            }
        }
        ConfigAction::ShowKey(key) => match ctx.config.get(&key) {
            Some(value) => println!("{} = {}", key, value),
            None => messages.push(CmdMessage::error(format!("Unknown config key: {}", key))),
        },
        ConfigAction::Set(key, value) => match ctx.config.set(&key, &value) {
            Ok(()) => {
                ctx.config.save(&ctx.paths.config_dir)?;
                info!("event=config_set key={}", key);
                let shown = ctx.config.get(&key).unwrap_or(value);
                messages.push(CmdMessage::success(format!("Set {} = {}", key, shown)));
            }
            Err(reason) => messages.push(CmdMessage::error(reason)),
        },
    }

    print_messages(&messages, ctx.use_color);
    Ok(())
}

fn handle_interactive(ctx: &AppContext) -> Result<()> {
    if !Term::stdout().is_term() || !std::io::stdin().is_terminal() {
        return Err(JotterError::NotATerminal);
    }
    let mut api = new_api(&ctx.config);
    tui::run(&mut api, ctx.config.sidebar_width, ctx.use_color)
}
