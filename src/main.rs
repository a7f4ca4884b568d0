use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use bento_folio::{
    AnsiRenderer, BentoBoard, BoardSettings, CliDriver, ContentRecord, FileSink, FolioConfig,
    FolioRuntime, LifecycleLoggerPlugin, LogLevel, Logger, ProfileStyle, RendererSettings,
    RuntimeConfig, Size, TileId,
};

/// Browse a bento-grid portfolio in the terminal.
#[derive(Parser, Debug)]
#[command(name = "bento-folio", version)]
struct Args {
    /// JSON settings file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON content file replacing the built-in portfolio.
    #[arg(long)]
    content: Option<PathBuf>,
    /// Write JSON-lines logs to this file.
    #[arg(long)]
    log: Option<PathBuf>,
    #[arg(long)]
    log_level: Option<LogLevel>,
    /// Include mouse and tick events in the log.
    #[arg(long)]
    log_input: bool,
    #[arg(long, value_enum)]
    profile_style: Option<ProfileStyle>,
    /// Use the 16 named terminal colors only.
    #[arg(long)]
    monochrome: bool,
    /// Start with this tile expanded.
    #[arg(long)]
    open: Option<TileId>,
    /// Print the built-in content as JSON and exit.
    #[arg(long)]
    dump_content: bool,
}

impl Args {
    fn resolve_config(&self) -> bento_folio::Result<FolioConfig> {
        let mut config = match &self.config {
            Some(path) => FolioConfig::load(path)?,
            None => FolioConfig::default(),
        };
        if let Some(path) = &self.content {
            config.content_path = Some(path.clone());
        }
        if let Some(path) = &self.log {
            config.log_path = Some(path.clone());
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.log_input {
            config.log_input = true;
        }
        if let Some(style) = self.profile_style {
            config.profile_style = style;
        }
        if self.monochrome {
            config.truecolor = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if args.dump_content {
        println!("{}", ContentRecord::builtin().to_json_pretty()?);
        return Ok(());
    }

    let config = args.resolve_config()?;
    let content = match &config.content_path {
        Some(path) => ContentRecord::load(path)?,
        None => ContentRecord::builtin(),
    };

    let logger = match &config.log_path {
        Some(path) => Some(
            Logger::new(FileSink::new(path, config.log_max_bytes)?).with_min_level(config.log_level),
        ),
        None => None,
    };

    let mut board = BentoBoard::new(content, BoardSettings::from(&config))?;
    if let Some(logger) = &logger {
        board = board.with_logger(logger.clone());
    }
    if let Some(tile) = args.open {
        board.open(tile);
    }

    let renderer = AnsiRenderer::new(RendererSettings {
        truecolor: config.truecolor,
    });
    let mut runtime = FolioRuntime::new(renderer, Size::default()).with_config(RuntimeConfig {
        tick_interval: config.tick_interval(),
        logger: logger.clone(),
        metrics_interval: config.metrics_interval(),
        ..RuntimeConfig::default()
    });
    if let Some(logger) = logger {
        runtime.register_plugin(
            LifecycleLoggerPlugin::new(logger)
                .log_mouse(config.log_input)
                .log_ticks(config.log_input),
        );
    }
    runtime.register_plugin(board);

    CliDriver::new(runtime).run()?;
    Ok(())
}
