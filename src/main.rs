use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use formgrid::{
    cli::{Cli, Commands},
    config::{Config, LogConfig},
    models::Dataset,
    print::{self, PrintOptions},
    storage,
    tui::App,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "formgrid=info");
    }

    let command = cli.command.unwrap_or(Commands::Demo {
        data: None,
        variant: None,
        size: None,
    });

    match command {
        Commands::Demo { data, variant, size } => {
            let mut config = Config::from_env()?.with_data_path(data);
            if let Some(variant) = variant {
                config.input_variant = variant;
            }
            if let Some(size) = size {
                config.input_size = size;
            }
            config.validate()?;
            init_logging(&config.logging, false);
            run_demo(config)
        }
        Commands::Table { data, sort, desc, select } => {
            let config = Config::from_env()?.with_data_path(Some(data.clone()));
            config.validate()?;
            init_logging(&config.logging, true);

            let options = PrintOptions {
                sort,
                descending: desc,
                select,
            };
            let text = print::print_file(&data, &options)
                .with_context(|| format!("Failed to print {}", data.display()))?;
            print!("{}", text);
            Ok(())
        }
    }
}

/// Log to a file, and also to stderr when the terminal is not owned by the TUI
fn init_logging(logging: &LogConfig, to_stderr: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(&logging.directory, &logging.file_name);

    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

fn run_demo(config: Config) -> Result<()> {
    info!("Starting formgrid demo...");

    let dataset = match &config.data_path {
        Some(path) => storage::load_dataset(path)
            .with_context(|| format!("Failed to load data from {}", path.display()))?,
        None => Dataset::sample(),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, dataset);
    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => {
            info!("formgrid demo exited successfully");
            Ok(())
        }
        Err(e) => {
            error!("formgrid demo encountered an error: {}", e);
            Err(e)
        }
    }
}
