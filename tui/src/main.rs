//! Business Lookup Entry Point
//!
//! Usage:
//!   bizlookup [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>          Config file (default: ~/.config/bizlookup/config.toml)
//!   -u, --api-url <URL>          Registry base URL
//!   --timeout-secs <SECS>        Request timeout, 0 for none
//!   --page-size <ROWS>           Rows per result page
//!   --notification <MODE>        "timed" or "persistent"
//!   --notification-ms <MS>       How long a timed notice stays up
//!   --show-disclaimer            Show the disclaimer panel
//!   --log-file <PATH>            Write logs here (the screen is taken by the UI)

use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bizlookup_core::{default_config_path, load_config_from_path, ConfigOverrides, NotificationMode};
use bizlookup_tui::{App, LookupClient};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "bizlookup")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short = 'c', long, env = "BIZLOOKUP_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Registry base URL
    #[arg(short = 'u', long, value_name = "URL")]
    api_url: Option<String>,

    /// Request timeout in seconds (0 disables it)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Rows per result page
    #[arg(long, value_name = "ROWS")]
    page_size: Option<usize>,

    /// How notices are dismissed: timed or persistent
    #[arg(long, value_name = "MODE")]
    notification: Option<NotificationMode>,

    /// How long a timed notice stays visible, in milliseconds
    #[arg(long, value_name = "MS")]
    notification_ms: Option<u64>,

    /// Show the disclaimer panel
    #[arg(long)]
    show_disclaimer: bool,

    /// Write logs to this file
    #[arg(long, env = "BIZLOOKUP_LOG", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(ref url) = self.api_url {
            overrides = overrides.with_base_url(url.clone());
        }
        if let Some(secs) = self.timeout_secs {
            overrides = overrides.with_timeout_secs(secs);
        }
        if let Some(size) = self.page_size {
            overrides = overrides.with_page_size(size);
        }
        if let Some(mode) = self.notification {
            overrides = overrides.with_notification(mode);
        }
        if let Some(ms) = self.notification_ms {
            overrides = overrides.with_notification_timeout_ms(ms);
        }
        overrides
    }
}

/// Send logs to `path`; with no path they are dropped
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path).context("Failed to load configuration")?;
    args.overrides()
        .apply(&mut config)
        .context("Invalid command line option")?;
    if args.show_disclaimer {
        config.show_disclaimer = true;
    }
    tracing::info!(
        base_url = %config.base_url,
        source = %config.source(),
        "Configuration loaded"
    );

    use std::io::IsTerminal;

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: bizlookup requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it from an interactive shell, or with `ssh -t` over SSH.");
        std::process::exit(1);
    }

    let client = LookupClient::from_config(&config)?;

    // Restore the terminal before a panic message is printed
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    client.start();
    let size = terminal.size()?;
    let mut app = App::new(
        client,
        Rect::new(0, 0, size.width, size.height),
        config.show_disclaimer,
    );
    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(goodbye) = app.goodbye() {
        println!("\n{goodbye}\n");
    }

    result
}
