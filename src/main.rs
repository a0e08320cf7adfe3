mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::Config;
use view::AppView;
use controller::AppController;
use model::{AppModel, HttpCatalog, JsonFileStore, LocalStore, MemoryStore, SearchQuery};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!(server = %config.server, "=== potsfyi client starting ===");

    let catalog = Arc::new(HttpCatalog::new(&config.server, config.request_timeout())?);
    let server_url = catalog.base_url().to_string();

    let store: Arc<dyn LocalStore> = if config.ephemeral {
        tracing::info!("Ephemeral mode: playlist is kept in memory only");
        Arc::new(MemoryStore::new())
    } else {
        let store = JsonFileStore::new(config.data_dir.clone());
        tracing::debug!(dir = %store.dir().display(), "Using on-disk store");
        Arc::new(store)
    };

    let search = SearchQuery::new(catalog.clone(), config.search_delay());
    let app_model = AppModel::init(store, catalog, search, server_url).await;
    let model = Arc::new(app_model);
    let controller = AppController::new(model.clone());

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller).await;
    model.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("potsfyi client shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        // Auto-clear old errors (after 5 seconds)
        model.auto_clear_old_errors().await;

        let ui_state = model.get_ui_state().await;
        let content_state = model.get_content_state().await;
        let should_quit = model.should_quit().await;

        terminal.draw(|f| {
            AppView::render(f, &ui_state, &content_state);
        })?;

        // Short poll so search results show up without a keypress
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
