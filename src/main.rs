// ============================================================================
// StonkWatch - Ticker GME en direct dans le terminal
// ============================================================================
// Un seul écran : prix courant + direction, horloge, chandeliers intraday.
// Deux timers de fond (quote toutes les 5 s, horloge toutes les secondes)
// publient des événements vers la boucle UI, seule propriétaire de l'état.
// ============================================================================

use std::io;
use std::sync::mpsc;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use stonkwatch::app::App;
use stonkwatch::poller::{spawn_clock_ticker, spawn_quote_poller, FeedEvent};
use stonkwatch::ui::{events::is_quit_event, render, EventHandler};
use stonkwatch::SYMBOL;

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent plus une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne.
//
// Les logs sont écrits dans :
// - Linux : ~/.local/share/stonkwatch/logs/stonkwatch.log
// - macOS : ~/Library/Application Support/stonkwatch/logs/stonkwatch.log
//
// # Utilisation
// ```bash
// tail -f ~/.local/share/stonkwatch/logs/stonkwatch.log
// RUST_LOG=stonkwatch=trace cargo run
// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("stonkwatch")
        .join("logs");

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "stonkwatch.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stonkwatch=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(ticker = %SYMBOL, "StonkWatch starting up");

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // La boucle UI possède App ; les timers publient sur le channel
    let mut app = App::new();
    let (feed_tx, feed_rx) = mpsc::channel::<FeedEvent>();

    info!("Spawning background timers");
    let poller = spawn_quote_poller(SYMBOL, feed_tx.clone());
    let clock = spawn_clock_ticker(feed_tx);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, feed_rx);

    // Démontage du widget : annule la prochaine tentative de chaque timer
    // (une requête en vol n'est pas interrompue, le thread finit son cycle)
    debug!("Cancelling background timers");
    poller.cancel();
    clock.cancel();

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("StonkWatch exited normally"),
        Err(e) => error!(error = ?e, "StonkWatch exited with error"),
    }

    result
}

// ============================================================================
// Boucle principale
// ============================================================================

/// Exécute la boucle : applique les événements des timers, dessine, lit
/// le clavier. Les deux timers peuvent s'entrelacer dans n'importe quel
/// ordre, chacun ne touche que sa partie de l'état.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    feed_rx: mpsc::Receiver<FeedEvent>,
) -> Result<()> {
    loop {
        if !app.is_running() {
            break;
        }

        // 1. ÉTAT : draine les événements publiés par les timers
        while let Ok(event) = feed_rx.try_recv() {
            app.apply(event);
        }

        // 2. RENDER : redessine les quatre zones
        terminal.draw(|frame| render(frame, app))?;

        // 3. INPUT : seule action possible, quitter
        if let Ok(event) = events.next() {
            if is_quit_event(&event) {
                info!("User requested quit");
                app.quit();
            }
        }
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// Toujours restaurer le terminal avant de quitter, même en cas d'erreur.
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + écran alternatif)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
