// ============================================================================
// Gestion des événements
// ============================================================================
// Le widget n'a qu'une seule action clavier : quitter. Tout le reste est
// un Tick qui laisse la boucle redessiner.
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Événements de la boucle UI
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (pas d'événement clavier pendant le poll)
    Tick,
}

/// Gestionnaire d'événements clavier
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Lit le prochain événement (bloquant, timeout 250 ms)
    ///
    /// Le timeout borne la latence de rafraîchissement : même sans touche,
    /// la boucle repasse par le rendu quatre fois par seconde.
    pub fn next(&self) -> Result<Event> {
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                CrosstermEvent::Key(key) => {
                    // Certains OS émettent Press ET Release : on ne garde
                    // que Press pour éviter les doublons
                    if key.kind == KeyEventKind::Press {
                        Ok(Event::Key(key))
                    } else {
                        Ok(Event::Tick)
                    }
                }
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Vérifie si l'événement demande de quitter : q, Q, Échap ou Ctrl-C
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    } else {
        false
    }
}

// ============================================================================
// Tests
// ============================================================================
