// ============================================================================
// Poller - Timers de fond
// ============================================================================
// Deux timers indépendants, chacun dans son thread avec son propre handle
// d'annulation :
// - le quote poller : fetch immédiat puis toutes les 5 secondes, sans fin
// - le clock ticker : relit l'horloge murale toutes les secondes
//
// Ils ne partagent aucun état entre eux : chacun publie des FeedEvent sur
// le channel de la boucle UI, qui est seule à muter App.
//
// Annulation coopérative : le délai entre deux tentatives est un
// recv_timeout sur un channel de shutdown. Annuler (ou dropper le handle)
// réveille le timer pendant ce délai et il s'arrête ; une requête déjà en
// vol n'est pas interrompue.
// ============================================================================

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};
use tracing::{debug, error, info};

use crate::api::{build_client, fetch_quote};
use crate::models::QuoteSnapshot;

/// Délai fixe entre deux tentatives de fetch
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Période de rafraîchissement de l'horloge
pub const CLOCK_INTERVAL: Duration = Duration::from_millis(1000);

/// Événements publiés par les timers vers la boucle UI
#[derive(Debug)]
pub enum FeedEvent {
    /// Fetch réussi : prix + série complète
    Quote(QuoteSnapshot),

    /// Lecture de l'horloge murale
    Clock(DateTime<Local>),
}

/// Handle d'annulation d'un timer de fond
///
/// Dropper le handle annule aussi le timer : le côté émetteur du channel
/// de shutdown disparaît et le recv_timeout du timer retourne Disconnected.
pub struct FeedHandle {
    shutdown_tx: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl FeedHandle {
    /// Annule la prochaine tentative programmée et attend la fin du thread
    pub fn cancel(mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Lance le quote poller dans un thread de fond
///
/// Fetch immédiat à l'activation, puis re-programmation inconditionnelle
/// 5 secondes après chaque tentative, réussie ou non. Pas de backoff, pas
/// de limite de tentatives : chaque échec est loggé puis avalé, l'état
/// reste aux dernières valeurs connues.
pub fn spawn_quote_poller(symbol: &'static str, feed_tx: mpsc::Sender<FeedEvent>) -> FeedHandle {
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let thread = thread::spawn(move || {
        // Runtime tokio propre à ce thread : les fetchs async bloquent le
        // poller, jamais la boucle UI
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, quote poller disabled");
                return;
            }
        };

        let client = match build_client() {
            Ok(client) => client,
            Err(e) => {
                error!(error = ?e, "Failed to build HTTP client, quote poller disabled");
                return;
            }
        };

        info!(ticker = %symbol, interval_ms = POLL_INTERVAL.as_millis() as u64, "Quote poller started");

        loop {
            match runtime.block_on(fetch_quote(&client, symbol)) {
                Ok(snapshot) => {
                    debug!(price = snapshot.price, candles = snapshot.series.len(), "Fetch succeeded");
                    if feed_tx.send(FeedEvent::Quote(snapshot)).is_err() {
                        // Boucle UI terminée
                        break;
                    }
                }
                Err(e) => {
                    // Tous les échecs sont équivalents : on loggue et le
                    // prochain cycle réessaie
                    error!(ticker = %symbol, error = ?e, "Fetch failed, retrying on next cycle");
                }
            }

            // Délai inter-tentatives, interruptible par l'annulation
            match shutdown_rx.recv_timeout(POLL_INTERVAL) {
                Err(RecvTimeoutError::Timeout) => continue,
                _ => break,
            }
        }

        info!("Quote poller stopped");
    });

    FeedHandle {
        shutdown_tx,
        thread: Some(thread),
    }
}

/// Lance le clock ticker dans un thread de fond
///
/// Publie l'heure locale immédiatement puis toutes les secondes. Cycle de
/// vie indépendant du poller : purement pour l'affichage.
pub fn spawn_clock_ticker(feed_tx: mpsc::Sender<FeedEvent>) -> FeedHandle {
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let thread = thread::spawn(move || {
        debug!("Clock ticker started");

        loop {
            if feed_tx.send(FeedEvent::Clock(Local::now())).is_err() {
                break;
            }

            match shutdown_rx.recv_timeout(CLOCK_INTERVAL) {
                Err(RecvTimeoutError::Timeout) => continue,
                _ => break,
            }
        }

        debug!("Clock ticker stopped");
    });

    FeedHandle {
        shutdown_tx,
        thread: Some(thread),
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_ticker_delivers_and_cancels() {
        let (feed_tx, feed_rx) = mpsc::channel();
        let handle = spawn_clock_ticker(feed_tx);

        // Première lecture immédiate
        let event = feed_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("clock tick attendu");
        assert!(matches!(event, FeedEvent::Clock(_)));

        // cancel() joint le thread : pas de blocage
        handle.cancel();
    }

    #[test]
    fn test_clock_ticker_stops_when_handle_dropped() {
        let (feed_tx, feed_rx) = mpsc::channel();
        let handle = spawn_clock_ticker(feed_tx);

        feed_rx
            .recv_timeout(Duration::from_secs(2))
            .expect("clock tick attendu");

        // Drop du handle = annulation implicite ; le thread sort au plus
        // tard à la fin du délai courant et le channel se ferme
        drop(handle);
        drop(feed_rx);
    }

    #[test]
    fn test_intervals_are_fixed() {
        assert_eq!(POLL_INTERVAL, Duration::from_millis(5000));
        assert_eq!(CLOCK_INTERVAL, Duration::from_millis(1000));
    }
}
