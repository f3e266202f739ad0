// ============================================================================
// Structure : App
// ============================================================================
// État du widget, possédé par la boucle UI. Les timers de fond ne touchent
// jamais App directement : ils publient des FeedEvent, et toute mutation
// passe par apply(). Un fetch échoué ne produit aucun événement, donc
// l'état reste strictement inchangé.
// ============================================================================

use chrono::{DateTime, Local};
use tracing::info;

use crate::models::{Direction, QuoteSnapshot, Series};
use crate::poller::FeedEvent;

/// État du widget
pub struct App {
    /// Indique si le widget doit continuer à tourner
    pub running: bool,

    /// true tant qu'aucun fetch n'a réussi (affiche "Loading...")
    pub loading: bool,

    /// Prix du marché au dernier fetch réussi
    pub price: Option<f64>,

    /// Prix du fetch réussi précédent (sentinelle None au démarrage)
    ///
    /// Invariant : après le cycle N, previous_price vaut le price d'avant
    /// le cycle N.
    pub previous_price: Option<f64>,

    /// Série intraday courante, remplacée en bloc à chaque fetch réussi
    pub series: Series,

    /// Dernière lecture de l'horloge murale (timer indépendant, 1 s)
    pub clock: Option<DateTime<Local>>,
}

impl App {
    /// Crée l'état initial : vide, en chargement
    pub fn new() -> Self {
        Self {
            running: true,
            loading: true,
            price: None,
            previous_price: None,
            series: Series::new(),
            clock: None,
        }
    }

    /// Applique un événement publié par les timers de fond
    ///
    /// Seul point d'entrée des mutations hors clavier.
    pub fn apply(&mut self, event: FeedEvent) {
        match event {
            FeedEvent::Quote(snapshot) => self.apply_quote(snapshot),
            FeedEvent::Clock(now) => self.set_clock(now),
        }
    }

    /// Applique un fetch réussi : rotation des prix + remplacement de la série
    pub fn apply_quote(&mut self, snapshot: QuoteSnapshot) {
        self.previous_price = self.price;
        self.price = Some(snapshot.price);
        self.series = snapshot.series;
        self.loading = false;

        info!(
            price = snapshot.price,
            candles = self.series.len(),
            direction = ?self.direction(),
            "Quote applied"
        );
    }

    /// Met à jour l'horloge affichée
    pub fn set_clock(&mut self, now: DateTime<Local>) {
        self.clock = Some(now);
    }

    /// Direction dérivée des deux derniers prix (jamais stockée)
    pub fn direction(&self) -> Direction {
        Direction::between(self.previous_price, self.price)
    }

    /// Quitte le widget
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si le widget doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandlePoint;
    use chrono::Utc;

    fn snapshot(price: f64, series: Series) -> QuoteSnapshot {
        QuoteSnapshot {
            price,
            series,
            observed_at: Utc::now(),
        }
    }

    fn candle(close: f64) -> CandlePoint {
        CandlePoint::from_raw(
            Utc::now(),
            Some(close - 1.0),
            Some(close + 1.0),
            Some(close - 2.0),
            Some(close),
        )
    }

    #[test]
    fn test_initial_state_is_loading_sentinel() {
        let app = App::new();
        assert!(app.is_running());
        assert!(app.loading);
        assert_eq!(app.price, None);
        assert_eq!(app.previous_price, None);
        assert!(app.series.is_empty());
        assert_eq!(app.direction(), Direction::Flat);
    }

    #[test]
    fn test_previous_price_chains_across_cycles() {
        let mut app = App::new();

        app.apply_quote(snapshot(150.0, vec![]));
        // Premier cycle : le précédent reste la sentinelle
        assert_eq!(app.price, Some(150.0));
        assert_eq!(app.previous_price, None);

        app.apply_quote(snapshot(155.5, vec![]));
        // Cycle N : previous_price == price d'avant le cycle
        assert_eq!(app.price, Some(155.5));
        assert_eq!(app.previous_price, Some(150.0));

        app.apply_quote(snapshot(152.0, vec![]));
        assert_eq!(app.previous_price, Some(155.5));
    }

    #[test]
    fn test_direction_transitions_flat_then_up() {
        // Scénario bout-en-bout : 150.00 puis 155.50
        let mut app = App::new();

        app.apply_quote(snapshot(150.0, vec![]));
        assert_eq!(app.direction(), Direction::Flat);
        assert_eq!(app.direction().emoji(), "");

        app.apply_quote(snapshot(155.5, vec![]));
        assert_eq!(app.direction(), Direction::Up);
        assert_eq!(app.direction().emoji(), "🚀");
    }

    #[test]
    fn test_series_replaced_wholesale() {
        let mut app = App::new();

        app.apply_quote(snapshot(150.0, vec![candle(149.0), candle(150.0), candle(151.0)]));
        assert_eq!(app.series.len(), 3);

        // Le nouveau fetch remplace tout : aucun point périmé ne survit
        let fresh = vec![candle(152.0)];
        app.apply_quote(snapshot(152.0, fresh.clone()));
        assert_eq!(app.series, fresh);
    }

    #[test]
    fn test_fetch_failure_leaves_state_untouched() {
        let mut app = App::new();
        app.apply_quote(snapshot(150.0, vec![candle(150.0)]));

        let price = app.price;
        let previous = app.previous_price;
        let series = app.series.clone();

        // Un échec de fetch ne produit aucun FeedEvent : rien n'est muté.
        // On vérifie qu'aucun autre chemin ne touche l'état entre deux cycles.
        app.set_clock(Local::now());

        assert_eq!(app.price, price);
        assert_eq!(app.previous_price, previous);
        assert_eq!(app.series, series);
        assert!(!app.loading);
    }

    #[test]
    fn test_loading_clears_on_first_success() {
        let mut app = App::new();
        assert!(app.loading);

        app.apply(FeedEvent::Quote(snapshot(150.0, vec![])));
        assert!(!app.loading);
    }

    #[test]
    fn test_clock_event_is_independent() {
        let mut app = App::new();
        let now = Local::now();

        app.apply(FeedEvent::Clock(now));
        assert_eq!(app.clock, Some(now));
        // L'horloge ne touche pas l'état de cotation
        assert!(app.loading);
        assert_eq!(app.price, None);
    }

    #[test]
    fn test_quit() {
        let mut app = App::new();
        app.quit();
        assert!(!app.is_running());
    }
}
