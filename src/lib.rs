// ============================================================================
// StonkWatch - Library
// ============================================================================
// Widget terminal : suit un seul symbole (GME) en direct
// Expose les modules publics pour les tests
// ============================================================================

pub mod api;    // Client API Yahoo Finance
pub mod app;    // État du widget
pub mod models; // Structures de données
pub mod poller; // Timers de fond (quote + horloge)
pub mod ui;     // Interface utilisateur

/// Symbole suivi par le widget (fixe, pas de multi-symbole)
pub const SYMBOL: &str = "GME";
