// ============================================================================
// Module : ui
// ============================================================================
// Interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod candlestick; // Rendu des chandeliers japonais (Unicode text)
pub mod events;      // Gestion des événements clavier
pub mod widget;      // Rendu des quatre zones du widget

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use widget::render;
