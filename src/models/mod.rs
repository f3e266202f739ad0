// ============================================================================
// Module : models
// ============================================================================
// Structures de données du widget : chandelles, snapshot de cotation,
// direction du prix
// ============================================================================

pub mod candle; // Chandelles OHLC (CandlePoint, Series)
pub mod quote;  // Cotation : Direction, arrondi, QuoteSnapshot

// Re-export des structures principales pour simplifier les imports
pub use candle::{CandlePoint, Series};
pub use quote::{round2, Direction, QuoteSnapshot};
