// ============================================================================
// Module : api
// ============================================================================
// Client API pour récupérer la cotation et la série intraday
// (Yahoo Finance, endpoint chart v8)
// ============================================================================

pub mod yahoo; // Client API Yahoo Finance

// Re-export des fonctions principales
pub use yahoo::{build_client, fetch_quote};
