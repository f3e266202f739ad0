// ============================================================================
// Structure : CandlePoint
// ============================================================================
// Une chandelle japonaise telle que renvoyée par Yahoo : chaque champ OHLC
// peut être absent (valeur manquante ou zéro côté source).
// ============================================================================

use chrono::{DateTime, Utc};

use crate::models::round2;

/// Une chandelle de la série intraday
///
/// Les champs OHLC sont des Option : une valeur source manquante ou nulle
/// devient None après passage par round2. La chandelle est conservée dans
/// la série même incomplète ; seul le rendu la saute.
#[derive(Debug, Clone, PartialEq)]
pub struct CandlePoint {
    /// Timestamp de la chandelle
    pub timestamp: DateTime<Utc>,

    /// Prix d'ouverture, arrondi à 2 décimales
    pub open: Option<f64>,

    /// Prix le plus haut
    pub high: Option<f64>,

    /// Prix le plus bas
    pub low: Option<f64>,

    /// Prix de clôture
    pub close: Option<f64>,
}

impl CandlePoint {
    /// Construit une chandelle depuis les valeurs brutes de l'API
    ///
    /// Chaque champ passe par round2 : arrondi à 2 décimales, zéro → None.
    pub fn from_raw(
        timestamp: DateTime<Utc>,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            open: open.and_then(round2),
            high: high.and_then(round2),
            low: low.and_then(round2),
            close: close.and_then(round2),
        }
    }

    /// Retourne (open, high, low, close) si les quatre champs sont présents
    ///
    /// Seules les chandelles complètes sont dessinables.
    pub fn ohlc(&self) -> Option<(f64, f64, f64, f64)> {
        match (self.open, self.high, self.low, self.close) {
            (Some(o), Some(h), Some(l), Some(c)) => Some((o, h, l, c)),
            _ => None,
        }
    }
}

/// Série de chandelles, ordre d'insertion = ordre chronologique de la source
///
/// Remplacée intégralement à chaque fetch réussi.
pub type Series = Vec<CandlePoint>;

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_rounds_fields() {
        let candle = CandlePoint::from_raw(
            Utc::now(),
            Some(100.456),
            Some(110.994),
            Some(95.001),
            Some(105.555),
        );

        assert_eq!(candle.open, Some(100.46));
        assert_eq!(candle.high, Some(110.99));
        assert_eq!(candle.low, Some(95.00));
        assert_eq!(candle.close, Some(105.56));
    }

    #[test]
    fn test_from_raw_zero_becomes_absent() {
        let candle = CandlePoint::from_raw(Utc::now(), Some(0.0), Some(110.0), None, Some(105.0));

        assert_eq!(candle.open, None);
        assert_eq!(candle.low, None);
        assert_eq!(candle.high, Some(110.0));
    }

    #[test]
    fn test_ohlc_complete() {
        let candle =
            CandlePoint::from_raw(Utc::now(), Some(100.0), Some(110.0), Some(95.0), Some(105.0));

        assert_eq!(candle.ohlc(), Some((100.0, 110.0, 95.0, 105.0)));
    }

    #[test]
    fn test_ohlc_incomplete_is_none() {
        let candle = CandlePoint::from_raw(Utc::now(), Some(100.0), None, Some(95.0), Some(105.0));

        assert_eq!(candle.ohlc(), None);
    }
}
