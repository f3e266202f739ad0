// ============================================================================
// Quote - Cotation courante et direction du prix
// ============================================================================
// La direction est dérivée : comparaison du prix courant avec le prix du
// cycle précédent. Jamais stockée, recalculée à chaque rendu.
// ============================================================================

use chrono::{DateTime, Utc};

use crate::models::CandlePoint;

/// Direction du prix entre deux fetchs successifs
///
/// CONCEPT : État dérivé
/// - Calculée uniquement depuis (previous_price, price)
/// - Flat tant que le prix précédent est inconnu (sentinelle None)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Le prix monte (previous < current)
    Up,
    /// Le prix descend (previous > current)
    Down,
    /// Prix inchangé, ou pas encore de prix précédent
    Flat,
}

impl Direction {
    /// Dérive la direction depuis les deux derniers prix observés
    pub fn between(previous: Option<f64>, current: Option<f64>) -> Self {
        match (previous, current) {
            (Some(prev), Some(cur)) if prev < cur => Direction::Up,
            (Some(prev), Some(cur)) if prev > cur => Direction::Down,
            _ => Direction::Flat,
        }
    }

    /// Emoji associé à la direction (lookup fixe)
    pub fn emoji(&self) -> &'static str {
        match self {
            Direction::Up => "🚀",
            Direction::Down => "💩",
            Direction::Flat => "",
        }
    }
}

/// Arrondit un prix à 2 décimales, ou None si la valeur est absente
///
/// Un zéro est traité comme "donnée manquante" plutôt que "$0.00" :
/// Yahoo renvoie 0/null pour les chandelles sans transaction, et un vrai
/// prix nul n'existe pas pour ce symbole.
///
/// Comportement d'arrondi pinné : (v * 100).round() / 100.
/// 1.005 en binaire vaut 1.00499..., donc round2(1.005) == Some(1.00).
pub fn round2(value: f64) -> Option<f64> {
    if value == 0.0 || !value.is_finite() {
        return None;
    }
    Some((value * 100.0).round() / 100.0)
}

/// Résultat d'un fetch réussi : prix du marché + série intraday complète
///
/// La série remplace intégralement la précédente à chaque cycle
/// (pas de merge incrémental).
#[derive(Debug, Clone)]
pub struct QuoteSnapshot {
    /// Prix du marché au moment du fetch
    pub price: f64,

    /// Série intraday complète, dans l'ordre renvoyé par Yahoo
    pub series: Vec<CandlePoint>,

    /// Instant où le snapshot a été construit
    pub observed_at: DateTime<Utc>,
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_up() {
        assert_eq!(Direction::between(Some(150.0), Some(155.5)), Direction::Up);
    }

    #[test]
    fn test_direction_down() {
        assert_eq!(Direction::between(Some(155.5), Some(150.0)), Direction::Down);
    }

    #[test]
    fn test_direction_flat_when_equal() {
        assert_eq!(Direction::between(Some(150.0), Some(150.0)), Direction::Flat);
    }

    #[test]
    fn test_direction_flat_when_previous_unknown() {
        // Sentinelle initiale : pas de prix précédent
        assert_eq!(Direction::between(None, Some(150.0)), Direction::Flat);
        assert_eq!(Direction::between(None, None), Direction::Flat);
    }

    #[test]
    fn test_direction_emoji_lookup() {
        assert_eq!(Direction::Up.emoji(), "🚀");
        assert_eq!(Direction::Down.emoji(), "💩");
        assert_eq!(Direction::Flat.emoji(), "");
    }

    #[test]
    fn test_round2_nominal() {
        assert_eq!(round2(123.456), Some(123.46));
        assert_eq!(round2(26.3401), Some(26.34));
    }

    #[test]
    fn test_round2_boundary_pinned() {
        // 1.005 est représenté en binaire juste sous le milieu : arrondi à 1.00
        assert_eq!(round2(1.005), Some(1.00));
    }

    #[test]
    fn test_round2_zero_is_unknown() {
        // Un zéro signifie "donnée manquante", pas "$0.00"
        assert_eq!(round2(0.0), None);
    }

    #[test]
    fn test_round2_non_finite_is_unknown() {
        assert_eq!(round2(f64::NAN), None);
        assert_eq!(round2(f64::INFINITY), None);
    }
}
