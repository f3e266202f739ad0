// ============================================================================
// Candlestick Chart - Rendu texte ligne par ligne
// ============================================================================
// Chandeliers japonais en caractères Unicode, dessinés de haut en bas.
//
// ALGORITHME :
// - Pour chaque ligne, on détermine quel caractère afficher
// - Logique des 3 zones : mèche supérieure, corps, mèche inférieure
// - Seuils fractionnaires (0.25, 0.75) pour précision sub-caractère
//
// CARACTÈRES UNICODE :
// ┃ Corps plein          │ Mèche pleine
// ╻ Demi-corps (bas)     ╹ Demi-corps (haut)
// ╽ Transition top       ╿ Transition bottom
// ╷ Demi-mèche sup       ╵ Demi-mèche inf
// ============================================================================

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Series;

// ============================================================================
// Constantes
// ============================================================================

const UNICODE_VOID: char = ' ';
const UNICODE_BODY: char = '┃';
const UNICODE_HALF_BODY_BOTTOM: char = '╻';
const UNICODE_HALF_BODY_TOP: char = '╹';
const UNICODE_WICK: char = '│';
const UNICODE_TOP: char = '╽';
const UNICODE_BOTTOM: char = '╿';
const UNICODE_UPPER_WICK: char = '╷';
const UNICODE_LOWER_WICK: char = '╵';

/// Couleurs chandeliers haussiers / baissiers
const BULLISH_COLOR: Color = Color::Rgb(52, 208, 88);
const BEARISH_COLOR: Color = Color::Rgb(234, 74, 90);

/// Largeur de l'axe Y (labels de prix en dollars)
const Y_AXIS_WIDTH: u16 = 12;

/// Largeur estimée d'un label "%H:%M" sur l'axe X
const TIME_LABEL_WIDTH: usize = 5;

// ============================================================================
// Structure principale
// ============================================================================

/// Chandelle complète prête à dessiner
///
/// Les CandlePoint aux champs absents (donnée manquante ou zéro côté
/// source) sont écartés en amont : ils restent dans la série mais ne
/// produisent aucune colonne.
#[derive(Debug, Clone, Copy)]
struct DrawnCandle {
    timestamp: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

/// Renderer de chandeliers japonais en mode texte
pub struct CandlestickRenderer {
    candles: Vec<DrawnCandle>,
    min_price: f64,
    max_price: f64,
    height: u16,
    width: u16,
}

impl CandlestickRenderer {
    /// Crée un renderer pour la série courante dans la zone donnée
    pub fn new(series: &Series, area: Rect) -> Self {
        let candles: Vec<DrawnCandle> = series
            .iter()
            .filter_map(|point| {
                point.ohlc().map(|(open, high, low, close)| DrawnCandle {
                    timestamp: point.timestamp,
                    open,
                    high,
                    low,
                    close,
                })
            })
            .collect();

        let (min_price, max_price) = Self::compute_price_bounds(&candles);

        Self {
            candles,
            min_price,
            max_price,
            // 2 lignes de bordure + 2 lignes d'axe X (ticks + heures)
            height: area.height.saturating_sub(4),
            width: area.width.saturating_sub(Y_AXIS_WIDTH + 2),
        }
    }

    /// Prix min et max sur toutes les chandelles, avec une marge de 2 %
    fn compute_price_bounds(candles: &[DrawnCandle]) -> (f64, f64) {
        let max_price = candles.iter().fold(f64::NEG_INFINITY, |max, c| max.max(c.high));
        let min_price = candles.iter().fold(f64::INFINITY, |min, c| min.min(c.low));

        let margin = (max_price - min_price) * 0.02;
        ((min_price - margin).max(0.0), max_price + margin)
    }

    /// Convertit un prix en coordonnée de hauteur
    fn price_to_height(&self, price: f64) -> f64 {
        if self.max_price == self.min_price {
            return self.height as f64 / 2.0;
        }

        (price - self.min_price) / (self.max_price - self.min_price) * self.height as f64
    }

    fn is_bullish(candle: &DrawnCandle) -> bool {
        candle.close >= candle.open
    }

    fn candle_color(candle: &DrawnCandle) -> Color {
        if Self::is_bullish(candle) {
            BULLISH_COLOR
        } else {
            BEARISH_COLOR
        }
    }

    /// Détermine le caractère d'un chandelier à une ligne donnée
    ///
    /// Cœur de l'algorithme : trois zones (mèche sup, corps, mèche inf)
    /// avec seuils 0.25/0.75 pour la précision sub-caractère.
    fn render_candle(&self, candle: &DrawnCandle, y: u16) -> char {
        let height_unit = y as f64;

        let high_y = self.price_to_height(candle.high);
        let low_y = self.price_to_height(candle.low);
        let max_y = self.price_to_height(candle.open.max(candle.close));
        let min_y = self.price_to_height(candle.close.min(candle.open));

        let mut output = UNICODE_VOID;

        // ZONE 1 : Mèche supérieure (high → haut du corps)
        if high_y.ceil() >= height_unit && height_unit >= max_y.floor() {
            if max_y - height_unit > 0.75 {
                output = UNICODE_BODY;
            } else if (max_y - height_unit) > 0.25 {
                if (high_y - height_unit) > 0.75 {
                    output = UNICODE_TOP;
                } else {
                    output = UNICODE_HALF_BODY_BOTTOM;
                }
            } else if (high_y - height_unit) > 0.75 {
                output = UNICODE_WICK;
            } else if (high_y - height_unit) > 0.25 {
                output = UNICODE_UPPER_WICK;
            }
        }
        // ZONE 2 : Corps
        else if max_y.floor() >= height_unit && height_unit >= min_y.ceil() {
            output = UNICODE_BODY;
        }
        // ZONE 3 : Mèche inférieure (bas du corps → low)
        else if min_y.ceil() >= height_unit && height_unit >= low_y.floor() {
            if (min_y - height_unit) < 0.25 {
                output = UNICODE_BODY;
            } else if (min_y - height_unit) < 0.75 {
                if (low_y - height_unit) < 0.25 {
                    output = UNICODE_BOTTOM;
                } else {
                    output = UNICODE_HALF_BODY_TOP;
                }
            } else if low_y - height_unit < 0.25 {
                output = UNICODE_WICK;
            } else if low_y - height_unit < 0.75 {
                output = UNICODE_LOWER_WICK;
            }
        }

        output
    }

    /// Une ligne de l'axe Y : prix formaté en dollars toutes les 4 lignes
    fn render_y_axis(&self, y: u16) -> String {
        if y % 4 == 0 {
            let price = self.min_price
                + (y as f64 * (self.max_price - self.min_price) / self.height.max(1) as f64);
            format!("{:>9} │ ", format!("${:.2}", price))
        } else {
            format!("{:>9} │ ", "")
        }
    }

    /// Chandeliers visibles : les N derniers qui tiennent à l'écran
    fn visible_candles(&self) -> &[DrawnCandle] {
        let max_visible = self.width as usize;
        if self.candles.len() <= max_visible {
            &self.candles
        } else {
            &self.candles[self.candles.len() - max_visible..]
        }
    }

    /// Génère toutes les lignes du graphique (chandeliers + axe X)
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let visible = self.visible_candles();

        if visible.is_empty() || self.height == 0 {
            return lines;
        }

        // Espacement pour répartir les chandeliers sur toute la largeur
        let spacing = if visible.len() > 1 {
            self.width as f64 / visible.len() as f64
        } else {
            1.0
        };

        // Parcours de haut en bas
        for y in (1..=self.height).rev() {
            let mut spans = Vec::new();

            spans.push(Span::styled(
                self.render_y_axis(y),
                Style::default().fg(Color::Gray),
            ));

            for (i, candle) in visible.iter().enumerate() {
                let ch = self.render_candle(candle, y);

                spans.push(Span::styled(
                    ch.to_string(),
                    Style::default().fg(Self::candle_color(candle)),
                ));

                if i < visible.len() - 1 {
                    let num_spaces = (spacing - 1.0).round() as usize;
                    if num_spaces > 0 {
                        spans.push(Span::raw(" ".repeat(num_spaces)));
                    }
                }
            }

            lines.push(Line::from(spans));
        }

        lines.extend(self.render_x_axis(visible, spacing));

        lines
    }

    /// Axe X : une ligne de tick marks, une ligne d'heures (%H:%M)
    fn render_x_axis(&self, visible: &[DrawnCandle], spacing: f64) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        // Combien de labels tiennent sans se chevaucher (2 colonnes de marge)
        let min_space_per_label = TIME_LABEL_WIDTH + 2;
        let max_labels = (self.width as usize / min_space_per_label).max(2).min(10);

        let label_interval = if visible.len() <= max_labels {
            1
        } else {
            visible.len() / max_labels
        };

        // Ligne 1 : Tick marks
        let mut tick_spans = vec![Span::raw(" ".repeat(Y_AXIS_WIDTH as usize))];

        for (i, _candle) in visible.iter().enumerate() {
            let tick = if i % label_interval == 0 { "│" } else { " " };
            tick_spans.push(Span::styled(tick, Style::default().fg(Color::Gray)));

            if i < visible.len() - 1 {
                let num_spaces = (spacing - 1.0).round() as usize;
                if num_spaces > 0 {
                    tick_spans.push(Span::raw(" ".repeat(num_spaces)));
                }
            }
        }

        lines.push(Line::from(tick_spans));

        // Ligne 2 : Heures
        let mut label_spans = vec![Span::raw(" ".repeat(Y_AXIS_WIDTH as usize))];

        let mut position = 0.0;
        for (i, candle) in visible.iter().enumerate() {
            if i % label_interval == 0 {
                let time_label = candle.timestamp.format("%H:%M").to_string();

                label_spans.push(Span::styled(
                    time_label.clone(),
                    Style::default().fg(Color::Gray),
                ));

                let next_label_position = if i + label_interval < visible.len() {
                    (i + label_interval) as f64 * spacing
                } else {
                    self.width as f64
                };

                let space_to_next =
                    (next_label_position - position - time_label.len() as f64).max(0.0) as usize;
                if space_to_next > 0 {
                    label_spans.push(Span::raw(" ".repeat(space_to_next)));
                }

                position = next_label_position;
            }
        }

        lines.push(Line::from(label_spans));

        lines
    }
}

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine le graphique en chandeliers japonais pour la série courante
pub fn render_candlestick_chart(frame: &mut Frame, symbol: &str, series: &Series, area: Rect) {
    let renderer = CandlestickRenderer::new(series, area);
    let lines = renderer.render_lines();

    if lines.is_empty() {
        render_no_data(frame, area);
        return;
    }

    let candle_count = renderer.candles.len();
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" 🕯️ {} - 5m ({} chandeliers) ", symbol, candle_count)),
    );

    frame.render_widget(paragraph, area);
}

/// Affiche un message quand il n'y a pas encore de données à dessiner
fn render_no_data(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .title(" 🕯️ Chart ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "En attente de données...",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CandlePoint;
    use chrono::Utc;

    fn renderer_with(candles: Vec<CandlePoint>) -> CandlestickRenderer {
        let area = Rect::new(0, 0, 80, 24);
        CandlestickRenderer::new(&candles, area)
    }

    fn complete(open: f64, high: f64, low: f64, close: f64) -> CandlePoint {
        CandlePoint::from_raw(Utc::now(), Some(open), Some(high), Some(low), Some(close))
    }

    #[test]
    fn test_incomplete_candles_are_skipped_for_rendering() {
        let renderer = renderer_with(vec![
            complete(100.0, 110.0, 95.0, 105.0),
            // open à zéro → champ absent → pas dessinée
            CandlePoint::from_raw(Utc::now(), Some(0.0), Some(110.0), Some(95.0), Some(105.0)),
            complete(105.0, 112.0, 104.0, 111.0),
        ]);

        assert_eq!(renderer.candles.len(), 2);
    }

    #[test]
    fn test_price_bounds_include_margin() {
        let renderer = renderer_with(vec![complete(100.0, 110.0, 90.0, 105.0)]);

        // Marge de 2% de part et d'autre de [90, 110]
        assert!(renderer.min_price < 90.0);
        assert!(renderer.max_price > 110.0);
    }

    #[test]
    fn test_price_to_height_bounds() {
        let renderer = renderer_with(vec![complete(100.0, 110.0, 90.0, 105.0)]);

        let bottom = renderer.price_to_height(renderer.min_price);
        let top = renderer.price_to_height(renderer.max_price);

        assert!((bottom - 0.0).abs() < f64::EPSILON);
        assert!((top - renderer.height as f64).abs() < 1e-9);
    }

    #[test]
    fn test_render_lines_empty_series() {
        let renderer = renderer_with(vec![]);
        assert!(renderer.render_lines().is_empty());
    }

    #[test]
    fn test_render_lines_has_chart_plus_axis() {
        let renderer = renderer_with(vec![
            complete(100.0, 110.0, 95.0, 105.0),
            complete(105.0, 112.0, 104.0, 111.0),
        ]);

        let lines = renderer.render_lines();
        // height lignes de graphique + 2 lignes d'axe X
        assert_eq!(lines.len(), renderer.height as usize + 2);
    }

    #[test]
    fn test_body_character_inside_body_zone() {
        let renderer = renderer_with(vec![complete(100.0, 110.0, 90.0, 105.0)]);
        let candle = renderer.candles[0];

        // Au milieu du corps, on doit avoir un corps plein
        let mid_body = renderer.price_to_height((candle.open + candle.close) / 2.0);
        let ch = renderer.render_candle(&candle, mid_body.round() as u16);
        assert_eq!(ch, UNICODE_BODY);
    }
}
