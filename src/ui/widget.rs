// ============================================================================
// Widget - Rendu des quatre zones
// ============================================================================
// Fonction pure de l'état : label du symbole, prix + direction, heure de
// dernière mise à jour, graphique en chandeliers. Aucune entrée utilisateur
// hormis quitter, aucun effet de bord.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::Direction;
use crate::ui::candlestick;
use crate::SYMBOL;

/// Dessine l'interface complète
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_symbol(frame, chunks[0]);
    render_price(frame, app, chunks[1]);
    render_clock(frame, app, chunks[2]);
    candlestick::render_candlestick_chart(frame, SYMBOL, &app.series, chunks[3]);
}

/// Découpe l'écran en quatre zones verticales
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([
            Constraint::Length(3), // Label du symbole
            Constraint::Length(3), // Prix + direction
            Constraint::Length(3), // Heure de dernière mise à jour
            Constraint::Min(0),    // Graphique
        ])
        .split(area)
        .to_vec()
}

/// Zone 1 : label du symbole suivi
fn render_symbol(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" StonkWatch ")
        .title_alignment(Alignment::Center);

    let text = vec![Line::from(vec![
        Span::styled(
            SYMBOL,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Quitter"),
    ])];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Zone 2 : prix courant + emoji de direction
///
/// Placeholder "Loading..." tant qu'aucun fetch n'a réussi ; ensuite le
/// prix reste affiché même si les fetchs suivants échouent (état périmé,
/// jamais d'erreur montrée à l'utilisateur).
fn render_price(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 💵 Prix ");

    let text = vec![price_line(app)];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Construit la ligne de prix selon l'état courant
fn price_line(app: &App) -> Line<'static> {
    match (app.loading, app.price) {
        (false, Some(price)) => {
            let direction = app.direction();
            let color = match direction {
                Direction::Up => Color::Green,
                Direction::Down => Color::Red,
                Direction::Flat => Color::White,
            };

            let mut spans = vec![Span::styled(
                format!("${:.2}", price),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )];

            // Lookup fixe : 🚀 en hausse, 💩 en baisse, rien à plat
            let emoji = direction.emoji();
            if !emoji.is_empty() {
                spans.push(Span::raw(format!(" {}", emoji)));
            }

            Line::from(spans)
        }
        _ => Line::from(Span::styled(
            "$Loading...",
            Style::default().fg(Color::Gray),
        )),
    }
}

/// Zone 3 : heure murale locale, rafraîchie par le clock ticker
fn render_clock(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 🕐 Dernière mise à jour ");

    let clock_str = app
        .clock
        .map(|now| now.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    let text = vec![Line::from(Span::styled(
        clock_str,
        Style::default().fg(Color::Gray),
    ))];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuoteSnapshot;
    use chrono::Utc;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.clone()).collect()
    }

    #[test]
    fn test_price_line_loading_placeholder() {
        let app = App::new();
        assert_eq!(line_text(&price_line(&app)), "$Loading...");
    }

    #[test]
    fn test_price_line_with_up_emoji() {
        let mut app = App::new();
        app.apply_quote(QuoteSnapshot {
            price: 150.0,
            series: vec![],
            observed_at: Utc::now(),
        });
        app.apply_quote(QuoteSnapshot {
            price: 155.5,
            series: vec![],
            observed_at: Utc::now(),
        });

        assert_eq!(line_text(&price_line(&app)), "$155.50 🚀");
    }

    #[test]
    fn test_price_line_flat_has_no_emoji() {
        let mut app = App::new();
        app.apply_quote(QuoteSnapshot {
            price: 150.0,
            series: vec![],
            observed_at: Utc::now(),
        });

        assert_eq!(line_text(&price_line(&app)), "$150.00");
    }

    #[test]
    fn test_layout_has_four_regions() {
        let chunks = create_layout(Rect::new(0, 0, 100, 40));
        assert_eq!(chunks.len(), 4);
        // Le graphique reçoit tout l'espace restant
        assert_eq!(chunks[3].height, 40 - 9);
    }
}
