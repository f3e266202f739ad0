// ============================================================================
// API Client : Yahoo Finance (chart v8)
// ============================================================================
// Récupère le prix du marché et la série intraday pour un symbole.
// Toute défaillance (réseau, statut HTTP, JSON inattendu) est une seule et
// même erreur : elle est loggée au niveau du poller puis avalée, le prochain
// cycle réessaie.
// ============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::models::{CandlePoint, QuoteSnapshot};

// ============================================================================
// Structures pour parser la réponse JSON de Yahoo Finance
// ============================================================================
// Le poller dépend exactement de cette forme :
// { chart: { result: [ { meta: { regularMarketPrice },
//                        timestamp: [...],
//                        indicators: { quote: [ { open, high, low, close } ] } } ] } }
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: Meta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

/// Métadonnées du ticker
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meta {
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
}

/// Arrays OHLC alignés sur les timestamps
#[derive(Debug, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Construit le client HTTP partagé par tous les cycles du poller
///
/// User-Agent navigateur : Yahoo bloque le User-Agent par défaut de reqwest.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
        .build()
        .context("Échec de la création du client HTTP")
}

/// Construit l'URL de l'endpoint chart pour un symbole
///
/// Intervalle et range fixes : le widget est mono-symbole, intraday.
fn build_chart_url(symbol: &str) -> String {
    format!(
        "https://query1.finance.yahoo.com/v8/finance/chart/{}?interval=5m&range=1d",
        symbol
    )
}

/// Récupère un snapshot de cotation depuis Yahoo Finance
///
/// Pas de timeout sur la requête elle-même : une requête qui traîne bloque
/// ce cycle du poller et lui seul, l'horloge et le rendu restent réactifs.
#[instrument(skip(client))]
pub async fn fetch_quote(client: &reqwest::Client, symbol: &str) -> Result<QuoteSnapshot> {
    let url = build_chart_url(symbol);
    debug!(url = %url, "Built Yahoo Finance chart URL");

    let response = client
        .get(&url)
        .send()
        .await
        .context("Échec de la requête HTTP vers Yahoo Finance")?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    if !status.is_success() {
        anyhow::bail!("Yahoo Finance a retourné une erreur : HTTP {}", status);
    }

    let chart_response: ChartResponse = response
        .json()
        .await
        .context("Échec du parsing JSON de la réponse Yahoo")?;

    parse_chart_response(chart_response)
}

/// Convertit la réponse Yahoo en QuoteSnapshot
///
/// Fonction pure, testable sans réseau. Une chandelle dont certaines valeurs
/// manquent (ou valent zéro) est conservée avec des champs None : c'est le
/// rendu qui décide de la sauter, pas le parsing.
pub(crate) fn parse_chart_response(response: ChartResponse) -> Result<QuoteSnapshot> {
    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .context("Aucun résultat dans la réponse Yahoo Finance")?;

    let price = result
        .meta
        .regular_market_price
        .context("Pas de prix du marché dans la réponse")?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .context("Pas de données OHLC dans la réponse")?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();

    let mut series = Vec::with_capacity(timestamps.len());
    for (i, &timestamp) in timestamps.iter().enumerate() {
        let datetime = DateTime::from_timestamp(timestamp, 0).context("Timestamp invalide")?;

        series.push(CandlePoint::from_raw(
            datetime,
            opens.get(i).copied().flatten(),
            highs.get(i).copied().flatten(),
            lows.get(i).copied().flatten(),
            closes.get(i).copied().flatten(),
        ));
    }

    debug!(candles = series.len(), price, "Parsed chart response");

    Ok(QuoteSnapshot {
        price,
        series,
        observed_at: Utc::now(),
    })
}

// ============================================================================
// Tests unitaires
// ============================================================================
