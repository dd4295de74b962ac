//! HTML rendering of the dashboard page.

use super::form::{AREA_RANGE, ROOM_RANGE};
use super::map::MapView;
use super::stats::{BoxPlot, ChartSet};
use super::Prediction;
use crate::models::{AccessType, BathroomLocation, Condition, FeatureRow, Furnished};

pub struct PageView<'a> {
    pub neighborhoods: &'a [String],
    pub row: Option<&'a FeatureRow>,
    pub prediction: Option<&'a Prediction>,
    pub charts: Option<&'a ChartSet>,
    pub map: &'a MapView,
    pub errors: &'a [String],
}

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 2em 2em; color: #262730; }
.columns { display: flex; gap: 2em; flex-wrap: wrap; }
.columns > section { flex: 1; min-width: 320px; }
.error { background: #ffe3e3; color: #a4000f; padding: 0.6em 1em; border-radius: 6px; margin: 0.4em 0; }
.prediction { background: #f0f2f6; padding: 20px; border-radius: 10px; text-align: center; }
.prediction h2 { color: #1e88e5; }
.prediction .amount { color: #ff4b4b; font-size: 3em; font-weight: bold; }
.metrics { display: flex; gap: 2em; }
.delta-up { color: #09ab3b; } .delta-down { color: #ff2b2b; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
td, th { padding: 2px 8px; text-align: left; }
.bar { background: #1e88e5; height: 12px; }
tr.selected { background: #ffd6d6; font-weight: bold; }
label { display: block; margin-top: 0.8em; }
"#;

pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Amount in ariary with space-grouped thousands: `350 000 Ar`
pub fn format_ariary(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{}{} Ar", sign, grouped)
}

pub fn dashboard_page(view: &PageView) -> String {
    let errors: String = view
        .errors
        .iter()
        .map(|e| format!(r#"<div class="error">{}</div>"#, html_escape(e)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Prédiction de loyer à Antananarivo</title>
    <style>{style}</style>
</head>
<body>
    <h1>🏠 Prédiction du prix de location de logements à Antananarivo</h1>
    <p>Prédit le loyer mensuel d'un logement à Antananarivo à partir de ses caractéristiques.</p>
    {errors}
    <div class="columns">
        <section>{form}</section>
        <section>{prediction}</section>
    </div>
    <h2>Visualisations</h2>
    {charts}
    {map}
</body>
</html>"#,
        style = STYLE,
        errors = errors,
        form = feature_form(view),
        prediction = view.prediction.map(prediction_panel).unwrap_or_default(),
        charts = view.charts.map(charts_section).unwrap_or_default(),
        map = map_section(view.map),
    )
}

fn options<T: PartialEq + std::fmt::Display>(choices: &[T], selected: Option<&T>) -> String {
    choices
        .iter()
        .map(|choice| {
            let value = html_escape(&choice.to_string());
            let marker = if selected == Some(choice) { " selected" } else { "" };
            format!(r#"<option value="{}"{}>{}</option>"#, value, marker, value)
        })
        .collect()
}

fn feature_form(view: &PageView) -> String {
    let row = view.row;
    format!(
        r#"<h2>Caractéristiques du logement</h2>
<form method="get" action="/" onchange="this.submit()">
    <label>Quartier <select name="neighborhood">{neighborhoods}</select></label>
    <label>Superficie (m²) <input type="number" name="area_sqm" min="{area_min}" max="{area_max}" value="{area}"></label>
    <label>Nombre de chambres <input type="number" name="room_count" min="{rooms_min}" max="{rooms_max}" value="{rooms}"></label>
    <label>Type de douche/WC <select name="bathroom_location">{bathroom}</select></label>
    <label>Type d'accès <select name="access_type">{access}</select></label>
    <label>Meublé <select name="furnished">{furnished}</select></label>
    <label>État général <select name="condition">{condition}</select></label>
    <noscript><button type="submit">Prédire</button></noscript>
</form>"#,
        neighborhoods = options(view.neighborhoods, row.map(|r| &r.neighborhood)),
        area_min = AREA_RANGE.start(),
        area_max = AREA_RANGE.end(),
        area = row.map(|r| r.area_sqm).unwrap_or(super::form::DEFAULT_AREA),
        rooms_min = ROOM_RANGE.start(),
        rooms_max = ROOM_RANGE.end(),
        rooms = row.map(|r| r.room_count).unwrap_or(super::form::DEFAULT_ROOMS),
        bathroom = options(&BathroomLocation::ALL, row.map(|r| &r.bathroom_location)),
        access = options(&AccessType::ALL, row.map(|r| &r.access_type)),
        furnished = options(&Furnished::ALL, row.map(|r| &r.furnished)),
        condition = options(&Condition::ALL, row.map(|r| &r.condition)),
    )
}

fn metric(label: &str, value: Option<f64>, delta: Option<f64>) -> String {
    let Some(value) = value else {
        return format!("<div><strong>{}</strong><br>n/a</div>", html_escape(label));
    };
    let delta = delta
        .map(|d| {
            let class = if d >= 0.0 { "delta-up" } else { "delta-down" };
            format!(r#"<br><span class="{}">{}</span>"#, class, format_ariary(d))
        })
        .unwrap_or_default();
    format!(
        "<div><strong>{}</strong><br>{}{}</div>",
        html_escape(label),
        format_ariary(value),
        delta
    )
}

fn prediction_panel(prediction: &Prediction) -> String {
    let comparison = &prediction.comparison;
    format!(
        r#"<h2>Résultat de la prédiction</h2>
<div class="prediction">
    <h2>Loyer mensuel estimé</h2>
    <div class="amount">{amount}</div>
</div>
<h3>Comparaison</h3>
<div class="metrics">{local}{global}</div>"#,
        amount = format_ariary(comparison.predicted_rent),
        local = metric(
            &format!("Loyer moyen dans {}", comparison.neighborhood),
            comparison.neighborhood_mean,
            comparison.neighborhood_delta
        ),
        global = metric("Loyer moyen global", comparison.global_mean, comparison.global_delta),
    )
}

fn bar(value: f64, max: f64) -> String {
    let width = if max > 0.0 { (value / max * 300.0).round() } else { 0.0 };
    format!(r#"<div class="bar" style="width:{}px"></div>"#, width)
}

fn box_table(title: &str, plot: &BoxPlot) -> String {
    let rows: String = plot
        .groups
        .iter()
        .map(|g| {
            let selected = plot.marker.as_ref().is_some_and(|m| m.label == g.label);
            format!(
                r#"<tr{}><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                if selected { r#" class="selected""# } else { "" },
                html_escape(&g.label),
                g.count,
                format_ariary(g.min),
                format_ariary(g.q1),
                format_ariary(g.median),
                format_ariary(g.q3),
                format_ariary(g.max),
            )
        })
        .collect();
    let marker = plot
        .marker
        .as_ref()
        .map(|m| format!("<p>Prédiction : {}</p>", format_ariary(m.rent)))
        .unwrap_or_default();
    format!(
        "<h3>{}</h3><table><tr><th></th><th>n</th><th>min</th><th>Q1</th><th>médiane</th><th>Q3</th><th>max</th></tr>{}</table>{}",
        title, rows, marker
    )
}

fn charts_section(charts: &ChartSet) -> String {
    let top = charts
        .mean_by_neighborhood
        .first()
        .map(|n| n.mean)
        .unwrap_or(0.0);
    let by_neighborhood: String = charts
        .mean_by_neighborhood
        .iter()
        .map(|n| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&n.neighborhood),
                n.count,
                format_ariary(n.mean),
                bar(n.mean, top)
            )
        })
        .collect();

    let histogram = &charts.rent_distribution;
    let tallest = histogram.bins.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let bins: String = histogram
        .bins
        .iter()
        .map(|b| {
            let holds_marker = histogram
                .marker
                .is_some_and(|m| m >= b.start && m <= b.end);
            format!(
                "<tr{}><td>{} – {}</td><td>{}</td><td>{}</td></tr>",
                if holds_marker { r#" class="selected""# } else { "" },
                format_ariary(b.start),
                format_ariary(b.end),
                b.count,
                bar(b.count as f64, tallest)
            )
        })
        .collect();

    let scatter = &charts.rent_vs_area;
    let scatter_marker = scatter
        .marker
        .as_ref()
        .map(|m| format!("<p>Prédiction : {} m² → {}</p>", m.area_sqm, format_ariary(m.rent)))
        .unwrap_or_default();

    format!(
        r#"<h3>Loyer moyen par quartier</h3>
<table><tr><th>Quartier</th><th>n</th><th>Loyer moyen</th><th></th></tr>{by_neighborhood}</table>
<h3>Distribution des loyers mensuels</h3>
<table><tr><th>Tranche</th><th>n</th><th></th></tr>{bins}</table>
<h3>Relation entre superficie et loyer mensuel</h3>
<p>{points} logements de référence avec superficie connue.</p>{scatter_marker}
{rooms}
{condition}"#,
        by_neighborhood = by_neighborhood,
        bins = bins,
        points = scatter.points.len(),
        scatter_marker = scatter_marker,
        rooms = box_table("Loyer mensuel par nombre de chambres", &charts.rent_by_rooms),
        condition = box_table("Loyer mensuel par état général", &charts.rent_by_condition),
    )
}

fn map_section(map: &MapView) -> String {
    let rows: String = map
        .markers
        .iter()
        .map(|m| {
            format!(
                r#"<tr{}><td>{}</td><td><a href="https://www.openstreetmap.org/?mlat={lat}&amp;mlon={lon}#map={zoom}/{lat}/{lon}">{lat:.4}, {lon:.4}</a></td><td>{}</td></tr>"#,
                if m.selected { r#" class="selected""# } else { "" },
                m.name,
                m.mean_rent.map(format_ariary).unwrap_or_else(|| "n/a".to_string()),
                lat = m.latitude,
                lon = m.longitude,
                zoom = map.zoom,
            )
        })
        .collect();
    format!(
        "<h3>Carte des quartiers d'Antananarivo</h3><table><tr><th>Quartier</th><th>Position</th><th>Loyer moyen</th></tr>{}</table>",
        rows
    )
}
