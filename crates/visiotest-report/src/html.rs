//! HTML results page.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use visiotest_core::model::TestResult;
use visiotest_core::snapshot::SessionReport;

use crate::analysis::{advisories, ScoreBand, DISCLAIMER, SCORE_SCALE};
use crate::export::duration_seconds;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the results page for a session report.
pub fn generate_html(report: &SessionReport) -> String {
    let profile = &report.profile;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>VisioTest+ | {}</title>\n",
        html_escape(&profile.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Seus Resultados</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\"><strong>{}</strong> | {} anos | {}</p>\n",
        html_escape(&profile.name),
        profile.age,
        report.created_at.format("%d/%m/%Y %H:%M UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"cards\">\n");
    for result in &report.results {
        html.push_str(&result_card(result));
    }
    html.push_str("</section>\n");

    if !report.results.is_empty() {
        html.push_str("<section class=\"chart\">\n");
        html.push_str(&generate_bar_chart(&report.results));
        html.push_str("</section>\n");
    }

    let notes = advisories(profile, &report.results);
    if !notes.is_empty() {
        html.push_str("<section class=\"advisories\">\n");
        html.push_str("<h2>Recomendações Personalizadas</h2>\n<ul>\n");
        for note in &notes {
            html.push_str(&format!("<li>{}</li>\n", html_escape(&note.message())));
        }
        html.push_str("</ul>\n</section>\n");
    }

    html.push_str("<section class=\"disclaimer\">\n");
    html.push_str("<h2>Aviso Importante</h2>\n");
    html.push_str(&format!("<p>{}</p>\n", html_escape(DISCLAIMER)));
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Dados brutos (JSON)</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn result_card(result: &TestResult) -> String {
    let band = ScoreBand::from_score(result.score);
    format!(
        "<article class=\"card {}\">\n\
         <h3>{}</h3>\n\
         <p class=\"score\">{}/{SCORE_SCALE}</p>\n\
         <p class=\"band\">{}</p>\n\
         <p class=\"meta\">Nível {} | {}s</p>\n\
         </article>\n",
        band.css_class(),
        html_escape(result.test_type.title()),
        result.score,
        band.label(),
        result.level,
        duration_seconds(result.duration),
    )
}

/// Write the results page to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn generate_bar_chart(results: &[TestResult]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 220;

    let total_height = results.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, result) in results.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let ratio = f64::from(result.score.min(SCORE_SCALE)) / f64::from(SCORE_SCALE);
        let width = (ratio * max_width as f64) as usize;

        let color = match ScoreBand::from_score(result.score) {
            ScoreBand::Excellent => "#22c55e",
            ScoreBand::Good => "#eab308",
            ScoreBand::Fair | ScoreBand::NeedsAttention => "#ef4444",
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(result.test_type.title())
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}/{SCORE_SCALE}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            result.score
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --excellent: #dcfce7; --good: #fef9c3; --attention: #fde2e2; --warn: #fff7ed; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --excellent: #064e3b; --good: #713f12; --attention: #7f1d1d; --warn: #431407; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 960px; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 1rem; }
.card { border: 1px solid var(--border); border-radius: 12px; padding: 1rem 1.5rem; }
.card .score { font-size: 2.5rem; font-weight: bold; margin: 0.5rem 0; }
.card .band { font-weight: bold; margin: 0; }
.excellent { background: var(--excellent); }
.good { background: var(--good); }
.attention { background: var(--attention); }
.advisories li { margin: 0.5rem 0; }
.disclaimer { border: 1px solid var(--border); border-radius: 12px; padding: 0 1.5rem 1rem; background: var(--warn); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use visiotest_core::model::{TestDetails, TestType, UserProfile, COLOR_DIFFICULTY};

    fn result(test_type: TestType, score: u32) -> TestResult {
        TestResult {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: "temp".into(),
            test_type,
            score,
            level: (score + 1).min(10),
            duration: 4_200,
            date: Utc::now(),
            details: TestDetails {
                max_level: (score + 1).min(10),
                correct_answers: score,
                extra: Default::default(),
            },
        }
    }

    fn make_test_report() -> SessionReport {
        let mut profile = UserProfile {
            name: "Ana <Souza>".into(),
            age: 45,
            ..Default::default()
        };
        profile.toggle_difficulty(COLOR_DIFFICULTY);
        SessionReport::new(
            profile,
            vec![result(TestType::Contrast, 2), result(TestType::Color, 9)],
        )
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Ana &lt;Souza&gt;"));
        assert!(!html.contains("Ana <Souza>"));
        assert!(html.contains("Sensibilidade ao Contraste"));
        assert!(html.contains("Percepção de Cores"));
        assert!(html.contains("card attention"));
        assert!(html.contains("card excellent"));
        assert!(html.contains("Considerando sua idade (45 anos)"));
        assert!(html.contains("oftalmologista qualificado"));
        assert!(!html.contains("confirmam dificuldades com cores"));
    }

    #[test]
    fn empty_report_has_no_chart() {
        let report = SessionReport::new(UserProfile::default(), Vec::new());
        let html = generate_html(&report);
        assert!(!html.contains("<svg"));
        assert!(!html.contains("Recomendações"));
        assert!(html.contains("Aviso Importante"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
