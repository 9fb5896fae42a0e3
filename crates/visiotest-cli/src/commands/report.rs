//! The `visiotest report` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{Cell, Table};

use visiotest_core::model::TestResult;
use visiotest_core::snapshot::SessionReport;
use visiotest_report::analysis::{advisories, ScoreBand, DISCLAIMER, SCORE_SCALE};
use visiotest_report::export::{duration_seconds, export_file_name, ExportDocument};
use visiotest_report::html::write_html_report;

pub fn execute(session: PathBuf, format: String, output: Option<PathBuf>) -> Result<()> {
    let report = SessionReport::load_json(&session)?;

    match format.as_str() {
        "text" => {
            println!("{}", render_text(&report));
        }
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            match output {
                Some(path) => {
                    write_file(&path, &json)?;
                    eprintln!("Report saved to: {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        "html" => {
            let path = output.unwrap_or_else(|| PathBuf::from("visiotest-report.html"));
            write_html_report(&report, &path)?;
            eprintln!("HTML report: {}", path.display());
        }
        "export" => {
            let date = report.created_at.date_naive();
            let document = ExportDocument::new(&report.profile, &report.results, date);
            match output {
                Some(dir) => {
                    let path =
                        document.write_to_dir(&dir, &export_file_name(&report.profile, date))?;
                    eprintln!("Export saved to: {}", path.display());
                }
                None => println!("{}", serde_json::to_string_pretty(&document)?),
            }
        }
        other => anyhow::bail!("unknown format: '{other}' (expected text, json, html or export)"),
    }

    Ok(())
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Score table for a list of results.
pub fn results_table(results: &[TestResult]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Teste", "Pontuação", "Nível", "Duração", "Avaliação"]);

    for result in results {
        table.add_row(vec![
            Cell::new(result.test_type.title()),
            Cell::new(format!("{}/{SCORE_SCALE}", result.score)),
            Cell::new(result.level),
            Cell::new(format!("{}s", duration_seconds(result.duration))),
            Cell::new(ScoreBand::from_score(result.score).label()),
        ]);
    }

    table
}

/// Results table, advisories and disclaimer as plain text.
pub fn render_text(report: &SessionReport) -> String {
    let profile = &report.profile;
    let mut out = format!(
        "Resultados de {} ({} anos)\n{}\n",
        profile.name,
        profile.age,
        results_table(&report.results)
    );

    let notes = advisories(profile, &report.results);
    if !notes.is_empty() {
        out.push_str("\nRecomendações:\n");
        for note in &notes {
            out.push_str(&format!("  - {note}\n"));
        }
    }

    out.push_str(&format!("\nAviso: {DISCLAIMER}"));
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use visiotest_core::model::{LensType, TestDetails, TestType, UserProfile};

    use super::*;

    fn sample() -> SessionReport {
        let mut profile = UserProfile {
            name: "Ana".into(),
            age: 45,
            ..Default::default()
        };
        profile.set_uses_glasses(true);
        profile.lens_type = Some(LensType::Presbyopia);
        let result = TestResult {
            id: "r1".into(),
            user_id: "temp".into(),
            test_type: TestType::Contrast,
            score: 2,
            level: 3,
            duration: 6_700,
            date: Utc::now(),
            details: TestDetails {
                max_level: 3,
                correct_answers: 2,
                extra: Default::default(),
            },
        };
        SessionReport::new(profile, vec![result])
    }

    #[test]
    fn text_lists_scores_and_notes() {
        let text = render_text(&sample());
        assert!(text.contains("Resultados de Ana (45 anos)"));
        assert!(text.contains("Sensibilidade ao Contraste"));
        assert!(text.contains("2/10"));
        assert!(text.contains("7s"));
        assert!(text.contains("Atenção"));
        assert!(text.contains("Considerando sua idade (45 anos)"));
        assert!(text.contains("Como você usa presbiopia"));
        assert!(text.contains("avaliação oftalmológica mais detalhada"));
        assert!(text.contains("Aviso: Este aplicativo"));
    }

    #[test]
    fn unknown_format_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        sample().save_json(&path).unwrap();

        let err = execute(path, "pdf".into(), None).unwrap_err();
        assert!(err.to_string().contains("unknown format"));
    }

    #[test]
    fn export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let report = sample();
        report.save_json(&path).unwrap();

        let out = dir.path().join("exports");
        execute(path, "export".into(), Some(out.clone())).unwrap();

        let expected = out.join(export_file_name(
            &report.profile,
            report.created_at.date_naive(),
        ));
        let doc: ExportDocument =
            serde_json::from_str(&std::fs::read_to_string(expected).unwrap()).unwrap();
        assert_eq!(doc.usuario, "Ana");
        assert_eq!(doc.resultados[0].pontuacao, "2/10");
    }
}
