//! Plain-text summary for sharing.

use visiotest_core::model::TestResult;

use crate::analysis::SCORE_SCALE;

/// Title handed to a share mechanism alongside the text.
pub const SHARE_TITLE: &str = "Resultados VisioTest+";

const HEADER: &str = "Meus resultados do VisioTest+:";
const FOOTER: &str = "Baixe o app: [Link do app]";

/// One line per result (`contraste: 7/10 (Nível 8)`) between a fixed header
/// and footer.
pub fn share_text(results: &[TestResult]) -> String {
    let lines: Vec<String> = results
        .iter()
        .map(|r| {
            format!(
                "{}: {}/{SCORE_SCALE} (Nível {})",
                r.test_type, r.score, r.level
            )
        })
        .collect();
    format!("{HEADER}\n{}\n\n{FOOTER}", lines.join("\n"))
}
