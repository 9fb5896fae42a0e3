//! The `visiotest run` command: an interactive session on the terminal.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use visiotest_core::error::SessionError;
use visiotest_core::model::{Gender, LensType, TestType, UserProfile, DIFFICULTY_CHECKLIST};
use visiotest_core::session::{Session, Step};
use visiotest_report::analysis::SCORE_SCALE;
use visiotest_report::export::{export_file_name, ExportDocument};
use visiotest_report::share::{share_text, SHARE_TITLE};
use visiotest_runner::{
    AcuityTest, ColorTest, ContrastTest, RunnerConfig, TestRunner, TrialVerdict,
};
use visiotest_store::config::{create_store, load_config_from};

use crate::commands::report::render_text;
use crate::render::ConsoleTest;

pub async fn execute(
    config_path: Option<PathBuf>,
    seed: Option<u64>,
    delay_ms: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let store = create_store(&config.store)?;
    tracing::debug!(store = store.name(), "record store ready");

    let runner_config = RunnerConfig {
        max_level: config.max_level,
        completion_delay: Duration::from_millis(delay_ms.unwrap_or(config.completion_delay_ms)),
    };
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut app = Interactive {
        session: Session::new(store),
        input: stdin.lock(),
        output: stdout.lock(),
        runner_config,
        rng,
        output_dir: output.unwrap_or(config.output_dir),
    };
    app.run().await
}

/// Whether the session keeps going after a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Drives a [`Session`] from line-oriented input.
///
/// End of input at any prompt quits cleanly.
struct Interactive<I, O> {
    session: Session,
    input: I,
    output: O,
    runner_config: RunnerConfig,
    /// Seeds one runner per test.
    rng: StdRng,
    output_dir: PathBuf,
}

impl<I: BufRead, O: Write> Interactive<I, O> {
    async fn run(&mut self) -> Result<()> {
        loop {
            let flow = match self.session.step() {
                Step::Welcome => self.welcome()?,
                Step::Register => self.register().await?,
                Step::Menu => self.menu()?,
                Step::Test(TestType::Acuity) => self.run_test(AcuityTest).await?,
                Step::Test(TestType::Contrast) => self.run_test(ContrastTest).await?,
                Step::Test(TestType::Color) => self.run_test(ColorTest).await?,
                Step::Results => self.results()?,
            };
            if flow == Flow::Quit {
                writeln!(self.output, "\nAté logo!")?;
                return Ok(());
            }
        }
    }

    fn welcome(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n=== VisioTest+ ===")?;
        writeln!(
            self.output,
            "Avalie sua acuidade visual, sensibilidade ao contraste e percepção de cores."
        )?;
        match self.ask("Pressione Enter para começar ou 'q' para sair")? {
            Some(line) if line.eq_ignore_ascii_case("q") => Ok(Flow::Quit),
            Some(_) => {
                self.session.start()?;
                Ok(Flow::Continue)
            }
            None => Ok(Flow::Quit),
        }
    }

    async fn register(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n--- Cadastro ---")?;
        let Some(profile) = self.read_profile()? else {
            return Ok(Flow::Quit);
        };

        match self.session.complete_registration(profile).await {
            Ok(()) => {
                if let Some(profile) = self.session.profile() {
                    writeln!(self.output, "Olá, {}!", profile.name)?;
                }
                Ok(Flow::Continue)
            }
            Err(SessionError::InvalidProfile(errors)) => {
                writeln!(self.output, "Não foi possível concluir o cadastro:")?;
                for error in errors.iter() {
                    writeln!(self.output, "  - {error}")?;
                }
                Ok(Flow::Continue)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read_profile(&mut self) -> Result<Option<UserProfile>> {
        let mut profile = UserProfile::default();

        let Some(name) = self.ask("Nome")? else {
            return Ok(None);
        };
        profile.name = name;

        let Some(age) = self.ask_parsed::<u32>("Idade", "Informe a idade em anos.")? else {
            return Ok(None);
        };
        profile.age = age;

        let Some(gender) = self.ask_with_default(
            "Gênero [masculino/feminino/outro]",
            Gender::Male,
            "Opções: masculino, feminino, outro.",
        )?
        else {
            return Ok(None);
        };
        profile.gender = gender;

        let Some(uses_glasses) = self.ask_yes_no("Usa óculos ou lentes de contato?")? else {
            return Ok(None);
        };
        profile.set_uses_glasses(uses_glasses);

        if uses_glasses {
            let options = LensType::ALL
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .join("/");
            loop {
                let Some(line) =
                    self.ask(&format!("Tipo de lente [{options}] (Enter para pular)"))?
                else {
                    return Ok(None);
                };
                if line.is_empty() {
                    break;
                }
                match line.parse::<LensType>() {
                    Ok(lens) => {
                        profile.lens_type = Some(lens);
                        break;
                    }
                    Err(_) => writeln!(self.output, "Opções: {options}.")?,
                }
            }
        }

        writeln!(self.output, "Dificuldades visuais:")?;
        for (i, difficulty) in DIFFICULTY_CHECKLIST.iter().enumerate() {
            writeln!(self.output, "  {}. {difficulty}", i + 1)?;
        }
        loop {
            let Some(line) = self.ask("Números separados por vírgula (Enter para nenhuma)")? else {
                return Ok(None);
            };
            match parse_checklist(&line) {
                Some(picked) => {
                    for index in picked {
                        profile.toggle_difficulty(DIFFICULTY_CHECKLIST[index]);
                    }
                    break;
                }
                None => writeln!(
                    self.output,
                    "Use números de 1 a {}.",
                    DIFFICULTY_CHECKLIST.len()
                )?,
            }
        }

        Ok(Some(profile))
    }

    fn menu(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n--- Escolha um teste ---")?;
        for (i, option) in self.session.menu_options().iter().enumerate() {
            let mark = if option.enabled { "" } else { " [concluído]" };
            writeln!(
                self.output,
                "  {}. {}{mark}",
                i + 1,
                option.test_type.title()
            )?;
        }
        if self.session.can_view_results() {
            writeln!(self.output, "  r. Ver resultados")?;
        }
        writeln!(self.output, "  q. Sair")?;

        let Some(choice) = self.ask("Opção")? else {
            return Ok(Flow::Quit);
        };
        let choice = choice.to_lowercase();
        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| TestType::ALL.get(i).copied());

        match (choice.as_str(), picked) {
            ("q", _) => return Ok(Flow::Quit),
            ("r", _) => match self.session.view_results() {
                Ok(()) => {}
                Err(SessionError::NoResults) => {
                    writeln!(self.output, "Conclua pelo menos um teste primeiro.")?
                }
                Err(e) => return Err(e.into()),
            },
            (_, Some(test_type)) => match self.session.select_test(test_type) {
                Ok(()) => {}
                Err(SessionError::TestAlreadyCompleted(_)) => {
                    writeln!(self.output, "Esse teste já foi concluído.")?
                }
                Err(e) => return Err(e.into()),
            },
            _ => writeln!(self.output, "Opção inválida.")?,
        }
        Ok(Flow::Continue)
    }

    async fn run_test<K>(&mut self, kind: K) -> Result<Flow>
    where
        K: ConsoleTest,
        K::Answer: FromStr + Display,
    {
        let options = kind
            .answers()
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let title = kind.test_type().title();
        let instructions = kind.instructions();
        let question = kind.question();

        let rng = StdRng::seed_from_u64(self.rng.gen());
        let mut runner = TestRunner::new(kind, &self.runner_config, rng);

        writeln!(self.output, "\n--- {title} ---")?;
        writeln!(self.output, "{instructions}")?;

        loop {
            writeln!(
                self.output,
                "\nNível {}/{}",
                runner.level(),
                runner.max_level()
            )?;
            writeln!(self.output, "{}", runner.kind().render(runner.stimulus()))?;

            let answer = loop {
                let Some(line) = self.ask(question)? else {
                    return Ok(Flow::Quit);
                };
                match line.parse::<K::Answer>() {
                    Ok(answer) => break answer,
                    Err(_) => writeln!(self.output, "Resposta não reconhecida. Opções: {options}.")?,
                }
            };

            match runner.answer(answer)? {
                TrialVerdict::Continue { .. } => {}
                TrialVerdict::Finished(pending) => {
                    let outcome = pending.outcome();
                    writeln!(self.output, "\nTeste concluído!")?;
                    writeln!(
                        self.output,
                        "Pontuação: {}/{SCORE_SCALE} | Nível alcançado: {}",
                        outcome.score, outcome.level
                    )?;
                    self.output.flush()?;

                    let outcome = pending.wait().await;
                    self.session.complete_test(outcome).await?;
                    return Ok(Flow::Continue);
                }
            }
        }
    }

    fn results(&mut self) -> Result<Flow> {
        let Some(report) = self.session.report() else {
            return Ok(Flow::Quit);
        };
        writeln!(self.output, "\n--- Seus Resultados ---")?;
        writeln!(self.output, "{}", render_text(&report))?;

        let snapshot = self
            .output_dir
            .join(format!("visiotest-session-{}.json", report.id));
        match report.save_json(&snapshot) {
            Ok(()) => writeln!(self.output, "\nSessão salva em {}", snapshot.display())?,
            Err(e) => tracing::warn!("failed to save session snapshot: {e:#}"),
        }

        loop {
            writeln!(
                self.output,
                "\n  c. Compartilhar\n  e. Exportar\n  n. Fazer novos testes\n  q. Sair"
            )?;
            let Some(choice) = self.ask("Opção")? else {
                return Ok(Flow::Quit);
            };
            match choice.to_lowercase().as_str() {
                "c" => {
                    writeln!(self.output, "\n{SHARE_TITLE}\n")?;
                    writeln!(self.output, "{}", share_text(&report.results))?;
                }
                "e" => {
                    let date = chrono::Local::now().date_naive();
                    let document = ExportDocument::new(&report.profile, &report.results, date);
                    let file_name = export_file_name(&report.profile, date);
                    match document.write_to_dir(&self.output_dir, &file_name) {
                        Ok(path) => writeln!(self.output, "Exportado para {}", path.display())?,
                        Err(e) => writeln!(self.output, "Falha ao exportar: {e:#}")?,
                    }
                }
                "n" => {
                    self.session.reset();
                    return Ok(Flow::Continue);
                }
                "q" => return Ok(Flow::Quit),
                _ => writeln!(self.output, "Opção inválida.")?,
            }
        }
    }

    /// Prompt and read one trimmed line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_parsed<T: FromStr>(&mut self, prompt: &str, hint: &str) -> Result<Option<T>> {
        loop {
            let Some(line) = self.ask(prompt)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "{hint}")?,
            }
        }
    }

    fn ask_with_default<T: FromStr + Display>(
        &mut self,
        prompt: &str,
        default: T,
        hint: &str,
    ) -> Result<Option<T>> {
        loop {
            let Some(line) = self.ask(&format!("{prompt} ({default})"))? else {
                return Ok(None);
            };
            if line.is_empty() {
                return Ok(Some(default));
            }
            match line.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => writeln!(self.output, "{hint}")?,
            }
        }
    }

    fn ask_yes_no(&mut self, prompt: &str) -> Result<Option<bool>> {
        loop {
            let Some(line) = self.ask(&format!("{prompt} [s/n] (n)"))? else {
                return Ok(None);
            };
            match line.to_lowercase().as_str() {
                "s" | "sim" | "y" | "yes" => return Ok(Some(true)),
                "" | "n" | "não" | "nao" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "Responda 's' ou 'n'.")?,
            }
        }
    }
}

/// Parse `"1, 3"` into zero-based checklist indices. `None` if any entry is
/// out of range or not a number.
fn parse_checklist(line: &str) -> Option<Vec<usize>> {
    let mut picked = Vec::new();
    for part in line.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let index = part.parse::<usize>().ok()?.checked_sub(1)?;
        if index >= DIFFICULTY_CHECKLIST.len() {
            return None;
        }
        if !picked.contains(&index) {
            picked.push(index);
        }
    }
    Some(picked)
}
