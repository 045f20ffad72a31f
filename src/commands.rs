use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use strum::IntoEnumIterator;

use crate::config::Config;
use crate::error::StudyError;
use crate::generator::StudyGenerator;
use crate::ingest::load_course_plan;
use crate::llm_providers::GeminiClient;
use crate::log_debug;
use crate::session::{Lane, Orchestrator, SessionEffect, SessionState, StudyRequest};
use crate::ui::{self, rgb};

/// Inputs of the `generate` command
#[derive(Debug, Clone, Default)]
pub struct GenerateParams {
    pub query: String,
    pub course_plan_file: Option<PathBuf>,
    pub course_plan_text: Option<String>,
    /// Sections to print; empty means all
    pub only: Vec<Lane>,
    pub interactive_quiz: bool,
}

impl GenerateParams {
    /// Whether `lane` is printed for these parameters
    pub fn shows(&self, lane: Lane) -> bool {
        self.only.is_empty() || self.only.contains(&lane)
    }

    fn course_plan(&self) -> Result<Option<String>> {
        if let Some(text) = &self.course_plan_text {
            return Ok(Some(text.clone()));
        }
        self.course_plan_file
            .as_deref()
            .map(load_course_plan)
            .transpose()
            .map_err(anyhow::Error::from)
    }
}

/// Handle the `generate` command
pub async fn handle_generate_command(params: GenerateParams) -> Result<()> {
    let config = Config::load()?;
    let course_plan = params.course_plan()?;

    let backend = Arc::new(GeminiClient::new(&config));
    let generator = StudyGenerator::from_config(backend, &config);
    let mut orchestrator = Orchestrator::new(generator);

    let mut request = StudyRequest::new(params.query.clone());
    request.course_plan = course_plan;
    let submission = orchestrator.submit(request)?;
    log_debug!("Generating study material for submission {}", submission);

    let spinner = ui::create_spinner("Generating study material...");
    let mut settled = 0;
    while let Some(effects) = orchestrator.next_update().await {
        for effect in effects {
            if let SessionEffect::LaneSettled(lane) = effect {
                settled += 1;
                spinner.set_message(format!(
                    "{lane} ready ({settled} of {} sections)",
                    Lane::iter().count()
                ));
            }
        }
    }
    spinner.finish_and_clear();

    print_session(orchestrator.state(), &params);

    if params.interactive_quiz {
        let stdin = io::stdin();
        run_quiz(&mut orchestrator, &mut stdin.lock())?;
    }

    Ok(())
}

/// Print every selected lane, or its error
pub fn print_session(state: &SessionState, params: &GenerateParams) {
    if params.shows(Lane::Notes) {
        ui::print_section_header("📝 Notes");
        match (state.notes.data(), state.notes.error()) {
            (Some(notes), _) => println!("{}", ui::wrap_text(notes)),
            (None, Some(error)) => ui::print_error(error),
            (None, None) => ui::print_warning("No notes were generated."),
        }
    }

    if params.shows(Lane::Flashcards) {
        ui::print_section_header("🃏 Flashcards");
        match (state.flashcards.data(), state.flashcards.error()) {
            (Some(cards), _) if !cards.is_empty() => {
                for (index, card) in cards.iter().enumerate() {
                    println!("{}", ui::format_flashcard(index, card));
                }
            }
            (_, Some(error)) => ui::print_error(error),
            _ => ui::print_warning("No flashcards were generated."),
        }
    }

    if params.shows(Lane::Quiz) {
        ui::print_section_header("❓ Quiz");
        match (state.quiz.data(), state.quiz.error()) {
            (Some(quiz), _) if !quiz.is_empty() => {
                for (index, question) in quiz.questions.iter().enumerate() {
                    println!("{}", ui::format_quiz_question(index, question, quiz.show_results));
                }
            }
            (_, Some(error)) => ui::print_error(error),
            _ => ui::print_warning("No quiz questions were generated."),
        }
    }

    if params.shows(Lane::Resources) {
        ui::print_section_header("🔗 Resources");
        if let Some(error) = state.resources.error() {
            ui::print_error(error);
        }
        let merged = state.merged_resources();
        if merged.is_empty() {
            if state.resources.error().is_none() {
                ui::print_warning("No resources were found.");
            }
        } else {
            for resource in &merged {
                println!("{}", ui::format_resource(resource));
            }
        }
    }
}

/// Ask each quiz question on `input`, then grade and print the results
pub fn run_quiz(orchestrator: &mut Orchestrator, input: &mut impl BufRead) -> Result<()> {
    let Some(quiz) = orchestrator.state().quiz.data() else {
        ui::print_warning("The quiz is not available for this topic.");
        return Ok(());
    };
    if quiz.is_empty() {
        ui::print_warning("The quiz has no questions.");
        return Ok(());
    }
    let questions = quiz.questions.clone();

    ui::print_section_header("✏️  Take the quiz");
    for (index, question) in questions.iter().enumerate() {
        println!("{}", ui::format_quiz_question(index, question, false));
        loop {
            print!("Your answer (A-{}): ", ui::option_letter(question.options.len().saturating_sub(1)));
            io::stdout().flush()?;

            let mut line = String::new();
            if input.read_line(&mut line).context("Failed to read answer")? == 0 {
                ui::print_warning("Input closed before the quiz was finished.");
                return Ok(());
            }
            let Some(option) = ui::option_index(&line).and_then(|i| question.options.get(i))
            else {
                ui::print_warning("Please pick one of the listed letters.");
                continue;
            };
            match orchestrator.select_answer(&question.id, option) {
                Ok(()) => break,
                Err(StudyError::Validation(message)) => ui::print_warning(&message),
                Err(e) => return Err(e.into()),
            }
        }
    }

    let (score, total) = orchestrator.submit_quiz()?;
    if let Some(quiz) = orchestrator.state().quiz.data() {
        ui::print_section_header("📊 Results");
        for (index, question) in quiz.questions.iter().enumerate() {
            println!("{}", ui::format_quiz_question(index, question, true));
        }
    }
    ui::print_newline();
    ui::print_success(&format!("You scored {score} out of {total}!"));
    Ok(())
}

/// Handle the `config` command
pub fn handle_config_command(
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
    max_course_plan_chars: Option<usize>,
) -> Result<()> {
    let mut config = Config::load()?;
    let changes_made = api_key.is_some()
        || model.is_some()
        || base_url.is_some()
        || max_course_plan_chars.is_some();

    config.update(api_key, model, base_url, max_course_plan_chars)?;

    if changes_made {
        config.save()?;
        ui::print_success("Configuration updated successfully.");
        ui::print_newline();
    }

    print_configuration(&config);
    Ok(())
}

fn print_configuration(config: &Config) {
    let (pr, pg, pb) = rgb::ELECTRIC_PURPLE;
    let (cr, cg, cb) = rgb::NEON_CYAN;

    println!();
    println!(
        "{}  {}  {}",
        "━━━".truecolor(pr, pg, pb),
        "STUDY CIRCLE CONFIGURATION".truecolor(cr, cg, cb).bold(),
        "━━━".truecolor(pr, pg, pb)
    );
    println!();

    print_config_row("API key", &config.masked_api_key(), rgb::CORAL);
    print_config_row("Model", &config.model, rgb::NEON_CYAN);
    print_config_row("Base URL", &config.base_url, rgb::DIM_WHITE);
    print_config_row(
        "Plan limit",
        &format!("{} chars", config.max_course_plan_chars),
        rgb::ELECTRIC_YELLOW,
    );
    print_config_row(
        "Verbose logs",
        if config.verbose_logging {
            "enabled"
        } else {
            "disabled"
        },
        if config.verbose_logging {
            rgb::SUCCESS_GREEN
        } else {
            rgb::DIM_WHITE
        },
    );
    println!();
}

fn print_config_row(label: &str, value: &str, color: (u8, u8, u8)) {
    let (dr, dg, db) = rgb::DIM_WHITE;
    println!(
        "  {:<14} {}",
        label.truecolor(dr, dg, db),
        value.truecolor(color.0, color.1, color.2)
    );
}
