use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::types::{Flashcard, MergedResource, Provenance, QuizQuestion};

// ═══════════════════════════════════════════════════════════════════════════════
// Palette
// ═══════════════════════════════════════════════════════════════════════════════

// RGB tuples for the `colored` crate's `.truecolor()`
pub mod rgb {
    pub const ELECTRIC_PURPLE: (u8, u8, u8) = (225, 53, 255);
    pub const NEON_CYAN: (u8, u8, u8) = (128, 255, 234);
    pub const CORAL: (u8, u8, u8) = (255, 106, 193);
    pub const ELECTRIC_YELLOW: (u8, u8, u8) = (241, 250, 140);
    pub const SUCCESS_GREEN: (u8, u8, u8) = (80, 250, 123);
    pub const ERROR_RED: (u8, u8, u8) = (255, 99, 99);
    pub const DIM_WHITE: (u8, u8, u8) = (180, 180, 190);
    pub const DIM_SEPARATOR: (u8, u8, u8) = (60, 60, 70);
}

/// Width used when wrapping generated prose
const WRAP_WIDTH: usize = 88;

static QUIET_MODE: LazyLock<Mutex<bool>> = LazyLock::new(|| Mutex::new(false));

/// Enable or disable quiet mode
pub fn set_quiet_mode(enabled: bool) {
    *QUIET_MODE.lock() = enabled;
}

pub fn is_quiet_mode() -> bool {
    *QUIET_MODE.lock()
}

pub fn create_spinner(message: &str) -> ProgressBar {
    if is_quiet_mode() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("✦✧✶✷✸✹✺✻✼✽")
            .template("{spinner} {msg}")
            .expect("Could not set spinner style"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_info(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.cyan().bold());
    }
}

pub fn print_warning(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.yellow().bold());
    }
}

pub fn print_error(message: &str) {
    // Errors print even in quiet mode
    eprintln!("{}", message.red().bold());
}

pub fn print_success(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.green().bold());
    }
}

pub fn print_version(version: &str) {
    if !is_quiet_mode() {
        println!(
            "{} {} {}",
            "📚 Study Circle".magenta().bold(),
            "version".cyan(),
            version.green()
        );
    }
}

pub fn print_newline() {
    if !is_quiet_mode() {
        println!();
    }
}

/// Section heading with a separator rule
pub fn print_section_header(title: &str) {
    let (r, g, b) = rgb::ELECTRIC_PURPLE;
    let (sr, sg, sb) = rgb::DIM_SEPARATOR;
    println!();
    println!("{}", title.truecolor(r, g, b).bold());
    println!("{}", "━".repeat(50).truecolor(sr, sg, sb));
}

/// Wrap prose lines to the terminal width, leaving blank lines intact
pub fn wrap_text(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                textwrap::fill(line, WRAP_WIDTH)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_flashcard(index: usize, card: &Flashcard) -> String {
    let (r, g, b) = rgb::NEON_CYAN;
    let (dr, dg, db) = rgb::DIM_WHITE;
    format!(
        "{} {}\n   {}",
        format!("{}.", index + 1).truecolor(r, g, b).bold(),
        card.question.bold(),
        textwrap::fill(&card.answer, WRAP_WIDTH - 3)
            .replace('\n', "\n   ")
            .truecolor(dr, dg, db)
    )
}

/// Question with lettered options; after grading, marks the correct option
/// and the user's choice
pub fn format_quiz_question(index: usize, question: &QuizQuestion, show_results: bool) -> String {
    let mut out = format!("{}. {}", index + 1, question.question.bold());
    for (i, option) in question.options.iter().enumerate() {
        let letter = option_letter(i);
        let chosen = question.user_answer.as_deref() == Some(option.as_str());
        let line = format!("   {letter}) {option}");
        let line = if show_results && *option == question.correct_answer {
            let (r, g, b) = rgb::SUCCESS_GREEN;
            format!("{} ✓", line.truecolor(r, g, b).bold())
        } else if show_results && chosen {
            let (r, g, b) = rgb::ERROR_RED;
            format!("{} ✗", line.truecolor(r, g, b))
        } else if chosen {
            format!("{} ●", line.bold())
        } else {
            line
        };
        out.push('\n');
        out.push_str(&line);
    }
    if show_results && let Some(explanation) = &question.explanation {
        let (r, g, b) = rgb::DIM_WHITE;
        out.push_str(&format!("\n   {}", explanation.truecolor(r, g, b).italic()));
    }
    out
}

pub fn format_resource(resource: &MergedResource) -> String {
    let badge_color = match resource.provenance {
        Provenance::Suggested => rgb::CORAL,
        Provenance::WebSearchResult => rgb::ELECTRIC_YELLOW,
    };
    let (r, g, b) = badge_color;
    let kind = resource
        .kind
        .as_deref()
        .map(|k| format!(" ({k})"))
        .unwrap_or_default();
    format!(
        "• {}{}\n  {}  {}",
        resource.title.bold(),
        kind,
        resource.uri.underline(),
        format!("[{}]", resource.provenance).truecolor(r, g, b)
    )
}

/// `A`, `B`, `C`, ... for option positions
pub fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .and_then(|i| b'A'.checked_add(i))
        .filter(u8::is_ascii_uppercase)
        .map_or('?', char::from)
}

/// Inverse of [`option_letter`], case-insensitive
pub fn option_index(input: &str) -> Option<usize> {
    let mut chars = input.trim().chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !letter.is_ascii_uppercase() {
        return None;
    }
    Some(usize::from(u8::try_from(letter).ok()? - b'A'))
}
