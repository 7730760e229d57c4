//! CLI command implementations

use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use flashdeck_core::{Config, Language, Library, PracticeScope, PracticeState};
use std::io::{BufRead, Write};
use std::cell::OnceCell;
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// Everything a command needs: the effective config and, on first use, the library
///
/// The storage file is only opened by commands that touch data, so `config`
/// still works when the file is unreadable.
pub struct Context {
    library: OnceCell<Library>,
    pub config: Config,
    pub config_path: PathBuf,
    pub data_file: PathBuf,
    pub json: bool,
}

impl Context {
    pub fn load(data: Option<PathBuf>, json: bool) -> Result<Self> {
        let config_path = Config::default_path()?;
        let config = Config::load(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?;

        if !config.display.colors {
            colored::control::set_override(false);
        }

        let data_file = match data {
            Some(path) => path,
            None => config.data_file()?,
        };
        Ok(Self::new(config, config_path, data_file, json))
    }

    pub fn new(config: Config, config_path: PathBuf, data_file: PathBuf, json: bool) -> Self {
        Self {
            library: OnceCell::new(),
            config,
            config_path,
            data_file,
            json,
        }
    }

    pub fn library(&self) -> Result<&Library> {
        if self.library.get().is_none() {
            let library = Library::open(&self.data_file)
                .with_context(|| format!("opening {}", self.data_file.display()))?;
            let _ = self.library.set(library);
        }
        self.library
            .get()
            .ok_or_else(|| anyhow::anyhow!("storage not opened: {}", self.data_file.display()))
    }

    fn require_theme(&self, theme_id: &str) -> Result<flashdeck_core::Theme> {
        self.library()?
            .themes
            .get(theme_id)
            .ok_or_else(|| anyhow::anyhow!("Theme not found: {}", theme_id))
    }
}

pub fn theme_list(ctx: &Context) -> Result<()> {
    let summaries = ctx.library()?.themes.summaries();

    if ctx.json {
        println!("{}", serde_json::to_string(&summaries)?);
    } else if summaries.is_empty() {
        println!("No themes yet. Create one with `flashdeck theme add <name>`");
    } else {
        for summary in summaries {
            println!(
                "{} {} ({} cards)",
                summary.theme.id.cyan(),
                summary.theme.name.bold(),
                summary.card_count
            );
        }
    }

    Ok(())
}

pub fn theme_add(ctx: &Context, name: &str) -> Result<()> {
    let theme = ctx.library()?.themes.add(name)?;

    if ctx.json {
        println!("{}", serde_json::to_string(&theme)?);
    } else {
        println!("{} Created theme: {}", "✓".green(), theme.id);
        println!("  Name: {}", theme.name);
    }

    Ok(())
}

pub fn theme_rename(ctx: &Context, id: &str, name: &str) -> Result<()> {
    ctx.require_theme(id)?;
    if name.trim().is_empty() {
        bail!("Theme name must not be empty");
    }
    if !ctx.library()?.themes.update(id, name) {
        bail!("Failed to rename theme {}", id);
    }

    if ctx.json {
        println!("{}", serde_json::to_string(&ctx.require_theme(id)?)?);
    } else {
        println!("{} Renamed {}", "✓".green(), id);
    }

    Ok(())
}

pub fn theme_rm(ctx: &Context, id: &str) -> Result<()> {
    let theme = ctx.require_theme(id)?;
    if !ctx.library()?.themes.delete(id) {
        bail!("Failed to delete theme {}", id);
    }

    if ctx.json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("{} Deleted theme {} and its cards", "✓".green(), theme.name);
    }

    Ok(())
}

pub fn card_list(ctx: &Context, theme_id: &str) -> Result<()> {
    let theme = ctx.require_theme(theme_id)?;
    let library = ctx.library()?;
    let reports = library.cards.list_with_rates(theme_id, &library.stats);

    if ctx.json {
        println!("{}", serde_json::to_string(&reports)?);
        return Ok(());
    }

    println!("{}", theme.name.bold());
    if reports.is_empty() {
        println!("No cards yet");
        return Ok(());
    }

    for report in reports {
        let card = &report.card;
        if ctx.config.display.show_rates {
            let rate = format!("{:>3}%", report.success_rate);
            let rate = if report.stat.total == 0 {
                rate.dimmed()
            } else if report.success_rate >= 80 {
                rate.green()
            } else if report.success_rate >= 50 {
                rate.yellow()
            } else {
                rate.red()
            };
            println!("{} {} {} - {}", card.id.cyan(), rate, card.word.bold(), card.description);
        } else {
            println!("{} {} - {}", card.id.cyan(), card.word.bold(), card.description);
        }
    }

    Ok(())
}

pub fn card_add(ctx: &Context, theme_id: &str, word: &str, description: &str) -> Result<()> {
    let card = ctx.library()?.cards.add(theme_id, word, description)?;

    if ctx.json {
        println!("{}", serde_json::to_string(&card)?);
    } else {
        println!("{} Created card: {}", "✓".green(), card.id);
        println!("  Word: {}", card.word);
        println!("  Description: {}", card.description);
    }

    Ok(())
}

pub fn card_rm(ctx: &Context, theme_id: &str, card_id: &str) -> Result<()> {
    ctx.require_theme(theme_id)?;
    if !ctx.library()?.cards.delete(theme_id, card_id) {
        bail!("Failed to delete card {}", card_id);
    }

    if ctx.json {
        println!("{}", serde_json::json!({ "deleted": card_id }));
    } else {
        println!("{} Deleted card {}", "✓".green(), card_id);
    }

    Ok(())
}

/// Interactive practice loop over stdin
pub fn practice(ctx: &Context, theme: Option<String>) -> Result<()> {
    let scope = match theme {
        Some(id) => {
            ctx.require_theme(&id)?;
            PracticeScope::Theme(id)
        }
        None => PracticeScope::All,
    };

    let mut session = ctx.library()?.start_practice(&scope);
    if session.state() == PracticeState::Empty {
        println!("No cards to practice. Add some with `flashdeck card add`");
        return Ok(());
    }

    println!(
        "{} cards. Type the word for each description; {} reveals it, {} quits.",
        session.pool().len(),
        ":show".cyan(),
        ":q".cyan()
    );

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut answered = 0u32;
    let mut correct = 0u32;

    loop {
        let Some(card) = session.current() else {
            break;
        };
        println!();
        println!("{}", card.description.bold());
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line?;

        match line.trim() {
            ":q" => break,
            ":show" => {
                if let Some(word) = session.reveal() {
                    println!("  {}", word.yellow());
                }
                session.next();
                continue;
            }
            _ => {}
        }

        if let Some(outcome) = session.submit_answer(&line) {
            answered += 1;
            if outcome.is_correct {
                correct += 1;
                println!("{} Correct ({}% success)", "✓".green(), outcome.success_rate);
            } else {
                let word = session.reveal().unwrap_or_default();
                println!(
                    "{} It was {} ({}% success)",
                    "✗".red(),
                    word.bold(),
                    outcome.success_rate
                );
            }
        }
        session.next();
    }

    if answered > 0 {
        println!("{} {}/{} correct this session", "✓".green(), correct, answered);
    }

    Ok(())
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Card")]
    card: String,
    #[tabled(rename = "Word")]
    word: String,
    #[tabled(rename = "Correct")]
    correct: u32,
    #[tabled(rename = "Total")]
    total: u32,
    #[tabled(rename = "Rate")]
    rate: String,
}

pub fn stats(ctx: &Context) -> Result<()> {
    let snapshot = ctx.library()?.stats.get();

    if ctx.json {
        println!("{}", serde_json::to_string(&snapshot)?);
        return Ok(());
    }
    if snapshot.is_empty() {
        println!("No answers recorded yet");
        return Ok(());
    }

    // Stats outlive deleted cards; those rows show no word
    let words: std::collections::HashMap<String, String> = ctx
        .library()?
        .cards
        .list_all()
        .into_iter()
        .map(|c| (c.id, c.word))
        .collect();

    let mut rows: Vec<StatRow> = snapshot
        .into_iter()
        .map(|(id, stat)| StatRow {
            word: words.get(&id).cloned().unwrap_or_else(|| "-".to_string()),
            card: id,
            correct: stat.correct,
            total: stat.total,
            rate: format!("{}%", stat.success_rate()),
        })
        .collect();
    rows.sort_by(|a, b| a.word.cmp(&b.word).then_with(|| a.card.cmp(&b.card)));

    println!("{}", Table::new(rows));
    Ok(())
}

pub fn lang(ctx: &Context, code: Option<String>) -> Result<()> {
    let prefs = &ctx.library()?.preferences;

    if let Some(code) = code {
        let language: Language = code.parse()?;
        if !prefs.set_language(language) {
            bail!("Failed to save language");
        }
        if !ctx.json {
            println!("{} Language set to {}", "✓".green(), language);
        }
    }

    let language = prefs.language();
    if ctx.json {
        println!("{}", serde_json::json!({ "language": language }));
    } else {
        println!("{}", language);
    }

    Ok(())
}

/// Show current configuration
pub fn config_show(ctx: &Context) -> Result<()> {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&ctx.config)?);
    } else {
        println!("{}", "Current configuration:".bold());
        println!();
        println!("data_file = \"{}\"", ctx.data_file.display());
        println!();
        println!("[display]");
        println!("colors = {}", ctx.config.display.colors);
        println!("show_rates = {}", ctx.config.display.show_rates);
    }

    Ok(())
}

pub fn config_path(ctx: &Context) -> Result<()> {
    println!("{}", ctx.config_path.display());
    Ok(())
}

/// Reset configuration to defaults
pub fn config_reset(ctx: &Context) -> Result<()> {
    if let Some(parent) = ctx.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&ctx.config_path, Config::default_with_comments())?;

    println!("{} Configuration reset to defaults", "✓".green());
    Ok(())
}
