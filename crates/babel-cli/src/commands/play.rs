//! The `babel play` command.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use babel_core::catalog::Catalog;
use babel_core::session::{Outcome, QuizSession, XP_REWARD};
use babel_core::speech::pronounce;
use babel_core::traits::{LabelStore, SpeechSynthesizer};
use babel_sources::config::{create_loader, create_synthesizer, load_config_from};

use super::load_catalog;

const HELP: &str = "Answer with 1-4 or the option text. Other commands: \
`lang <name>` switch language, `lang` list languages, `say` save pronunciation, `q` quit.";

pub async fn execute(
    language: Option<String>,
    seed: Option<u64>,
    audio_out: PathBuf,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let loader = match seed {
        Some(seed) => create_loader(&config)?.with_rng_seed(seed),
        None => create_loader(&config)?,
    };
    let synth = create_synthesizer(&config.speech);
    let labels = &config.labels;

    let mut catalog = load_catalog(&loader).await?;

    let start = language.as_deref().unwrap_or(&config.default_language);
    let mut session = match seed {
        Some(seed) => QuizSession::with_seed(&catalog, start, seed)?,
        None => QuizSession::new(&catalog, start)?,
    };
    session.set_tier(config.tier);

    match &language {
        Some(requested) => session.select_language(&catalog, requested)?,
        None => session.next_question(&catalog)?,
    }

    tracing::info!(session = %session.id(), "quiz started in {}", session.selected_language());

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        print_card(&session, labels);
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        match input {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "help" | "?" => println!("{HELP}"),
            "lang" => {
                let names: Vec<&str> = catalog.languages().collect();
                println!("Languages: {}", names.join(", "));
            }
            "say" => say(&session, synth.as_deref(), &audio_out).await,
            _ if input.starts_with("lang ") => {
                let name = input["lang ".len()..].trim();
                if let Err(e) = session.select_language(&catalog, name) {
                    println!("{e}");
                }
            }
            _ => {
                let choice = resolve_choice(&session, input);
                match session.submit_answer(&choice)? {
                    Outcome::Correct { .. } => {
                        println!(
                            "{}",
                            labels.label_or("correct", &format!("Correct! +{XP_REWARD} XP"))
                        );
                        catalog = refresh(&loader, catalog).await;
                        if let Err(e) = session.next_question(&catalog) {
                            tracing::warn!("{e}, switching language");
                            let first = catalog.languages().next().unwrap_or_default().to_string();
                            session.select_language(&catalog, &first)?;
                        }
                    }
                    Outcome::Incorrect => {
                        println!(
                            "{}",
                            labels.label_or("incorrect", "Incorrect. Try again!")
                        );
                    }
                }
            }
        }
    }

    println!();
    println!("Final XP: {} ({})", session.xp(), session.rank());
    if session.is_restricted() {
        println!(
            "{}",
            labels.label_or(
                "free_tier_notice",
                "You are on the Free Tier. (Limited to 20 daily words)."
            )
        );
    }

    Ok(())
}

/// Map an option number to its text; anything else is taken verbatim.
fn resolve_choice(session: &QuizSession, input: &str) -> String {
    let Some(question) = session.current_question() else {
        return input.to_string();
    };
    match input.parse::<usize>() {
        Ok(n) if (1..=question.options().len()).contains(&n) => question.options()[n - 1].clone(),
        _ => input.to_string(),
    }
}

/// Keep the current catalog unless a fresh one is available.
async fn refresh(
    loader: &babel_core::CatalogLoader,
    current: std::sync::Arc<Catalog>,
) -> std::sync::Arc<Catalog> {
    match loader.get_catalog().await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("catalog refresh failed, keeping previous catalog: {e}");
            current
        }
    }
}

async fn say(session: &QuizSession, synth: Option<&dyn SpeechSynthesizer>, out: &Path) {
    let (Some(synth), Some(question)) = (synth, session.current_question()) else {
        println!("Speech is disabled.");
        return;
    };

    match pronounce(synth, question).await {
        Ok(Some(audio)) => match std::fs::write(out, audio)
            .with_context(|| format!("failed to write {}", out.display()))
        {
            Ok(()) => println!("Saved pronunciation to {}", out.display()),
            Err(e) => println!("{e:#}"),
        },
        Ok(None) => println!("No audio available for this word."),
        Err(e) => println!("Pronunciation unavailable: {e}"),
    }
}

fn print_card(session: &QuizSession, labels: &impl LabelStore) {
    let progress = session.level_progress() as usize;
    let filled = progress / 10;
    println!();
    println!(
        "Streak: {}   XP: {}   Rank: {}   [{}{}] {}%",
        session.streak(),
        session.xp(),
        session.rank(),
        "#".repeat(filled),
        "-".repeat(10 - filled),
        progress
    );
    println!("Language: {}", session.selected_language());

    let Some(question) = session.current_question() else {
        return;
    };
    println!();
    println!("    {}", question.prompt());
    if let Some(script) = question.script() {
        println!("    {script}");
    }
    if let Some(phonetic) = question.phonetic() {
        println!("    [{phonetic}]");
    }
    println!(
        "    {}",
        labels.label_or("question", "What does this mean?")
    );
    println!();
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }
}
