//! CLI subcommand handlers

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use athena::{
    intent::CategoryScore, Assistant, AthenaConfig, ClassificationResult, Collaborators,
    ConversationContext, StopOutcome, TimeEvent, TokioTimeKeeper,
};
use colored::Colorize;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::info;

use crate::{
    apps::ProcessLauncher,
    audio::SoftwareMixer,
    config,
    console::{ConsoleInput, ConsoleOutput},
    output::OutputHandler,
    power::PlatformPower,
    web::DuckDuckGoProvider,
};

/// Switches that decide which collaborators are real
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    pub allow_power: bool,
}

fn collaborators(
    config: &AthenaConfig,
    options: RuntimeOptions,
) -> Result<(Collaborators, mpsc::UnboundedReceiver<TimeEvent>)> {
    let (timekeeper, events) = TokioTimeKeeper::new()?;
    let collaborators = Collaborators {
        apps: Arc::new(ProcessLauncher),
        volume: Arc::new(SoftwareMixer::default()),
        web: Arc::new(DuckDuckGoProvider::new(&config.web)?),
        timekeeper: Arc::new(timekeeper),
        power: Arc::new(PlatformPower::new(options.allow_power)),
    };
    Ok((collaborators, events))
}

fn build_assistant(
    config: &AthenaConfig,
    options: RuntimeOptions,
    input: Arc<ConsoleInput>,
) -> Result<(Arc<Assistant>, mpsc::UnboundedReceiver<TimeEvent>)> {
    let lexicon = athena::load_lexicon(&config.lexicon)?;
    let (collaborators, events) = collaborators(config, options)?;
    let output = Arc::new(ConsoleOutput::new(OutputHandler::new()));
    let assistant =
        athena::initialize_assistant(config, lexicon, collaborators, input, output)?;
    Ok((Arc::new(assistant), events))
}

/// Interactive session: typed lines go through the full listen loop until
/// the input closes or Ctrl-C.
pub async fn listen(config: &AthenaConfig, options: RuntimeOptions) -> Result<()> {
    let output = OutputHandler::new();
    let input = Arc::new(ConsoleInput::spawn().context("Failed to start console input")?);
    let (assistant, events) = build_assistant(config, options, input.clone())?;

    let wake_word = config
        .listener
        .require_wake_word
        .then_some(config.listener.wake_word.as_str());
    output.print_banner(wake_word);

    let announcer = assistant.spawn_event_announcer(events);
    assistant.start().await?;

    tokio::select! {
        _ = input.closed() => {}
        _ = tokio::signal::ctrl_c() => println!(),
    }

    match assistant.stop().await {
        StopOutcome::TimedOut => output.print_info("Still finishing the last command..."),
        StopOutcome::Stopped | StopOutcome::NotRunning => {}
    }
    announcer.abort();
    output.print_info("Goodbye!");
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyReport<'a> {
    text: &'a str,
    result: ClassificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<Vec<CategoryScore>>,
}

/// Classify one utterance and print the result as JSON, or as a table with
/// `table`.
pub fn classify(config: &AthenaConfig, text: &str, explain: bool, table: bool) -> Result<()> {
    let lexicon = athena::load_lexicon(&config.lexicon)?;
    let classifier = athena::build_classifier(config, lexicon)?;

    let mut context = ConversationContext::new();
    let scores = explain.then(|| classifier.explain(text, &context));
    let result = classifier.classify(text, &mut context);
    info!(category = %result.category, confidence = result.confidence, "Classified");

    if table {
        let output = OutputHandler::new();
        output.print_header("Classification");
        output.print_classification(text, &result);
        if let Some(scores) = &scores {
            output.print_scores_table(scores, config.classifier.acceptance_threshold);
        }
    } else {
        let report = ClassifyReport {
            text,
            result,
            scores,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Classify and route one utterance, printing the replies it produces.
pub async fn route(config: &AthenaConfig, options: RuntimeOptions, text: &str) -> Result<()> {
    let input = Arc::new(ConsoleInput::detached());
    let (assistant, _events) = build_assistant(config, options, input)?;

    let outcome = assistant.process_command(text).await;
    let output = OutputHandler::new();
    println!("  {} {}", "Category:".dimmed(), outcome.category.bright_white().bold());
    for reply in &outcome.replies {
        output.print_reply(reply);
    }
    Ok(())
}

/// List the registered categories in matching order
pub fn list_categories(config: &AthenaConfig) -> Result<()> {
    let lexicon = athena::load_lexicon(&config.lexicon)?;
    let classifier = athena::build_classifier(config, lexicon)?;
    let output = OutputHandler::new();

    output.print_header("Categories");
    println!(
        "{}",
        format!(
            "{:<16} {:>9} {:>9} {:>9}  {}",
            "Category", "Patterns", "Keywords", "Groups", "Handler"
        )
        .bright_white()
        .bold()
    );
    println!("{}", "─".repeat(70).dimmed());
    for category in classifier.registry().iter() {
        let handler = category
            .handler()
            .map(|kind| format!("{kind:?}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<16} {:>9} {:>9} {:>9}  {}",
            category.id().bright_cyan(),
            category.patterns().len(),
            category.keywords().len(),
            category.synonym_groups().len(),
            handler.dimmed()
        );
    }
    println!();
    Ok(())
}

/// Show the effective configuration and where it came from
pub fn show_config(config: &AthenaConfig, source: Option<&Path>) -> Result<()> {
    let output = OutputHandler::new();
    output.print_header("Configuration");
    match source {
        Some(path) => println!("  {} {}", "File:".dimmed(), path.display()),
        None => println!(
            "  {} none (create {})",
            "File:".dimmed(),
            config::user_config_path().display()
        ),
    }
    println!();
    print!("{}", config::render(config)?);
    Ok(())
}
