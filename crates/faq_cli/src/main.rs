mod chat;
mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use faq_engine::{
    evaluate_cases, load_curated, load_eval_cases, recover_interactions, FaqEngine,
    JsonFileStore, MemoryStore, Normalizer,
};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

fn open_engine(cli: &Cli) -> Result<FaqEngine> {
    let config = cli.engine_config();

    let engine = if cli.no_persist {
        let curated = load_curated(&config.faqs_path);
        // start from the persisted log, but never write back to it
        let learned = recover_interactions(&JsonFileStore::new(&config.interactions_path));
        FaqEngine::with_parts(
            config,
            Normalizer::default(),
            curated,
            Box::new(MemoryStore::with_records(learned)),
        )
    } else {
        FaqEngine::open(config)
    };
    engine.context("open faq engine")
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut engine = open_engine(&cli)?;
    tracing::debug!(
        curated = engine.curated().len(),
        interactions = engine.interactions().len(),
        vocabulary = engine.model().vocabulary_len(),
        persist = !cli.no_persist,
        "engine ready"
    );

    match cli.command.clone().unwrap_or(Commands::Chat) {
        Commands::Chat => chat::run_chat(&mut engine)?,
        Commands::Ask { question, json } => {
            let reply = engine.respond_detailed(&question);
            output::print_reply(&reply, json)?;
        }
        Commands::Faqs => output::print_faqs(engine.curated())?,
        Commands::Eval {
            cases,
            min_pass_rate,
        } => {
            let cases = load_eval_cases(&cases).context("load eval cases")?;
            let summary = evaluate_cases(&engine, &cases);
            output::print_eval_summary(&summary, min_pass_rate)?;

            if summary.pass_rate < min_pass_rate {
                anyhow::bail!(
                    "pass rate {:.4} below required {:.4}",
                    summary.pass_rate,
                    min_pass_rate
                );
            }
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
