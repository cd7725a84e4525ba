use std::path::PathBuf;

use clap::{Parser, Subcommand};
use faq_engine::{EngineConfig, DEFAULT_FAQS_PATH, DEFAULT_INTERACTIONS_PATH, DEFAULT_THRESHOLD};

#[derive(Debug, Parser)]
#[command(name = "faq", version, about = "Self-learning FAQ chatbot")]
pub struct Cli {
    /// JSON object mapping questions to answers. Built-in samples are used when absent.
    #[arg(long, global = true, env = "FAQ_FILE", default_value = DEFAULT_FAQS_PATH)]
    pub faqs: PathBuf,

    /// JSON list of learned interactions, rewritten after every answer.
    #[arg(
        long,
        global = true,
        env = "FAQ_INTERACTIONS_FILE",
        default_value = DEFAULT_INTERACTIONS_PATH
    )]
    pub interactions: PathBuf,

    #[arg(long, global = true, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f32,

    /// Learn in memory only; the interaction file is read but never written.
    #[arg(long, global = true)]
    pub no_persist: bool,

    // Only the negative toggle is exposed; fallbacks are learned by default.
    #[arg(
        long = "no-learn-fallbacks",
        global = true,
        default_value_t = true,
        action = clap::ArgAction::SetFalse
    )]
    pub learn_fallbacks: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Interactive session (the default).
    Chat,
    /// Answer a single question.
    Ask {
        #[arg(long)]
        question: String,
        #[arg(long)]
        json: bool,
    },
    /// List the curated questions and answers.
    Faqs,
    /// Score evaluation cases without learning from them.
    Eval {
        #[arg(long)]
        cases: PathBuf,
        #[arg(long, default_value_t = 1.0)]
        min_pass_rate: f32,
    },
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            faqs_path: self.faqs.clone(),
            interactions_path: self.interactions.clone(),
            threshold: self.threshold,
            learn_fallbacks: self.learn_fallbacks,
            ..EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["faq"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.threshold, 0.1);
        assert!(cli.learn_fallbacks);
        assert!(!cli.no_persist);

        let config = cli.engine_config();
        assert_eq!(config.faqs_path.to_str(), Some("faqs.json"));
        assert_eq!(config.interactions_path.to_str(), Some("interactions.json"));
    }

    #[test]
    fn parses_ask_with_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "faq",
            "ask",
            "--question",
            "how do I track my order",
            "--json",
            "--threshold",
            "0.3",
            "--no-learn-fallbacks",
        ])
        .expect("parse");

        match cli.command {
            Some(Commands::Ask { ref question, json }) => {
                assert_eq!(question, "how do I track my order");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.threshold, 0.3);
        assert!(!cli.learn_fallbacks);
    }

    #[test]
    fn eval_requires_cases() {
        assert!(Cli::try_parse_from(["faq", "eval"]).is_err());
        let cli = Cli::try_parse_from(["faq", "eval", "--cases", "cases.json"]).expect("parse");
        assert!(matches!(
            cli.command,
            Some(Commands::Eval { min_pass_rate, .. }) if min_pass_rate == 1.0
        ));
    }
}
