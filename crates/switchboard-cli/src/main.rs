use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use cliclack::spinner;
use console::style;

use switchboard::assistants::{AssistantsClient, AssistantsConfig};
use switchboard::driver::{PollPolicy, RunDriver};
use switchboard::retrieval::{EmbeddingsClient, EmbeddingsConfig, SearchClient, SearchConfig};
use switchboard::toolbox::currency::{ExchangeConfig, UsdToGbp};
use switchboard::toolbox::customer::CustomerLookup;
use switchboard::toolbox::knowledge::KnowledgeBase;
use switchboard::toolbox::market::{QuoteConfig, StockPrice};
use switchboard::toolbox::news::{CompanyNews, NewsConfig};
use switchboard::toolbox::promotions::PromotionsLookup;
use switchboard::toolbox::ToolRegistry;

const PROMPT: &str = "\x1b[1m\x1b[92mquestion> \x1b[0m";

const CONCIERGE_DEFAULT_QUESTION: &str = "Can you please provide me customer information for phone number 123-456-7890, \
     promotions available for the same customer, \
     and whether the customer needs to qualify an address for 5G service?";

const ANALYST_DEFAULT_QUESTION: &str =
    "Can you please provide me the stock price, the stock price in GBP, \
     and the latest company news of Microsoft?";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Assistant profile to run
    #[arg(short, long, default_value = "concierge")]
    #[arg(value_enum)]
    assistant: AssistantVariant,

    /// Model deployment (overrides AZURE_OPENAI_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Seconds between run status polls
    #[arg(long, default_value_t = 5)]
    poll_interval: u64,

    /// Give up after this many status polls (default: poll forever)
    #[arg(long)]
    max_polls: Option<u32>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum AssistantVariant {
    /// Customer lookup, promotions, and knowledge-base retrieval
    Concierge,
    /// Stock price, company news, and currency conversion
    Analyst,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = AssistantsConfig::from_env()?;
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }

    let registry = build_registry(cli.assistant)?;
    let policy = PollPolicy::new(Duration::from_secs(cli.poll_interval), cli.max_polls);
    let client = AssistantsClient::new(config)?;

    let driver = match cli.assistant {
        AssistantVariant::Concierge => RunDriver::new(Box::new(client), registry, policy)
            .with_persona(
                "Call Center Chat Assistant",
                "You are a personal Chat Assistant",
            ),
        AssistantVariant::Analyst => RunDriver::new(Box::new(client), registry, policy)
            .with_persona(
                "Data Analyst Assistant",
                "You are a personal Data Analyst Assistant",
            ),
    };

    let default_question = match cli.assistant {
        AssistantVariant::Concierge => CONCIERGE_DEFAULT_QUESTION,
        AssistantVariant::Analyst => ANALYST_DEFAULT_QUESTION,
    };

    println!(
        "switchboard {}",
        style("- type \"exit\" to end the session").dim()
    );
    println!();

    let mut editor = rustyline::DefaultEditor::new()?;
    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        };

        let mut question = line.trim().to_string();
        if question.is_empty() {
            println!("Using the default question:");
            println!("{}", default_question);
            question = default_question.to_string();
        }
        if question.eq_ignore_ascii_case("exit") {
            break;
        }

        let spin = spinner();
        spin.start("awaiting reply");
        let outcome = driver.ask(&question).await;
        spin.stop("");

        match outcome {
            Ok(answer) => {
                render(&answer);
                println!();
            }
            // Keep the session alive; the next question starts fresh.
            Err(e) => eprintln!("{} {}", style("error:").red().bold(), e),
        }
    }
    println!("Goodbye!");
    Ok(())
}

fn build_registry(variant: AssistantVariant) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    match variant {
        AssistantVariant::Concierge => {
            registry.register(Box::new(CustomerLookup))?;
            registry.register(Box::new(PromotionsLookup))?;

            let search_config = SearchConfig::from_env()?;
            let embeddings = if search_config.query_kind.needs_vectors() {
                Some(EmbeddingsClient::new(EmbeddingsConfig::from_env()?)?)
            } else {
                None
            };
            let search = SearchClient::new(search_config, embeddings)?;
            registry.register(Box::new(KnowledgeBase::new(search)))?;
        }
        AssistantVariant::Analyst => {
            registry.register(Box::new(StockPrice::new(QuoteConfig::default())?))?;
            registry.register(Box::new(CompanyNews::new(NewsConfig::from_env()?)?))?;
            registry.register(Box::new(UsdToGbp::new(ExchangeConfig::default())?))?;
        }
    }
    Ok(registry)
}

fn render(content: &str) {
    bat::PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print()
        .unwrap();
}
