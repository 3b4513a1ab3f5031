//! Command-line front end: load one policy document and answer questions
//!
//! Run with: cargo run -p policy-rag -- handbook.pdf -q "How many vacation days?"

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use policy_rag::config::GeneratorBackend;
use policy_rag::{AnswerResult, Error, PolicyRag, RagConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Ask questions about a policy document
#[derive(Parser, Debug)]
#[command(name = "policy-rag", version, about)]
struct Cli {
    /// PDF or plain-text policy document
    document: PathBuf,

    /// Question to ask; repeatable. Reads questions from stdin when omitted.
    #[arg(short, long = "question")]
    questions: Vec<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of passages to retrieve per question
    #[arg(long)]
    top_k: Option<usize>,

    /// Generator backend
    #[arg(long, value_enum)]
    generator: Option<GeneratorArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GeneratorArg {
    Ollama,
    Gemini,
}

impl From<GeneratorArg> for GeneratorBackend {
    fn from(arg: GeneratorArg) -> Self {
        match arg {
            GeneratorArg::Ollama => GeneratorBackend::Ollama,
            GeneratorArg::Gemini => GeneratorBackend::Gemini,
        }
    }
}

impl Cli {
    fn load_config(&self) -> policy_rag::Result<RagConfig> {
        let mut config = match &self.config {
            Some(path) => RagConfig::from_toml_file(path)?,
            None => RagConfig::default(),
        };
        config.apply_env_overrides();

        if let Some(top_k) = self.top_k {
            config.retrieval.top_k = top_k;
        }
        if let Some(generator) = self.generator {
            config.llm.backend = generator.into();
        }

        config.validate()?;
        Ok(config)
    }
}

fn print_answer(result: &AnswerResult) {
    println!("\n{}\n", result.answer.trim());
    if !result.citations.is_empty() {
        println!("Sources:\n{}", result.format_sources());
    }
    if !result.relevant_pages.is_empty() {
        let pages: Vec<String> = result.relevant_pages.iter().map(u32::to_string).collect();
        println!("Relevant pages: {}", pages.join(", "));
    }
}

async fn answer(rag: &PolicyRag, question: &str) {
    match rag.ask(question).await {
        Ok(result) => print_answer(&result),
        Err(e) => report(&e),
    }
}

fn report(error: &Error) {
    tracing::error!(kind = error.kind(), "{}", error);
    eprintln!("{}", error.user_message());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "policy_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Generator: {:?}", config.llm.backend);
    tracing::info!("  - Embeddings: {:?}", config.embeddings.backend);
    tracing::info!("  - Compression: {:?}", config.compression.mode);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Top k: {}", config.retrieval.top_k);

    let rag = PolicyRag::from_config(config).await?;

    match rag.load_document(&cli.document).await {
        Ok(summary) => println!(
            "Loaded {} ({} pages, {} passages)",
            summary.filename, summary.page_count, summary.passage_count
        ),
        Err(e) => {
            report(&e);
            return Err(e.into());
        }
    }

    if !cli.questions.is_empty() {
        for question in &cli.questions {
            println!("\nQ: {}", question);
            answer(&rag, question).await;
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"\nquestion> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit") {
            break;
        }
        answer(&rag, question).await;
    }

    Ok(())
}
