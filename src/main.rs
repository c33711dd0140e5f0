use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use doc_qa::config::Config;
use doc_qa::ingest::run_ingest;
use doc_qa::qa::Session;
use doc_qa::state::AppState;

#[derive(Parser)]
#[command(name = "doc-qa", version, about = "Ask questions about a PDF document")]
struct Cli {
    /// PDF to ingest
    #[arg(long, global = true)]
    pdf: Option<PathBuf>,

    /// Directory holding the vector index
    #[arg(long, global = true)]
    index_dir: Option<PathBuf>,

    /// Chunks retrieved per question
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// Web UI bind address
    #[arg(long, global = true)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the vector index from the PDF
    Ingest,
    /// Chat about the document in the terminal
    Chat {
        /// Serve the web chat UI instead
        #[arg(long)]
        ui: bool,
    },
    /// Answer a single question and exit
    Ask {
        #[arg(required = true)]
        question: Vec<String>,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::from_env();
        if let Some(pdf) = &self.pdf {
            config.pdf_path = pdf.clone();
        }
        if let Some(dir) = &self.index_dir {
            config.index_dir = dir.clone();
        }
        if let Some(k) = self.top_k {
            config.top_k = k;
        }
        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    config.validate()?;
    tracing::info!("Index directory: {}", config.index_dir.display());

    match cli.command {
        Command::Ingest => {
            let client = doc_qa::llm::http_client()?;
            let report = run_ingest(&config, &client).await?;
            println!(
                "Indexed {} chunks from {} pages ({}-dim)",
                report.chunks, report.pages, report.dim
            );
            println!("- {}", report.index_file.display());
            println!("- {}", report.meta_file.display());
        }
        Command::Chat { ui } => {
            let state = AppState::load(config)?;
            if ui {
                doc_qa::api::serve(state).await?;
            } else {
                doc_qa::repl::run(&state.engine).await?;
            }
        }
        Command::Ask { question } => {
            let state = AppState::load(config)?;
            let answer = Session::new()
                .ask(&state.engine, &question.join(" "))
                .await?;
            println!("{}", answer.text);
        }
    }

    Ok(())
}
