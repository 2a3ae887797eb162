//! Folio AI CLI - article analysis service
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use folio_ai::{
    logging, server, AnalyzeRequest, AnalyzeResult, Analyzer, Catalog, ChatCompletionClient,
    Config,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "folio-ai")]
#[command(author, version, about = "Article analysis via an LLM chat-completion API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve {
        /// Listen host, overrides config
        #[arg(long)]
        host: Option<String>,
        /// Listen port, overrides config
        #[arg(long)]
        port: Option<u16>,
    },
    /// Analyze one article read from a file, or stdin with "-"
    Analyze {
        /// Path to the article body
        path: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "cli")]
        source: String,
        #[arg(long, default_value = "")]
        author: String,
        /// Print the raw JSON result
        #[arg(long)]
        json: bool,
    },
    /// List the category catalog
    Categories,
    /// Print the JSON Schema of the analysis result
    Schema,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => serve(None, None).await?,
        Some(Commands::Serve { host, port }) => serve(host, port).await?,
        Some(Commands::Analyze {
            path,
            title,
            source,
            author,
            json,
        }) => {
            let config = Config::load()?;
            logging::init_logging(&config.logging.level, &config.logging.format);

            let content = read_article(&path)?;
            let request = AnalyzeRequest::new(title, content, source, author);

            let client = ChatCompletionClient::new(&config.llm, config.api_key()?)?;
            let analyzer = Analyzer::new(client, Catalog::builtin());
            let result = analyzer.analyze(&request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_result(&result);
            }
        }
        Some(Commands::Categories) => {
            for c in Catalog::builtin().entries() {
                println!("{:<10} {}  {}", c.slug.bold(), c.name_local, c.name_en.dimmed());
            }
        }
        Some(Commands::Schema) => {
            let schema = schemars::schema_for!(AnalyzeResult);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "folio-ai", &mut std::io::stdout());
        }
    }

    Ok(())
}

async fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    logging::init_logging(&config.logging.level, &config.logging.format);

    let client = ChatCompletionClient::new(&config.llm, config.api_key()?)?;
    tracing::info!(endpoint = client.endpoint(), model = client.model(), "completion client ready");

    let analyzer: server::SharedAnalyzer = Arc::new(Analyzer::new(client, Catalog::builtin()));
    server::serve(&config.bind_addr(), analyzer).await?;
    Ok(())
}

fn read_article(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
    }
}

fn print_result(result: &AnalyzeResult) {
    println!(
        "{} {} ({:.2}, {})\n",
        "Category:".bold(),
        result.category_name.green(),
        result.confidence,
        result.language
    );

    if !result.summary.is_empty() {
        println!("💡 Summary:");
        println!("  {}\n", result.summary);
    }

    println!("📌 Key Points:");
    for point in &result.key_points {
        println!("  • {}", point);
    }

    println!("\n🏷️  Tags:");
    println!("  {}", result.tags.join(", "));
}
