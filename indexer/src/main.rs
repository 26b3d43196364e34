use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fts_core::scan::{scan_contains, scan_regex};
use fts_core::{load_documents, DocId, Document, EngineConfig, Language, RebuildPolicy, SearchEngine};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "fts")]
#[command(about = "Build and query a boolean full-text index", long_about = None)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Corpus file (.xml, .json, .jsonl) or directory
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,
    /// Index directory path
    #[arg(long, global = true)]
    index: Option<PathBuf>,
    /// Stemmer and stopword language
    #[arg(long, global = true)]
    language: Option<Language>,
    /// if-missing, if-stale or always
    #[arg(long, global = true)]
    rebuild: Option<RebuildPolicy>,
    /// Partitions for a parallel index build
    #[arg(long, global = true)]
    threads: Option<usize>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from the corpus, replacing any existing one
    Build,
    /// Run one query and print matching titles
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Interactive query prompt (default)
    Repl,
    /// Scan raw document text without the index
    Scan {
        #[arg(long, value_enum, default_value_t = ScanMode::Contains)]
        mode: ScanMode,
        pattern: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScanMode {
    /// Case-sensitive substring
    Contains,
    /// Case-insensitive whole-word regular expression
    Regex,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Build => {
            let docs = load_corpus(&config)?;
            let engine = SearchEngine::build(&config, &docs)?;
            let meta = engine.meta();
            println!("indexed {} documents, {} terms -> {}", meta.num_docs, meta.num_terms, config.index_dir.display());
        }
        Commands::Search { query } => {
            let engine = open_engine(&config)?;
            let ids = engine.search(&query.join(" "))?;
            print_results(&mut io::stdout().lock(), &engine, &ids)?;
        }
        Commands::Repl => {
            let engine = open_engine(&config)?;
            repl(&engine)?;
        }
        Commands::Scan { mode, pattern } => {
            let docs = load_corpus(&config)?;
            let ids = match mode {
                ScanMode::Contains => scan_contains(&docs, &pattern),
                ScanMode::Regex => scan_regex(&docs, &pattern)?,
            };
            let mut out = io::stdout().lock();
            for &id in &ids {
                writeln!(out, "{}", docs[id as usize].title)?;
            }
            writeln!(out, "Result: {} pages found", ids.len())?;
        }
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(corpus) = &cli.corpus { config.corpus = corpus.clone(); }
    if let Some(index) = &cli.index { config.index_dir = index.clone(); }
    if let Some(language) = cli.language { config.analyzer.language = language; }
    if let Some(rebuild) = cli.rebuild { config.rebuild = rebuild; }
    if let Some(threads) = cli.threads { config.build_threads = threads; }
    Ok(config)
}

fn load_corpus(config: &EngineConfig) -> Result<Vec<Document>> {
    load_documents(&config.corpus).with_context(|| format!("loading corpus {}", config.corpus.display()))
}

/// A corpus that fails to load is fatal unless an index already exists to
/// serve from.
fn open_engine(config: &EngineConfig) -> Result<SearchEngine> {
    match load_documents(&config.corpus) {
        Ok(docs) => Ok(SearchEngine::open(config, Some(&docs))?),
        Err(err) => {
            tracing::warn!(error = %err, "corpus unavailable");
            SearchEngine::open(config, None).with_context(|| format!("loading corpus {}", config.corpus.display()))
        }
    }
}

fn repl(engine: &SearchEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();
    let mut line = String::new();
    loop {
        write!(out, "Enter your query: ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        match engine.search(&line) {
            Ok(ids) => print_results(&mut out, engine, &ids)?,
            Err(err) => {
                tracing::error!(error = %err, "query failed");
                writeln!(out, "query failed: {err}")?;
            }
        }
    }
}

fn print_results<W: Write>(out: &mut W, engine: &SearchEngine, ids: &[DocId]) -> io::Result<()> {
    for &id in ids {
        match engine.doc(id) {
            Some(doc) => writeln!(out, "{}", doc.title)?,
            None => writeln!(out, "#{id}")?,
        }
    }
    writeln!(out, "Result: {} pages found", ids.len())
}
