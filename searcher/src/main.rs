use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use termidx::ingest::load_path;
use termidx::permuterm::unrotate;
use termidx::{build_index, DocId, Index, IndexVariant, QueryRunner, SearchConfig, TrieKind};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Boolean and wildcard term search over a document collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a one-term query, or a two-term AND query
    Query {
        #[command(flatten)]
        source: Source,
        /// Query terms; `*` wildcards need the permuterm index
        #[arg(required = true, num_args = 1..=2)]
        terms: Vec<String>,
    },
    /// Show the dictionary entries a term matches and their posting lists
    Lookup {
        #[command(flatten)]
        source: Source,
        term: String,
    },
    /// Print a single document
    Show {
        #[command(flatten)]
        source: Source,
        id: DocId,
    },
}

#[derive(Args)]
struct Source {
    /// Input path (file or directory)
    #[arg(long)]
    input: String,
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<String>,
    #[arg(long, value_enum)]
    variant: Option<Variant>,
    /// Trie backing the permuterm index
    #[arg(long, value_enum)]
    trie: Option<Trie>,
    /// Field delimiter of delimited files (`\t` or `tab` for a tab)
    #[arg(long, value_parser = parse_delimiter)]
    delimiter: Option<char>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Variant {
    Inverted,
    Permuterm,
}

#[derive(Clone, Copy, ValueEnum)]
enum Trie {
    Compact,
    Simple,
}

fn parse_delimiter(s: &str) -> Result<char, String> {
    match s {
        "\\t" | "tab" => Ok('\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("delimiter must be a single character, got {s:?}")),
            }
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Query { source, terms } => {
            let index = open_index(&source)?;
            let (label, hits) = run_query(index.as_ref(), &terms)?;
            print_query_result(index.as_ref(), &label, &hits)
        }
        Commands::Lookup { source, term } => {
            let index = open_index(&source)?;
            let matches = index.lookup(&term)?;
            println!("'{term}' matched {} dictionary entries", matches.len());
            for m in matches {
                let ids: Vec<String> = m.postings.iter().map(|id| id.to_string()).collect();
                println!("{} ({}): {}", unrotate(&m.term), m.term, ids.join(", "));
            }
            Ok(())
        }
        Commands::Show { source, id } => {
            let index = open_index(&source)?;
            let doc = index.document(id).with_context(|| format!("showing document {id}"))?;
            println!("{}", doc.title);
            if let Some(url) = &doc.source {
                println!("{url}");
            }
            if let Some(date) = &doc.date {
                println!("{date}");
            }
            println!();
            println!("{}", doc.text);
            Ok(())
        }
    }
}

fn open_index(source: &Source) -> Result<Box<dyn Index>> {
    let mut config = match &source.config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    if let Some(variant) = source.variant {
        config.variant = match variant {
            Variant::Inverted => IndexVariant::Inverted,
            Variant::Permuterm => IndexVariant::Permuterm,
        };
    }
    if let Some(trie) = source.trie {
        config.trie = match trie {
            Trie::Compact => TrieKind::Compact,
            Trie::Simple => TrieKind::Simple,
        };
    }
    if let Some(delimiter) = source.delimiter {
        config.delimiter = delimiter;
    }

    let docs = load_path(&source.input, config.delimiter)?;
    let index = build_index(docs, &config).context("building index")?;
    tracing::info!(
        input = %source.input,
        variant = ?config.variant,
        trie = ?config.trie,
        "index ready"
    );
    Ok(index)
}

/// One term is a plain query, two are ANDed.
fn run_query(index: &dyn Index, terms: &[String]) -> Result<(String, Vec<DocId>)> {
    let runner = QueryRunner::new(index);
    match terms {
        [first, second, ..] => Ok((format!("{first} AND {second}"), runner.query_and(first, second)?)),
        [term] => Ok((term.clone(), runner.query(term)?)),
        [] => anyhow::bail!("no query terms given"),
    }
}

fn print_query_result(index: &dyn Index, query: &str, hits: &[DocId]) -> Result<()> {
    let ids: Vec<String> = hits.iter().map(|id| id.to_string()).collect();
    println!("Query '{query}' returned {} results: {}", hits.len(), ids.join(", "));
    for &id in hits {
        let doc = index.document(id)?;
        println!("---------------------- Document {id} ----------------------");
        println!("{}", doc.title);
        println!("----------------------------------------------------------");
        println!("{}", doc.text);
        println!("------------------ End of Document {id} -------------------");
        println!();
    }
    Ok(())
}
