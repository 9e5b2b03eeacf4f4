use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, IsTerminal, Read};

use yamlscout::document::parse_document;
use yamlscout::path::{compile, evaluate};

/// yamlscout - query YAML documents with path expressions
#[derive(Parser)]
#[command(name = "yamlscout")]
#[command(version)]
#[command(about = "Query YAML documents with path expressions", long_about = None)]
struct Cli {
    /// Path expression to evaluate, e.g. /spec/containers/0/name
    expression: String,

    /// YAML file to query (omit to read from piped stdin)
    file: Option<String>,

    /// Print only the number of matches
    #[arg(short, long)]
    count: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let source = match &cli.file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?
        }
        None => {
            if io::stdin().is_terminal() {
                bail!("no input file given and stdin is not piped");
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let doc = parse_document(&source)?;
    let expr = compile(&cli.expression)
        .with_context(|| format!("failed to compile path expression '{}'", cli.expression))?;

    let Some(root) = doc.root() else {
        if cli.count {
            println!("0");
        }
        return Ok(());
    };
    let results = evaluate(&expr, &doc, root);

    if cli.count {
        println!("{}", results.len());
        return Ok(());
    }

    for (i, id) in results.iter().enumerate() {
        if i > 0 {
            println!("---");
        }
        print!("{}", doc.to_yaml_string(id)?);
    }

    Ok(())
}
