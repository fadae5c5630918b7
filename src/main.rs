use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Parser;

use tinyre::Regex;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search for a pattern, grep-style", long_about = None)]
struct Args {
    /// Pattern to search for
    pattern: String,

    /// File to search; stdin when omitted
    #[arg(value_name = "FILE")]
    file: Option<String>,

    /// Print the total number of matches instead of the matching lines
    #[arg(short = 'c', long)]
    count: bool,

    /// Print the compiled program before searching
    #[arg(short = 'p', long)]
    print_program: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let regex: Regex = tinyre::compile(&args.pattern)
        .with_context(|| format!("invalid pattern {:?}", args.pattern))?;
    if args.print_program {
        println!("{regex}");
    }

    let input = match &args.file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).context("failed to read stdin")?;
            buffer
        }
    };

    if args.count {
        let total: usize = input.lines().map(|line| regex.count_matches(line)).sum();
        println!("{total}");
    } else {
        for line in input.lines() {
            if regex.find(line).is_some() {
                println!("{line}");
            }
        }
    }
    Ok(())
}
