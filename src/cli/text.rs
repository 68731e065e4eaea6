//! `normalize` and `wer` subcommands.

use anyhow::{Context, Result};
use std::io::{self, BufRead};

use crate::cli::{NormalizeCliArgs, WerCliArgs};
use crate::normalizer::Normalizer;
use crate::wer::{format_wer_percentage, measures};

pub fn handle_normalize_command(args: NormalizeCliArgs) -> Result<()> {
    let normalizer = Normalizer::create(args.normalizer)?;

    if !args.text.is_empty() {
        println!("{}", normalizer.run(&args.text.join(" ")));
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        println!("{}", normalizer.run(&line));
    }
    Ok(())
}

pub fn handle_wer_command(args: WerCliArgs) -> Result<()> {
    let hypothesis = match args.normalizer {
        Some(kind) => Normalizer::create(kind)?.run(&args.hypothesis),
        None => args.hypothesis,
    };
    let result = measures(&args.reference, &hypothesis);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("Reference:     {}", args.reference);
    println!("Hypothesis:    {}", hypothesis);
    println!("WER:           {}", format_wer_percentage(result.wer()));
    println!(
        "Errors:        {} substitutions, {} deletions, {} insertions",
        result.substitutions, result.deletions, result.insertions
    );
    println!("Correct words: {}/{}", result.hits, result.reference_words);
    Ok(())
}
