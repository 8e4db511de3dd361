//! Wallaby CLI
//!
//! A headless driver for testing and debugging: parses a file or an
//! inline string and prints the node tree and any recovered issues.

use anyhow::Result;
use owo_colors::OwoColorize;
use std::env;
use std::fs;
use wallaby_markup::{Dialect, parse_document};

fn usage() -> ! {
    eprintln!("Usage: wallaby <file.html|file.xml> [--base <uri>]");
    eprintln!("       wallaby --html '<p>...</p>' [--base <uri>]");
    eprintln!("       wallaby --xml '<doc>...</doc>' [--base <uri>]");
    std::process::exit(1)
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let mut input: Option<String> = None;
    let mut dialect = Dialect::Html;
    let mut base: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            flag @ ("--html" | "--xml") => {
                let Some(markup) = args.get(i + 1) else {
                    eprintln!("Error: {flag} requires a markup string argument");
                    usage();
                };
                dialect = if flag == "--xml" {
                    Dialect::Xml
                } else {
                    Dialect::Html
                };
                input = Some(markup.clone());
                i += 2;
            }
            "--base" => {
                let Some(uri) = args.get(i + 1) else {
                    eprintln!("Error: --base requires a URI argument");
                    usage();
                };
                base = Some(uri.clone());
                i += 2;
            }
            path => {
                if path.ends_with(".xml") {
                    dialect = Dialect::Xml;
                }
                input = Some(fs::read_to_string(path)?);
                i += 1;
            }
        }
    }

    let Some(input) = input else { usage() };
    let result = parse_document(&input, base.as_deref(), dialect);

    println!("=== Node Tree ({dialect}) ===");
    print!("{}", result.tree.outline(result.tree.root()));

    println!("\n=== Issues ===");
    if result.issues.is_empty() {
        println!("none");
    }
    for issue in &result.issues {
        println!(
            "{} at offset {}: {}",
            issue.kind.yellow(),
            issue.offset,
            issue.message
        );
    }

    Ok(())
}
