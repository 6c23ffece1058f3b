//! Command-line interface for orgbind
//! This binary is used to convert org outline documents into other formats.
//!
//! Usage:
//!   orgbind convert `<path>` [--format `<format>`] [--stringifier `<stringifier>`]
//!
//! `json` and `yaml` decode the document into a dynamically-shaped
//! value first; `html` and `org` render the parsed tree directly.

use clap::{Arg, Command};
use orgbind::decode::{Decoder, Stringifier, Value};
use orgbind::org::{parse, render};

fn main() {
    env_logger::init();

    let matches = Command::new("orgbind")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting org outline documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("convert")
                .about("Convert an org document to another format")
                .arg(
                    Arg::new("path")
                        .help("Path to the org file to convert")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format ('json', 'yaml', 'html', 'org')")
                        .default_value("json"),
                )
                .arg(
                    Arg::new("stringifier")
                        .long("stringifier")
                        .short('s')
                        .help("Leaf rendering for decoded values ('html' or 'org')")
                        .default_value("html"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("convert", convert_matches)) => {
            let path = convert_matches.get_one::<String>("path").unwrap();
            let format = convert_matches.get_one::<String>("format").unwrap();
            let stringifier = convert_matches.get_one::<String>("stringifier").unwrap();
            handle_convert_command(path, format, stringifier);
        }
        _ => unreachable!(),
    }
}

fn handle_convert_command(path: &str, format: &str, stringifier: &str) {
    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });

    let stringifier = match stringifier {
        "html" => Stringifier::Html,
        "org" => Stringifier::Org,
        other => {
            eprintln!("Error: unknown stringifier '{}'", other);
            std::process::exit(1);
        }
    };

    let output = match format {
        "json" | "yaml" => {
            let mut value = Value::default();
            let decoder = Decoder::with_stringifier(stringifier);
            if let Err(e) = decoder.decode_str(&source, path, &mut value) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            let serialized = if format == "json" {
                serde_json::to_string_pretty(&value).map_err(|e| e.to_string())
            } else {
                serde_yaml::to_string(&value).map_err(|e| e.to_string())
            };
            serialized.unwrap_or_else(|e| {
                eprintln!("Error serializing output: {}", e);
                std::process::exit(1);
            })
        }
        "html" | "org" => {
            let document = parse(&source, path).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            if format == "html" {
                render::to_html(&document.nodes)
            } else {
                render::to_org(&document.nodes)
            }
        }
        other => {
            eprintln!("Error: unknown format '{}'", other);
            std::process::exit(1);
        }
    };

    println!("{}", output);
}
