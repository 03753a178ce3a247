//! Command-line interface for blockhtml
//! Converts the editor's JSON block documents to HTML and HTML back to block documents.
//!
//! Usage:
//!   blockhtml render `<path|->`                      - JSON document to HTML
//!   blockhtml parse `<path|->`                       - HTML to pretty JSON document
//!
//! Global options:
//!   --config `<file>`          Layer a TOML config file over the built-in defaults
//!   --strip-unsafe `<bool>`    Override `parse.strip_unsafe`
//!
//! Set `RUST_LOG=debug` to see which content fell back to raw blocks.

use blockhtml::{ConvertError, ConvertOptions, Converter};
use blockhtml_config::Loader;
use clap::{value_parser, Arg, ArgMatches, Command};
use log::debug;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] blockhtml_config::ConfigError),

    #[error("could not read '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

fn build_cli() -> Command {
    let input = Arg::new("path")
        .help("Input file, or '-' for stdin")
        .default_value("-")
        .index(1);

    Command::new("blockhtml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert block-editor documents to HTML and back")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("strip-unsafe")
                .long("strip-unsafe")
                .global(true)
                .value_parser(value_parser!(bool))
                .help("Drop script/style/noscript/template elements when parsing HTML"),
        )
        .subcommand(
            Command::new("render")
                .about("Render a JSON block document to HTML")
                .arg(input.clone()),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse HTML into a JSON block document")
                .arg(input),
        )
}

fn main() {
    env_logger::init();
    let matches = build_cli().get_matches();

    let result = load_options(&matches).and_then(|options| match matches.subcommand() {
        Some(("render", sub)) => handle_render(sub, options),
        Some(("parse", sub)) => handle_parse(sub, options),
        _ => unreachable!("a subcommand is required"),
    });

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Defaults, then `--config`, then `--strip-unsafe`.
fn load_options(matches: &ArgMatches) -> Result<ConvertOptions, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        debug!("layering config file {}", path);
        loader = loader.with_file(path);
    }
    if let Some(strip) = matches.get_one::<bool>("strip-unsafe") {
        loader = loader.set_override("parse.strip_unsafe", *strip)?;
    }
    Ok(loader.build()?.to_options())
}

/// Handle the render command
fn handle_render(matches: &ArgMatches, options: ConvertOptions) -> Result<String, CliError> {
    let source = read_text(input_path(matches))?;
    Ok(Converter::new(options).render_json(&source)?)
}

/// Handle the parse command
fn handle_parse(matches: &ArgMatches, options: ConvertOptions) -> Result<String, CliError> {
    let bytes = read_input(input_path(matches))?;
    let doc = Converter::new(options).parse_bytes(&bytes)?;
    Ok(doc.to_json_pretty()?)
}

fn input_path(matches: &ArgMatches) -> &str {
    matches
        .get_one::<String>("path")
        .map(String::as_str)
        .expect("path has a default")
}

fn read_input(path: &str) -> Result<Vec<u8>, CliError> {
    let result = if path == "-" {
        let mut buffer = Vec::new();
        std::io::stdin().read_to_end(&mut buffer).map(|_| buffer)
    } else {
        std::fs::read(path)
    };
    result.map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

fn read_text(path: &str) -> Result<String, CliError> {
    let bytes = read_input(path)?;
    String::from_utf8(bytes).map_err(|e| CliError::Convert(ConvertError::InvalidUtf8(e.utf8_error())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn strip_unsafe_flag_overrides_config() {
        let matches = build_cli()
            .try_get_matches_from(["blockhtml", "parse", "--strip-unsafe", "false", "in.html"])
            .expect("arguments to parse");
        let options = load_options(&matches).expect("options to load");
        assert!(!options.strip_unsafe);
    }

    #[test]
    fn a_subcommand_is_required() {
        assert!(build_cli().try_get_matches_from(["blockhtml"]).is_err());
        assert!(build_cli()
            .try_get_matches_from(["blockhtml", "convert", "in.html"])
            .is_err());
    }

    #[test]
    fn path_defaults_to_stdin() {
        let matches = build_cli()
            .try_get_matches_from(["blockhtml", "render"])
            .expect("arguments to parse");
        let (_, sub) = matches.subcommand().expect("subcommand");
        assert_eq!(input_path(sub), "-");
    }
}
