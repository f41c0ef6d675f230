//! Command-line interface for datapacks
//! This binary parses datapacks and map packs and compiles or applies chart settings documents.
//!
//! Usage:
//!   datapack columns `<paths>...` [--format `<format>`] [--settings `<file>`]  - Print the column tree
//!   datapack maps `<paths>...` [--format json|yaml] [--lenient]              - Print merged map packs
//!   datapack validate `<paths>...`                                           - Report suspicious structure
//!   datapack settings compile `<paths>...` [--into `<file>`]                  - Write a settings document
//!   datapack settings apply `<file>` `<paths>...`                             - Report how a document applies
//!
//! Global options: `--config <file>` layers a TOML file over the defaults and
//! `--set key=value` overrides single keys. `DATAPACK_LOG` sets the log filter.

use clap::{Arg, ArgAction, ArgMatches, Command};
use datapack_config::{DatapackConfig, Loader};
use datapack_parser::datapack::columns::ColumnTree;
use datapack_parser::datapack::diagnostics::{validate_tree, Diagnostic, DiagnosticSeverity};
use datapack_parser::datapack::formats::{FormatRegistry, RenderParams};
use datapack_parser::datapack::loader::{DatapackLoader, SourceFile};
use datapack_parser::datapack::maps::{parse_map_packs_lenient, parse_map_packs_with};
use datapack_parser::datapack::parsing::parse_datapacks_with;
use datapack_parser::datapack::settings::{
    apply_settings, compile_settings_into_with, compile_settings_with, SettingsDocument,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn paths_arg() -> Arg {
    Arg::new("paths")
        .help("Datapack files")
        .required(true)
        .num_args(1..)
}

fn cli() -> Command {
    Command::new("datapack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting datapacks and compiling chart settings")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .global(true)
                .value_name("KEY=VALUE")
                .action(ArgAction::Append)
                .help("Override a single configuration key (e.g. datapack.root_name=Root)"),
        )
        .subcommand(
            Command::new("columns")
                .about("Parse datapacks and print the column tree")
                .arg(paths_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (treeviz, json, yaml)")
                        .default_value("treeviz"),
                )
                .arg(
                    Arg::new("settings")
                        .long("settings")
                        .short('s')
                        .help("Settings document to apply before printing"),
                )
                .arg(
                    Arg::new("show-age")
                        .long("show-age")
                        .help("Append age ranges in treeviz output")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("maps")
                .about("Parse map packs and print the merged index and hierarchy")
                .arg(paths_arg().help("Map-pack files"))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (json, yaml)")
                        .default_value("json"),
                )
                .arg(
                    Arg::new("lenient")
                        .long("lenient")
                        .help("Skip files that are not map packs instead of failing")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Report structure that parsed but looks unintended")
                .arg(paths_arg()),
        )
        .subcommand(
            Command::new("settings")
                .about("Compile or apply settings documents")
                .subcommand_required(true)
                .subcommand(
                    Command::new("compile")
                        .about("Write the settings document for the parsed tree")
                        .arg(paths_arg())
                        .arg(
                            Arg::new("into")
                                .long("into")
                                .help("Existing document to update instead of starting fresh"),
                        ),
                )
                .subcommand(
                    Command::new("apply")
                        .about("Apply a settings document and print the report")
                        .arg(
                            Arg::new("document")
                                .help("Settings document")
                                .required(true)
                                .index(1),
                        )
                        .arg(paths_arg().index(2)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();
    let config = load_config(&matches);
    init_logging(&config);

    match matches.subcommand() {
        Some(("columns", sub)) => handle_columns_command(&config, sub),
        Some(("maps", sub)) => handle_maps_command(&config, sub),
        Some(("validate", sub)) => handle_validate_command(&config, sub),
        Some(("settings", sub)) => match sub.subcommand() {
            Some(("compile", sub)) => handle_compile_command(&config, sub),
            Some(("apply", sub)) => handle_apply_command(&config, sub),
            _ => unreachable!("settings requires a subcommand"),
        },
        _ => unreachable!("a subcommand is required"),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

fn load_config(matches: &ArgMatches) -> DatapackConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    for pair in matches.get_many::<String>("set").into_iter().flatten() {
        let Some((key, value)) = pair.split_once('=') else {
            fail(format!("Invalid override '{}': expected KEY=VALUE", pair));
        };
        loader = loader
            .set_override(key.trim(), value.trim())
            .unwrap_or_else(|e| fail(format!("Invalid override '{}': {}", pair, e)));
    }
    loader
        .build()
        .unwrap_or_else(|e| fail(format!("Configuration error: {}", e)))
}

/// `DATAPACK_LOG` wins over the configured filter. Logs go to stderr so output stays pipeable.
fn init_logging(config: &DatapackConfig) {
    let filter = EnvFilter::try_from_env("DATAPACK_LOG")
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_sources(matches: &ArgMatches) -> Vec<SourceFile> {
    let paths = matches
        .get_many::<String>("paths")
        .into_iter()
        .flatten()
        .cloned();
    let sources = DatapackLoader::new().with_paths(paths).load();
    if sources.is_empty() {
        tracing::warn!("none of the given files could be read");
    }
    sources
}

fn load_tree(config: &DatapackConfig, matches: &ArgMatches) -> ColumnTree {
    parse_datapacks_with(&load_sources(matches), &config.datapack)
}

fn read_document(path: &str) -> SettingsDocument {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("Cannot read settings document {}: {}", path, e)));
    SettingsDocument::parse(&text)
        .unwrap_or_else(|e| fail(format!("Cannot parse settings document {}: {}", path, e)))
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
}

fn print_output(output: &str) {
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}

fn serialize<T: Serialize>(value: &T, format: &str) -> String {
    let result = match format {
        "json" => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        other => fail(format!("Format '{}' not supported; use json or yaml", other)),
    };
    result.unwrap_or_else(|e| fail(format!("Serialization error: {}", e)))
}

fn handle_columns_command(config: &DatapackConfig, matches: &ArgMatches) {
    let mut tree = load_tree(config, matches);
    if let Some(path) = matches.get_one::<String>("settings") {
        let report = apply_settings(&read_document(path), &mut tree);
        print_diagnostics(&report.diagnostics);
    }

    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("treeviz");
    let mut params = RenderParams::new();
    if matches.get_flag("show-age") {
        params.insert("show-age".to_string(), "true".to_string());
    }
    let output = FormatRegistry::default()
        .render(&tree, format, &params)
        .unwrap_or_else(|e| fail(e));
    print_output(&output);
}

fn handle_maps_command(config: &DatapackConfig, matches: &ArgMatches) {
    let sources = load_sources(matches);
    let pack = if matches.get_flag("lenient") {
        let (pack, errors) = parse_map_packs_lenient(&sources, &config.map_packs);
        for err in &errors {
            eprintln!("{}", err);
        }
        pack
    } else {
        parse_map_packs_with(&sources, &config.map_packs).unwrap_or_else(|e| fail(e))
    };
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json");
    print_output(&serialize(&pack, format));
}

fn handle_validate_command(config: &DatapackConfig, matches: &ArgMatches) {
    let tree = load_tree(config, matches);
    let diagnostics = validate_tree(&tree);
    if diagnostics.is_empty() {
        println!("No problems found in {} columns", tree.len());
        return;
    }
    for diagnostic in &diagnostics {
        println!("{}", diagnostic);
    }
    if diagnostics
        .iter()
        .any(|d| d.severity == DiagnosticSeverity::Error)
    {
        std::process::exit(1);
    }
}

fn handle_compile_command(config: &DatapackConfig, matches: &ArgMatches) {
    let tree = load_tree(config, matches);
    let document = match matches.get_one::<String>("into") {
        Some(path) => {
            let mut document = read_document(path);
            compile_settings_into_with(&tree, &mut document, &config.settings);
            document
        }
        None => compile_settings_with(&tree, &config.settings),
    };
    print_output(&document.to_string());
}

fn handle_apply_command(config: &DatapackConfig, matches: &ArgMatches) {
    let document = matches
        .get_one::<String>("document")
        .map(|path| read_document(path))
        .unwrap_or_else(|| fail("A settings document is required"));
    let mut tree = load_tree(config, matches);
    let report = apply_settings(&document, &mut tree);
    print_output(&serialize(&report, "json"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn settings_needs_a_subcommand() {
        let result = cli().try_get_matches_from(["datapack", "settings"]);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_are_global() {
        let matches = cli()
            .try_get_matches_from(["datapack", "columns", "a.txt", "--set", "datapack.root_name=Root"])
            .unwrap();
        let config = load_config(&matches);
        assert_eq!(config.datapack.root_name, "Root");
    }
}
