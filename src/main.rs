//! Main binary for the gmaps-tools CLI

use clap::{Arg, ArgAction, Command};
use gmaps_tools::{create_tool_registry, MapsConfig, MapsContext, ToolArgs, API_PROMPT};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_cli(tool_info: &[(&'static str, &'static str, &'static str)]) -> Command {
    let mut app = Command::new("gmaps-tools")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Google Maps Platform tools for LLM agents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Config file with a [google_maps] table (default: config/gmaps-tools.toml)"),
        )
        .subcommand(
            Command::new("list")
                .about("Print the OpenAI function schemas of all tools")
                .arg(
                    Arg::new("names")
                        .long("names")
                        .action(ArgAction::SetTrue)
                        .help("Print tool names only"),
                ),
        )
        .subcommand(Command::new("prompt").about("Print the system prompt fragment for the tools"));

    for (tool_name, description, signature) in tool_info {
        app = app.subcommand(
            Command::new(*tool_name)
                .about(*description)
                .after_help(format!("Signature: {}", signature))
                .arg(
                    Arg::new("args")
                        .help("Tool arguments as --key=value")
                        .num_args(0..)
                        .trailing_var_arg(true)
                        .allow_hyphen_values(true)
                        .value_name("ARGS"),
                ),
        );
    }
    app
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    // Registry used only to describe the tools; nothing is sent through it
    let catalog = create_tool_registry(MapsContext::from_config(MapsConfig::default())?);
    let tool_info: Vec<(&'static str, &'static str, &'static str)> = catalog
        .list_tools()
        .into_iter()
        .filter_map(|name| {
            catalog.get_tool(&name).map(|tool| {
                let name_static: &'static str = Box::leak(name.into_boxed_str());
                let desc_static: &'static str =
                    Box::leak(tool.description().to_string().into_boxed_str());
                let signature_static: &'static str =
                    Box::leak(tool.signature().to_string().into_boxed_str());
                (name_static, desc_static, signature_static)
            })
        })
        .collect();

    let matches = build_cli(&tool_info).get_matches();

    match matches.subcommand() {
        Some(("list", sub_matches)) => {
            if sub_matches.get_flag("names") {
                for name in catalog.list_tools() {
                    println!("{}", name);
                }
            } else {
                println!("{}", serde_json::to_string_pretty(&catalog.get_all_schemas())?);
            }
        }
        Some(("prompt", _)) => println!("{}", API_PROMPT),
        Some((tool_name, sub_matches)) => {
            let config_path = sub_matches.get_one::<PathBuf>("config");
            let config = match MapsConfig::load(config_path.map(PathBuf::as_path)) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
            };
            let registry = create_tool_registry(MapsContext::from_config(config)?);

            let args: Vec<&str> = sub_matches
                .get_many::<String>("args")
                .unwrap_or_default()
                .map(String::as_str)
                .collect();
            let tool_args = match ToolArgs::from_args(&args) {
                Ok(tool_args) => tool_args,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(2);
                }
            };

            match registry.execute_tool(tool_name, &tool_args).await {
                Ok(result) => {
                    println!("{}", result.message);
                    if !result.success {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    if e.is_auth() {
                        eprintln!(
                            "Set GOOGLE_MAPS_API_KEY or api_key in the [google_maps] config table."
                        );
                    }
                    std::process::exit(1);
                }
            }
        }
        None => {
            eprintln!("No tool specified");
            std::process::exit(1);
        }
    }

    Ok(())
}
