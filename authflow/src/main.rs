use authflow::handlers::{
    GenerateOptions, expand_path, handle_export, handle_generate, handle_init, handle_inspect,
    handle_locate, handle_parse, hint_for, print_banner,
};
use authflow_scanner::FsStore;
use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use tracing::Level;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    if let Err(e) = run(&chosen_command, quiet).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        if let Some(hint) = hint_for(&e) {
            eprintln!("{} {}", "ℹ".blue(), hint);
        }
        std::process::exit(1);
    }
}

async fn run(chosen_command: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let store = FsStore::current_dir()?;

    match chosen_command.subcommand() {
        Some(("init", args)) => {
            let path = path_arg(args, "PATH");
            handle_init(&store, &path, args.get_flag("force")).await?;
        }
        Some(("locate", args)) => {
            let dir = path_arg(args, "DIR");
            handle_locate(&dir, args.get_flag("deep"), quiet).await?;
        }
        Some(("inspect", args)) => {
            handle_inspect(&store, &path_arg(args, "CONFIG")).await?;
        }
        Some(("parse", args)) => {
            handle_parse(&store, &path_arg(args, "CONFIG"), &path_arg(args, "output")).await?;
        }
        Some(("generate", args)) => {
            let options = GenerateOptions {
                snapshot_path: path_arg(args, "SNAPSHOT"),
                output_path: path_arg(args, "output"),
                env_path: path_arg(args, "env-file"),
                base_url: args.get_one::<String>("base-url").cloned(),
                dry_run: args.get_flag("dry-run"),
            };
            handle_generate(&store, &options).await?;
        }
        Some(("export", args)) => {
            handle_export(&store, &path_arg(args, "SNAPSHOT"), &path_arg(args, "output")).await?;
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
    Ok(())
}

/// Every path argument either is required or has a default.
fn path_arg(args: &ArgMatches, name: &str) -> std::path::PathBuf {
    let raw = args
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_default();
    expand_path(raw)
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
