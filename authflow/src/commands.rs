use crate::CLAP_STYLING;
use authflow::handlers::{DEFAULT_ENV_TEMPLATE_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_SNAPSHOT_PATH};
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("authflow")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("authflow")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .arg(
            arg!(-v --"verbose" "Log transform details to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Writes a fresh studio snapshot holding only the root node")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location of the studio snapshot")
                        .default_value(DEFAULT_SNAPSHOT_PATH),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite an existing snapshot at the specified location.")
                        .required(false),
                ),
        )
        .subcommand(
            command!("locate")
                .about("Searches a project tree for better-auth configuration files")
                .arg(
                    arg!([DIR])
                        .required(false)
                        .help("Directory to search")
                        .default_value("."),
                )
                .arg(
                    arg!(--"deep")
                        .required(false)
                        .help("Search deeper directory trees")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("inspect")
                .about("Prints the configuration extracted from a config file as JSON")
                .arg(
                    arg!(<CONFIG>)
                        .help("Path to the auth config source, e.g. src/lib/auth.ts")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
        .subcommand(
            command!("parse")
                .about("Extracts a config file into an editable graph and saves a studio snapshot")
                .arg(
                    arg!(<CONFIG>)
                        .help("Path to the auth config source")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(-o --"output" <SNAPSHOT>)
                        .required(false)
                        .help("Where to write the snapshot")
                        .default_value(DEFAULT_SNAPSHOT_PATH),
                ),
        )
        .subcommand(
            command!("generate")
                .about("Generates config source from the graph in a studio snapshot")
                .arg(
                    arg!([SNAPSHOT])
                        .required(false)
                        .help("Studio snapshot to generate from")
                        .default_value(DEFAULT_SNAPSHOT_PATH),
                )
                .arg(
                    arg!(-o --"output" <FILE>)
                        .required(false)
                        .help("Where to write the generated config")
                        .default_value(DEFAULT_OUTPUT_PATH),
                )
                .arg(
                    arg!(--"env-file" <FILE>)
                        .required(false)
                        .help("Where to write the environment variable template")
                        .default_value(DEFAULT_ENV_TEMPLATE_PATH),
                )
                .arg(
                    arg!(--"base-url" <URL>)
                        .required(false)
                        .help("Hard-code baseURL instead of reading BETTER_AUTH_URL"),
                )
                .arg(
                    arg!(--"dry-run")
                        .required(false)
                        .help("Print the generated files instead of writing them")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("export")
                .about("Writes the reachable nodes and edges of a snapshot as JSON")
                .arg(
                    arg!([SNAPSHOT])
                        .required(false)
                        .help("Studio snapshot to export")
                        .default_value(DEFAULT_SNAPSHOT_PATH),
                )
                .arg(
                    arg!(-o --"output" <FILE>)
                        .required(true)
                        .help("Where to write the exported graph"),
                ),
        )
}
