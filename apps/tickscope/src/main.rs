use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tickscope::{obs, CommandError, QueryArgs, EXIT_OK};
use tickscope_application::meta::DISCLAIMER;

#[derive(Parser, Debug)]
#[command(name = "tickscope")]
#[command(about = "Intraday tick detail query and buy/sell summary.", version)]
struct Cli {
    /// Config file path (TOML). If omitted, uses env TICKSCOPE_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Default log level when TICKSCOPE_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the tick detail of one security and print the summary table.
    Query {
        /// Security code, e.g. sh600000 or 600000.SH.
        #[arg(long)]
        code: String,

        /// Window start, HH:MM or HH:MM:SS (inclusive).
        #[arg(long)]
        start: Option<String>,

        /// Window end, HH:MM or HH:MM:SS (inclusive).
        #[arg(long)]
        end: Option<String>,

        /// Report locale: en | zh.
        #[arg(long)]
        locale: Option<String>,

        /// Do not read or update the query history file.
        #[arg(long)]
        no_history: bool,

        /// Print the full report as JSON instead of the text table.
        #[arg(long)]
        json: bool,
    },
    /// List recently queried codes, most recent first.
    History,
    /// Print the effective configuration.
    Config,
}

fn main() {
    let cli = Cli::parse();

    let log_format = match cli.log_format {
        LogFormat::Text => "text",
        LogFormat::Json => "json",
    };
    if let Err(err) = obs::init_tracing(&cli.log_level, log_format) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    if let Err(err) = obs::init_metrics() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let result = match cli.command {
        Command::Query {
            code,
            start,
            end,
            locale,
            no_history,
            json,
        } => {
            eprintln!("{DISCLAIMER}");
            tickscope::run_query_command(QueryArgs {
                code,
                start,
                end,
                locale,
                config_path: cli.config,
                no_history,
                json,
            })
        }
        Command::History => tickscope::run_history_command(cli.config),
        Command::Config => tickscope::run_config_command(cli.config),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            std::process::exit(EXIT_OK);
        }
        Err(CommandError { exit_code, message }) => {
            eprintln!("error: {message}");
            std::process::exit(exit_code);
        }
    }
}
