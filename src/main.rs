use clap::Parser;
use family_budget::advisor::GeminiAdvisor;
use family_budget::args::{Args, Command, MembersCommand};
use family_budget::commands::{self, Out};
use family_budget::{error_type, Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            match error_type(&e) {
                Some(t) => error!("Exiting with {t} error: {e:#}"),
                None => error!("Exiting with error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let common = args.common();
    let home = common.budget_home().path();
    let pin = common.pin();
    let json = common.json();

    // Route to appropriate command handler
    match args.command() {
        Command::Init(init_args) => emit(commands::init(home, init_args, pin).await?, json),

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            emit(commands::add(config, pin, add_args.clone()).await?, json)
        }

        Command::Delete(delete_args) => {
            let config = Config::load(home).await?;
            emit(commands::delete(config, pin, delete_args.clone()).await?, json)
        }

        Command::List(list_args) => {
            let config = Config::load(home).await?;
            emit(commands::list(config, pin, list_args.clone()).await?, json)
        }

        Command::Summary(range_args) => {
            let config = Config::load(home).await?;
            emit(commands::summary(config, pin, range_args.clone()).await?, json)
        }

        Command::Chart(range_args) => {
            let config = Config::load(home).await?;
            emit(commands::chart(config, pin, range_args.clone()).await?, json)
        }

        Command::Members(members_args) => {
            let config = Config::load(home).await?;
            let out = match members_args.action() {
                None | Some(MembersCommand::List) => commands::list_members(config, pin).await?,
                Some(MembersCommand::Add { name }) => {
                    commands::add_member(config, pin, name).await?
                }
                Some(MembersCommand::Remove { name }) => {
                    commands::remove_member(config, pin, name).await?
                }
            };
            emit(out, json)
        }

        Command::Export(export_args) => {
            let config = Config::load(home).await?;
            emit(commands::export(config, pin, export_args.clone()).await?, json)
        }

        Command::Import(import_args) => {
            let config = Config::load(home).await?;
            emit(commands::import(config, pin, import_args.clone()).await?, json)
        }

        Command::Advise(range_args) => {
            let config = Config::load(home).await?;
            let advisor = GeminiAdvisor::from_env(config.advisor())?;
            let out = commands::advise(config, pin, range_args.clone(), &advisor).await?;
            if json {
                out.print_json()
            } else {
                // The report is Markdown meant for the terminal, not a log line.
                println!("{}", out.message());
                Ok(())
            }
        }

        Command::Reset(reset_args) => {
            let config = Config::load(home).await?;
            emit(commands::reset(config, pin, reset_args.clone()).await?, json)
        }
    }
}

fn emit<T>(out: Out<T>, json: bool) -> Result<()>
where
    T: Serialize + Clone + Debug,
{
    if json {
        out.print_json()
    } else {
        out.print();
        Ok(())
    }
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                "family_budget",
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
