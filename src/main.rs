use clap::{command, Command};
use log::{debug, error};
use std::process;

mod base32;
mod clock;
mod cmd;
mod config;
mod crypto;
mod prompt;
mod store;
mod totp;
mod writer;

#[cfg(test)]
mod tests;

use clock::Clock;
use cmd::{add, get, init, list, remove, time, verify, CommandType};
use config::Config;
use prompt::TerminalPrompt;
use store::FileStore;
use writer::{OutErr, VaultWriter};

const LOG_ENV_VAR: &str = "TOTP_VAULT_LOG";

fn cli() -> Command<'static> {
    command!()
        .about("TOTP code generator that never exposes secrets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommands(vec![
            init::subcommand(),
            add::subcommand(),
            remove::subcommand(),
            list::subcommand(),
            get::subcommand(),
            verify::subcommand(),
            time::subcommand(),
        ])
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV_VAR, "warn")).init();

    let matches = cli().get_matches();
    let mut writer = VaultWriter::new();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            writer.fail(err);
            process::exit(1);
        }
    };
    debug!("using vault directory {}", config.dir.display());

    let clock = Clock::new();

    // time never touches the vault
    if let Some((name, args)) = matches.subcommand() {
        if name == CommandType::Time.as_str() {
            let ok = time::run_time(args, &clock, &config, &mut writer);
            process::exit(if ok { 0 } else { 1 });
        }
    }

    let mut account_store = match FileStore::open(&config.dir) {
        Ok(store) => store,
        Err(err) => {
            error!("unable to open vault at {}: {}", config.dir.display(), err);
            writer.fail(err);
            process::exit(1);
        }
    };
    let mut prompt = TerminalPrompt::new();

    let ok = match matches.subcommand() {
        Some(("init", _)) => init::run_init(&mut account_store, &mut prompt, &mut writer),
        Some(("add", args)) => add::run_add(args, &mut account_store, &mut prompt, &mut writer),
        Some(("remove", args)) => {
            remove::run_remove(args, &mut account_store, &mut prompt, &mut writer)
        }
        Some(("list", _)) => list::run_list(&account_store, &mut writer),
        Some(("get", args)) => get::run_get(args, &account_store, &clock, &config, &mut writer),
        Some(("verify", args)) => {
            verify::run_verify(args, &account_store, &clock, &config, &mut writer)
        }
        _ => {
            writer.write_err("Error: unknown command\n");
            false
        }
    };

    process::exit(if ok { 0 } else { 1 });
}
