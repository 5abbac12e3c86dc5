use clap::{arg, Arg, ArgMatches};
use log::warn;
use std::str::FromStr;

use crate::config::Config;
use crate::crypto::verify_pin;
use crate::prompt::ReadSecret;
use crate::store::SecretStore;
use crate::totp::{Params, MAX_WINDOW};
use crate::writer::OutErr;

pub mod add;
pub mod get;
pub mod init;
pub mod list;
pub mod remove;
pub mod time;
pub mod verify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Init,
    Add,
    Remove,
    List,
    Get,
    Verify,
    Time,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Init => "init",
            CommandType::Add => "add",
            CommandType::Remove => "remove",
            CommandType::List => "list",
            CommandType::Get => "get",
            CommandType::Verify => "verify",
            CommandType::Time => "time",
        }
    }
}

fn is_number<T: FromStr>(value: &str) -> Result<(), String> {
    match value.parse::<T>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "expected a non-negative integer that fits in {}",
            std::any::type_name::<T>()
        )),
    }
}

pub fn period_arg() -> Arg<'static> {
    arg!(--period <SECS> "Seconds per code (default from config, usually 30)")
        .required(false)
        .validator(is_number::<u64>)
}

pub fn digits_arg() -> Arg<'static> {
    arg!(--digits <N> "Digits per code (default from config, usually 6)")
        .required(false)
        .validator(is_number::<u32>)
}

pub fn window_arg() -> Arg<'static> {
    arg!(-w --window <N> "Accepted periods before and after now (default from config, usually 1)")
        .required(false)
        .validator(is_number::<u64>)
}

fn number_or<T: FromStr>(args: &ArgMatches, name: &str, default: T) -> Result<T, String> {
    match args.value_of(name) {
        Some(value) => value
            .parse()
            .map_err(|_| format!("invalid value '{}' for --{}", value, name)),
        None => Ok(default),
    }
}

/// Code shape from `--period`/`--digits`, falling back to the config.
pub fn params_from_args(args: &ArgMatches, config: &Config) -> Result<Params, String> {
    Ok(Params::new(
        number_or(args, "period", config.period)?,
        number_or(args, "digits", config.digits)?,
    ))
}

pub fn period_from_args(args: &ArgMatches, config: &Config) -> Result<u64, String> {
    number_or(args, "period", config.period)
}

pub fn window_from_args(args: &ArgMatches, config: &Config) -> Result<u64, String> {
    let window = number_or(args, "window", config.window)?;
    if window > MAX_WINDOW {
        return Err(format!("window must be at most {}", MAX_WINDOW));
    }
    Ok(window)
}

/// Mutating commands need the vault pin, agents only ever read codes.
pub fn authorize<W>(
    account_store: &impl SecretStore,
    prompt: &mut impl ReadSecret,
    writer: &mut W,
) -> bool
where
    W: OutErr,
{
    let pin_hash = match account_store.pin_hash() {
        Some(pin_hash) => pin_hash,
        None => {
            writer.write_err("Error: vault is not initialized (run 'totp-vault init' first)\n");
            return false;
        }
    };

    let pin = match prompt.read_secret("Vault PIN: ") {
        Ok(pin) => pin,
        Err(e) => {
            writer.write_err(&format!("Error: unable to read PIN: {}\n", e));
            return false;
        }
    };

    if !verify_pin(pin_hash, &pin) {
        warn!("rejected incorrect vault PIN");
        writer.write_err("Error: incorrect PIN\n");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Command;
    use std::path::PathBuf;

    // no validators, so out-of-range values reach the conversion
    fn loose_args(argv: &[&str]) -> ArgMatches {
        Command::new("get")
            .args(&[
                arg!(--period <SECS>).required(false),
                arg!(--digits <N>).required(false),
                arg!(-w --window <N>).required(false),
            ])
            .try_get_matches_from(argv)
            .unwrap()
    }

    fn config() -> Config {
        Config::with_dir(PathBuf::from("/nonexistent"))
    }

    #[test]
    fn falls_back_to_config_when_absent() {
        let params = params_from_args(&loose_args(&["get"]), &config()).unwrap();
        assert_eq!(params, Params::default());
        assert_eq!(window_from_args(&loose_args(&["get"]), &config()), Ok(1));
    }

    #[test]
    fn rejects_digits_past_u32_instead_of_falling_back() {
        let args = loose_args(&["get", "--digits", "4294967296"]);
        assert_eq!(
            params_from_args(&args, &config()),
            Err(String::from("invalid value '4294967296' for --digits"))
        );
    }

    #[test]
    fn rejects_unparsable_period_and_window() {
        let args = loose_args(&["get", "--period", "soon", "-w", "many"]);
        assert!(params_from_args(&args, &config()).is_err());
        assert!(period_from_args(&args, &config()).is_err());
        assert!(window_from_args(&args, &config()).is_err());
    }

    #[test]
    fn validators_check_the_real_type() {
        assert!(is_number::<u32>("4294967295").is_ok());
        assert!(is_number::<u32>("4294967296").is_err());
        assert!(is_number::<u64>("4294967296").is_ok());
        assert!(is_number::<u64>("-1").is_err());
    }
}
