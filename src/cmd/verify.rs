use clap::{arg, command, ArgMatches, Command};
use log::info;

use super::{digits_arg, params_from_args, period_arg, window_arg, window_from_args, CommandType};
use crate::clock::GetTime;
use crate::config::Config;
use crate::store::SecretStore;
use crate::totp::verify;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Verify.as_str())
        .about("Verify a TOTP code (agent-safe)")
        .args(&[
            arg!(<name> "Name of the TOTP secret"),
            arg!(<code> "Code to verify"),
            window_arg(),
            period_arg(),
            digits_arg(),
        ])
}

/// Prints "valid" or "invalid", an invalid code counts as failure.
pub fn run_verify<W>(
    verify_args: &ArgMatches,
    account_store: &impl SecretStore,
    clock: &impl GetTime,
    config: &Config,
    writer: &mut W,
) -> bool
where
    W: OutErr,
{
    let (name, code) = match (verify_args.value_of("name"), verify_args.value_of("code")) {
        (Some(name), Some(code)) => (name, code),
        _ => {
            writer.write_err("Error: name and code are required\n");
            return false;
        }
    };
    let params = match params_from_args(verify_args, config) {
        Ok(params) => params,
        Err(err) => return writer.fail(err),
    };
    let window = match window_from_args(verify_args, config) {
        Ok(window) => window,
        Err(err) => return writer.fail(err),
    };

    let secret = match account_store.retrieve(name) {
        Ok(secret) => secret,
        Err(err) => return writer.fail(err),
    };

    match verify(&secret, code.trim(), window, clock.get_now(), params) {
        Ok(true) => {
            info!("code for '{}' accepted", name);
            writer.write("valid\n");
            true
        }
        Ok(false) => {
            info!("code for '{}' rejected", name);
            writer.write("invalid\n");
            false
        }
        Err(err) => writer.fail(err),
    }
}
