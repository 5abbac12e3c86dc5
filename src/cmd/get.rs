use clap::{arg, command, ArgMatches, Command};
use log::debug;

use super::{digits_arg, params_from_args, period_arg, CommandType};
use crate::clock::GetTime;
use crate::config::Config;
use crate::store::SecretStore;
use crate::totp::{generate, time_remaining};
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Get.as_str())
        .about("Print the current TOTP code (agent-safe)")
        .args(&[
            arg!(<name> "Name of the TOTP secret"),
            arg!(-t --"show-time" "Show seconds remaining until the code rotates")
                .required(false),
            period_arg(),
            digits_arg(),
        ])
}

pub fn run_get<W>(
    get_args: &ArgMatches,
    account_store: &impl SecretStore,
    clock: &impl GetTime,
    config: &Config,
    writer: &mut W,
) -> bool
where
    W: OutErr,
{
    let name = match get_args.value_of("name") {
        Some(name) => name,
        None => {
            writer.write_err("Error: name is required\n");
            return false;
        }
    };
    let params = match params_from_args(get_args, config) {
        Ok(params) => params,
        Err(err) => return writer.fail(err),
    };

    let secret = match account_store.retrieve(name) {
        Ok(secret) => secret,
        Err(err) => return writer.fail(err),
    };

    let now = clock.get_now();
    let code = match generate(&secret, now, params) {
        Ok(code) => code,
        Err(err) => return writer.fail(err),
    };
    debug!("generated code for '{}'", name);

    if get_args.is_present("show-time") {
        // params were validated by generate
        let remaining = time_remaining(now, params.period).unwrap_or(params.period);
        writer.write(&format!("{} ({}s)\n", code, remaining));
    } else {
        writer.write(&format!("{}\n", code));
    }
    true
}
