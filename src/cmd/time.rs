use clap::{command, ArgMatches, Command};

use super::{period_arg, period_from_args, CommandType};
use crate::clock::GetTime;
use crate::config::Config;
use crate::totp::time_remaining;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Time.as_str())
        .about("Print seconds until the code rotates")
        .args(&[period_arg()])
}

pub fn run_time<W>(
    time_args: &ArgMatches,
    clock: &impl GetTime,
    config: &Config,
    writer: &mut W,
) -> bool
where
    W: OutErr,
{
    let period = match period_from_args(time_args, config) {
        Ok(period) => period,
        Err(err) => return writer.fail(err),
    };

    match time_remaining(clock.get_now(), period) {
        Ok(remaining) => {
            writer.write(&format!("{}\n", remaining));
            true
        }
        Err(err) => writer.fail(err),
    }
}
