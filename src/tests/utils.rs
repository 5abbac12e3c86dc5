use clap::ArgMatches;

use crate::cmd::CommandType;

/// Parses `totp-vault <command> <args..>` through the full command tree and
/// returns the subcommand's matches.
pub fn parse_command(command: CommandType, args: &[&str]) -> Result<ArgMatches, clap::Error> {
    let mut argv = vec!["totp-vault", command.as_str()];
    argv.extend_from_slice(args);

    let matches = crate::cli().try_get_matches_from(argv)?;
    match matches.subcommand() {
        Some((name, cmd_args)) if name == command.as_str() => Ok(cmd_args.clone()),
        other => panic!("expected {:?}, parsed {:?}", command, other.map(|(name, _)| name)),
    }
}
