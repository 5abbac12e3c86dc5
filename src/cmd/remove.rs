use clap::{arg, command, ArgMatches, Command};

use super::{authorize, CommandType};
use crate::prompt::ReadSecret;
use crate::store::SecretStore;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Remove.as_str())
        .about("Remove a TOTP secret from the vault")
        .args(&[arg!(<name> "Name of the TOTP secret to remove")])
}

pub fn run_remove<W>(
    remove_args: &ArgMatches,
    account_store: &mut impl SecretStore,
    prompt: &mut impl ReadSecret,
    writer: &mut W,
) -> bool
where
    W: OutErr,
{
    let name = match remove_args.value_of("name") {
        Some(name) => name,
        None => {
            writer.write_err("Error: name is required\n");
            return false;
        }
    };

    if !authorize(&*account_store, prompt, writer) {
        return false;
    }

    match account_store.delete(name) {
        Ok(_) => {
            writer.write(&format!("✓ Removed '{}' from vault\n", name));
            true
        }
        Err(err) => writer.fail(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::CommandType::Remove;
    use crate::tests::constants::*;
    use crate::tests::mocks::*;
    use crate::tests::utils::parse_command;

    fn remove_args(name: &str) -> ArgMatches {
        parse_command(Remove, &[name]).unwrap()
    }

    #[test]
    fn removes_a_secret() {
        let mut store = get_mock_store();
        let mut prompt = MockPrompt::new(&[PIN]);
        let mut writer = MockOtpWriter::new();

        assert!(run_remove(&remove_args("google"), &mut store, &mut prompt, &mut writer));

        assert_eq!(writer.out_str(), "✓ Removed 'google' from vault\n");
        assert_eq!(store.list_names().unwrap(), vec!["github"]);
    }

    #[test]
    fn removing_a_missing_name_succeeds() {
        let mut store = get_mock_store();
        let mut prompt = MockPrompt::new(&[PIN]);
        let mut writer = MockOtpWriter::new();

        assert!(run_remove(&remove_args("gitlab"), &mut store, &mut prompt, &mut writer));

        assert_eq!(writer.err, Vec::new());
        assert_eq!(store.list_names().unwrap(), vec!["github", "google"]);
    }

    #[test]
    fn requires_correct_pin() {
        let mut store = get_mock_store();
        let mut prompt = MockPrompt::new(&["0000"]);
        let mut writer = MockOtpWriter::new();

        assert!(!run_remove(&remove_args("google"), &mut store, &mut prompt, &mut writer));

        assert_eq!(writer.err_str(), "Error: incorrect PIN\n");
        assert_eq!(store.retrieve("google").unwrap().as_str(), TOTP_KEY);
    }
}
