use clap::{arg, command, ArgMatches, Command};

use super::{authorize, CommandType};
use crate::prompt::ReadSecret;
use crate::store::SecretStore;
use crate::totp::{generate_at, Params};
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Add.as_str())
        .about("Add a new TOTP secret (interactive, for humans only)")
        .args(&[arg!(<name> "Name for this TOTP secret")])
}

pub fn run_add<W>(
    add_args: &ArgMatches,
    account_store: &mut impl SecretStore,
    prompt: &mut impl ReadSecret,
    writer: &mut W,
) -> bool
where
    W: OutErr,
{
    let name = match add_args.value_of("name") {
        Some(name) => name,
        None => {
            writer.write_err("Error: name is required\n");
            return false;
        }
    };

    if !authorize(&*account_store, prompt, writer) {
        return false;
    }

    // checked before asking for the secret so nothing is typed in vain
    match account_store.list_names() {
        Ok(names) if names.iter().any(|existing| existing == name) => {
            writer.write_err(&format!(
                "Error: '{}' already exists. Use 'remove' first.\n",
                name
            ));
            return false;
        }
        Ok(_) => (),
        Err(err) => return writer.fail(err),
    }

    let secret = match prompt.read_secret("Enter TOTP secret (base32): ") {
        Ok(secret) if !secret.trim().is_empty() => secret,
        Ok(_) => {
            writer.write_err("Error: no secret provided\n");
            return false;
        }
        Err(e) => {
            writer.write_err(&format!("Error: unable to read secret: {}\n", e));
            return false;
        }
    };

    // a secret that can't produce a code is never stored
    if generate_at(&secret, 0, Params::default()).is_err() {
        writer.write_err("Error: invalid TOTP secret (must be base32 encoded)\n");
        return false;
    }

    match account_store.store(name, &secret) {
        Ok(_) => {
            writer.write(&format!("✓ Stored '{}' in vault\n", name));
            true
        }
        Err(err) => writer.fail(err),
    }
}
