use clap::{command, Command};
use log::info;

use super::CommandType;
use crate::crypto::hash_pin;
use crate::prompt::ReadSecret;
use crate::store::SecretStore;
use crate::writer::OutErr;

const MIN_PIN_LEN: usize = 4;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::Init.as_str())
        .about("Initialize the vault with a PIN (interactive, for humans only)")
}

pub fn run_init<W>(
    account_store: &mut impl SecretStore,
    prompt: &mut impl ReadSecret,
    writer: &mut W,
) -> bool
where
    W: OutErr,
{
    if account_store.is_initialized() {
        writer.write_err("Error: vault is already initialized\n");
        return false;
    }

    let (pin, confirmation) = match (
        prompt.read_secret("Choose a vault PIN: "),
        prompt.read_secret("Repeat the PIN: "),
    ) {
        (Ok(pin), Ok(confirmation)) => (pin, confirmation),
        (Err(e), _) | (_, Err(e)) => {
            writer.write_err(&format!("Error: unable to read PIN: {}\n", e));
            return false;
        }
    };

    if pin.chars().count() < MIN_PIN_LEN {
        writer.write_err(&format!(
            "Error: PIN must be at least {} characters\n",
            MIN_PIN_LEN
        ));
        return false;
    }
    if *pin != *confirmation {
        writer.write_err("Error: PINs do not match\n");
        return false;
    }

    let encrypted_pin = match hash_pin(&pin) {
        Ok(encrypted_pin) => encrypted_pin,
        Err(e) => return writer.fail(e),
    };

    match account_store.set_pin(encrypted_pin) {
        Ok(_) => {
            info!("vault initialized");
            writer.write("✓ Vault initialized\n");
            true
        }
        Err(err) => writer.fail(err),
    }
}
