use clap::{command, Command};

use super::CommandType;
use crate::store::SecretStore;
use crate::writer::OutErr;

pub fn subcommand() -> Command<'static> {
    command!(CommandType::List.as_str()).about("List stored TOTP names (never the secrets)")
}

pub fn run_list<W>(account_store: &impl SecretStore, writer: &mut W) -> bool
where
    W: OutErr,
{
    let names = match account_store.list_names() {
        Ok(names) => names,
        Err(err) => return writer.fail(err),
    };

    if names.is_empty() {
        writer.write("No TOTP secrets stored\n");
        return true;
    }

    writer.write("Stored TOTP secrets:\n");
    for name in names {
        writer.write(&format!("  • {}\n", name));
    }
    true
}
