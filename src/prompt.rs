use std::io;
use zeroize::Zeroizing;

/// Reads sensitive input (PINs, secrets) without echoing it.
pub trait ReadSecret {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Zeroizing<String>>;
}

/// Reads from the controlling terminal with echo disabled.
pub struct TerminalPrompt {}

impl TerminalPrompt {
    pub fn new() -> Self {
        TerminalPrompt {}
    }
}

impl ReadSecret for TerminalPrompt {
    fn read_secret(&mut self, prompt: &str) -> io::Result<Zeroizing<String>> {
        rpassword::prompt_password(prompt).map(Zeroizing::new)
    }
}
