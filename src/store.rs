use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::{decrypt_string, encrypt_string, generate_key, CryptoError, NONCE_LEN};

const VAULT_FILE_NAME: &str = "vault.toml";
const SECRETS_FILE_NAME: &str = "secrets.bin";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("'{0}' already exists (use 'remove' first)")]
    AlreadyExists(String),
    #[error("no secret named '{0}'")]
    NotFound(String),
    #[error("secret names must not be empty")]
    InvalidName,
    #[error("vault is corrupt: {0}")]
    Corrupt(&'static str),
    #[error("vault i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("unable to read vault: {0}")]
    Deserialize(#[from] toml::de::Error),
    #[error("unable to write vault: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Named secrets, readable only through `retrieve`.
///
/// `list_names` never exposes values. `delete` succeeds for absent names.
pub trait SecretStore {
    fn store(&mut self, name: &str, secret: &str) -> Result<()>;
    fn retrieve(&self, name: &str) -> Result<Zeroizing<String>>;
    fn delete(&mut self, name: &str) -> Result<()>;
    fn list_names(&self) -> Result<Vec<String>>;

    fn pin_hash(&self) -> Option<&str>;
    fn set_pin(&mut self, pin_hash: String) -> Result<()>;

    fn is_initialized(&self) -> bool {
        self.pin_hash().is_some()
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidName);
    }
    Ok(())
}

/// Backend for tests and embedding, nothing is persisted.
#[cfg_attr(not(test), allow(dead_code))]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    pin: Option<String>,
}

#[cfg_attr(not(test), allow(dead_code))]
impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl SecretStore for MemoryStore {
    fn store(&mut self, name: &str, secret: &str) -> Result<()> {
        check_name(name)?;
        if self.entries.contains_key(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        self.entries.insert(name.to_string(), secret.to_string());
        Ok(())
    }

    fn retrieve(&self, name: &str) -> Result<Zeroizing<String>> {
        self.entries
            .get(name)
            .map(|secret| Zeroizing::new(secret.clone()))
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.entries.remove(name);
        Ok(())
    }

    fn list_names(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn pin_hash(&self) -> Option<&str> {
        self.pin.as_deref()
    }

    fn set_pin(&mut self, pin_hash: String) -> Result<()> {
        self.pin = Some(pin_hash);
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct VaultMeta {
    pin: Option<String>,
    key: Option<Vec<u8>>,
}

/// Encrypted vault on disk.
///
/// `vault.toml` holds the pin hash and data key. `secrets.bin` holds the nonce
/// followed by the name -> secret map as TOML, encrypted with XChaCha20-Poly1305.
/// Both are owner-only on unix. Every mutation rewrites both files, metadata
/// first, so each rename leaves a readable vault behind.
pub struct FileStore {
    dir: PathBuf,
    meta: VaultMeta,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(dir: &Path) -> Result<FileStore> {
        create_private_dir(dir)?;

        let meta_path = dir.join(VAULT_FILE_NAME);
        let meta: VaultMeta = match fs::read_to_string(&meta_path) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => VaultMeta::default(),
            Err(e) => return Err(e.into()),
        };

        let secrets_path = dir.join(SECRETS_FILE_NAME);
        let encrypted = match fs::read(&secrets_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let entries = if encrypted.is_empty() {
            BTreeMap::new()
        } else {
            let key = meta
                .key
                .as_ref()
                .ok_or(StoreError::Corrupt("secrets present but no key"))?;
            if encrypted.len() < NONCE_LEN {
                return Err(StoreError::Corrupt("secrets file is truncated"));
            }
            let (nonce, ciphertext) = encrypted.split_at(NONCE_LEN);
            let contents = decrypt_string(ciphertext, key, nonce)?;
            toml::from_str(&contents)?
        };

        debug!("opened vault at {}", dir.display());
        Ok(FileStore {
            dir: dir.to_path_buf(),
            meta,
            entries,
        })
    }

    fn save(&mut self) -> Result<()> {
        let key = match &self.meta.key {
            Some(key) => key.clone(),
            None => {
                info!("generating vault key");
                let key = generate_key();
                self.meta.key = Some(key.clone());
                key
            }
        };
        let key = Zeroizing::new(key);

        let contents = Zeroizing::new(toml::to_string(&self.entries)?);
        let (ciphertext, nonce) = encrypt_string(&contents, &key)?;
        let mut payload = nonce;
        payload.extend_from_slice(&ciphertext);

        // the key never changes once written, so the old payload stays readable
        let meta_contents = toml::to_string(&self.meta)?;
        write_private(&self.dir.join(VAULT_FILE_NAME), meta_contents.as_bytes())?;
        write_private(&self.dir.join(SECRETS_FILE_NAME), &payload)?;

        debug!("saved vault with {} entries", self.entries.len());
        Ok(())
    }
}

impl SecretStore for FileStore {
    fn store(&mut self, name: &str, secret: &str) -> Result<()> {
        check_name(name)?;
        if self.entries.contains_key(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        self.entries.insert(name.to_string(), secret.to_string());
        if let Err(e) = self.save() {
            self.entries.remove(name);
            return Err(e);
        }
        info!("stored secret '{}'", name);
        Ok(())
    }

    fn retrieve(&self, name: &str) -> Result<Zeroizing<String>> {
        self.entries
            .get(name)
            .map(|secret| Zeroizing::new(secret.clone()))
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        let removed = match self.entries.remove(name) {
            Some(secret) => secret,
            None => {
                debug!("'{}' not in vault, nothing to delete", name);
                return Ok(());
            }
        };
        if let Err(e) = self.save() {
            self.entries.insert(name.to_string(), removed);
            return Err(e);
        }
        info!("deleted secret '{}'", name);
        Ok(())
    }

    fn list_names(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn pin_hash(&self) -> Option<&str> {
        self.meta.pin.as_deref()
    }

    fn set_pin(&mut self, pin_hash: String) -> Result<()> {
        self.meta.pin = Some(pin_hash);
        self.save()
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    if dir.is_dir() {
        return Ok(());
    }
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

// write to a sibling temp file, then rename over the target
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(&tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    fs::rename(&tmp, path)
}
