use hmac::{Hmac, Mac};
use log::debug;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::{Choice, ConstantTimeEq};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::base32::{self, Base32Error};

// TOTP https://datatracker.ietf.org/doc/html/rfc6238

// HOTP over a time-based moving factor, HMAC-SHA-1 only
// T = floor(unix seconds / period), T0 = 0

type HmacSha1 = Hmac<Sha1>;

pub const DEFAULT_PERIOD: u64 = 30;
pub const DEFAULT_DIGITS: u32 = 6;
pub const DEFAULT_WINDOW: u64 = 1;

// 10^9 is the largest power of ten below the 31-bit truncated range
pub const MAX_DIGITS: u32 = 9;

// keeps verification to a handful of HMACs
pub const MAX_WINDOW: u64 = 10;

#[derive(Debug, Error)]
pub enum TotpError {
    #[error("invalid base32 secret")]
    InvalidSecret(#[source] Option<Base32Error>),
    #[error("unsupported digit count {0} (expected 1-9)")]
    InvalidDigits(u32),
    #[error("period must be a positive number of seconds")]
    InvalidPeriod,
    #[error("window must be at most {}, got {0}", MAX_WINDOW)]
    InvalidWindow(u64),
}

pub type Result<T> = std::result::Result<T, TotpError>;

/// Code shape shared by generation and verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub period: u64,
    pub digits: u32,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            period: DEFAULT_PERIOD,
            digits: DEFAULT_DIGITS,
        }
    }
}

impl Params {
    pub fn new(period: u64, digits: u32) -> Self {
        Params { period, digits }
    }

    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(TotpError::InvalidPeriod);
        }
        if self.digits == 0 || self.digits > MAX_DIGITS {
            return Err(TotpError::InvalidDigits(self.digits));
        }
        Ok(())
    }
}

/// Seconds since the Unix epoch, times before it count as 0.
pub fn epoch_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

pub fn moving_factor(unix_secs: u64, period: u64) -> u64 {
    unix_secs / period
}

fn decode_key(secret: &str) -> Result<Zeroizing<Vec<u8>>> {
    let key = base32::decode(secret).map_err(|e| TotpError::InvalidSecret(Some(e)))?;
    let key = Zeroizing::new(key);
    if key.is_empty() {
        return Err(TotpError::InvalidSecret(None));
    }
    Ok(key)
}

// HMAC_SHA-1 -> 20 byte string
fn make_hmac(key: &[u8], counter: u64) -> Result<[u8; 20]> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| TotpError::InvalidSecret(None))?;
    mac.update(&counter.to_be_bytes());
    Ok(mac.finalize().into_bytes().into())
}

// DT(String) // String = String[0]...String[19]
// Let OffsetBits be the low-order 4 bits of String[19]
// Offset = StToNum(OffsetBits) // 0 <= OffSet <= 15
// Let P = String[OffSet]...String[OffSet+3]
// Return the Last 31 bits of P
fn dynamic_truncation(hmac: &[u8; 20]) -> u32 {
    let offset = (hmac[19] & 0xf) as usize;
    let p = [
        hmac[offset],
        hmac[offset + 1],
        hmac[offset + 2],
        hmac[offset + 3],
    ];
    u32::from_be_bytes(p) & 0x7fff_ffff
}

fn format_code(value: u32, digits: u32) -> String {
    let code = value % 10u32.pow(digits);
    format!("{:0width$}", code, width = digits as usize)
}

fn code_for_counter(key: &[u8], counter: u64, digits: u32) -> Result<String> {
    let hmac = make_hmac(key, counter)?;
    Ok(format_code(dynamic_truncation(&hmac), digits))
}

/// Code for `secret` at `unix_secs`.
pub fn generate_at(secret: &str, unix_secs: u64, params: Params) -> Result<String> {
    params.validate()?;
    let key = decode_key(secret)?;
    let counter = moving_factor(unix_secs, params.period);
    code_for_counter(&key, counter, params.digits)
}

/// Code for `secret` at `time`.
pub fn generate(secret: &str, time: SystemTime, params: Params) -> Result<String> {
    generate_at(secret, epoch_seconds(time), params)
}

/// Check `code` against the periods from `window` steps before `unix_secs` to
/// `window` steps after it.
///
/// Every candidate is compared in constant time and the loop never exits early,
/// so timing does not reveal which step (if any) matched.
///
/// Windows wider than `MAX_WINDOW` are rejected with `InvalidWindow`.
pub fn verify_at(
    secret: &str,
    code: &str,
    window: u64,
    unix_secs: u64,
    params: Params,
) -> Result<bool> {
    params.validate()?;
    if window > MAX_WINDOW {
        return Err(TotpError::InvalidWindow(window));
    }
    let key = decode_key(secret)?;
    let current = moving_factor(unix_secs, params.period);

    // (t + k * period) / period == current + k
    let first = current.saturating_sub(window);
    let last = current.saturating_add(window);

    let mut matched = Choice::from(0u8);
    for counter in first..=last {
        let candidate = code_for_counter(&key, counter, params.digits)?;
        matched |= candidate.as_bytes().ct_eq(code.as_bytes());
    }

    let valid: bool = matched.into();
    debug!("checked counters {}..={} (window {})", first, last, window);
    Ok(valid)
}

pub fn verify(
    secret: &str,
    code: &str,
    window: u64,
    reference: SystemTime,
    params: Params,
) -> Result<bool> {
    verify_at(secret, code, window, epoch_seconds(reference), params)
}

/// Seconds until the code for `unix_secs` rotates, in `1..=period`.
pub fn remaining_at(unix_secs: u64, period: u64) -> Result<u64> {
    if period == 0 {
        return Err(TotpError::InvalidPeriod);
    }
    Ok(period - unix_secs % period)
}

pub fn time_remaining(reference: SystemTime, period: u64) -> Result<u64> {
    remaining_at(epoch_seconds(reference), period)
}
