// "1234567890"
pub const TOTP_KEY: &str = "GEZDGNBVGY3TQOJQ";
pub const PIN: &str = "2468";

// MockClock sits at 90s, counter 3 with the default 30s period
pub const CODE_AT_90: &str = "626604";
pub const CODE_AT_60: &str = "092045";
pub const CODE_AT_120: &str = "208158";
pub const CODE_AT_30: &str = "263420";
