/// Default number of chain handles kept alive by the chain cache
pub const DEFAULT_CHAIN_CACHE_CAPACITY: usize = 10;
/// Default network tag when none is configured
pub const DEFAULT_NETWORK: &str = "testnet";
/// Default origin-relative path of the served engine module
pub const DEFAULT_ENGINE_ASSET_PATH: &str = "/engine/ledger_engine_bg.wasm";
/// Default storage key for a persisted guest signer key
pub const DEFAULT_SIGNER_STORAGE_KEY: &str = "ledger-session:signer-key";
/// File name of the key store inside the storage directory
pub const KEY_STORE_FILE_NAME: &str = "signer-keys.json";
/// Directory name used under the platform data directory
pub const DEFAULT_STORAGE_DIR_NAME: &str = "ledger-session";
/// Maximum accepted engine module size (64 MB) - the engine bundles its own runtime
pub const MAX_ENGINE_MODULE_SIZE: usize = 64 * 1024 * 1024;
