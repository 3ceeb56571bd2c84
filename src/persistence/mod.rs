//! Persistence port for editor state.
//!
//! The pane keeps three values in a key-value store: the last buffer text,
//! the raw autocomplete catalog, and the flag that disables the DROP
//! confirmation. The store itself is injected so the controller can be
//! exercised without touching disk.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use tracing::warn;

/// Key holding the last editor buffer text.
pub const QUERY_KEY: &str = "query";

/// Key holding the raw autocomplete catalog as a JSON array of `{name, ...}`.
pub const AUTOCOMPLETE_COLLECTION_KEY: &str = "autoCompleteCollection";

/// Key holding `"true"`/`"false"` for disabling the DROP confirmation.
pub const DISABLE_DROP_CONFIRM_KEY: &str = "disableDropAlertConfirm";

/// Minimal get/set interface over a string key-value store.
pub trait PersistencePort: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Returns true only when the disable flag is stored as the literal `"true"`.
///
/// A missing key, any other value, or a read failure leaves the gate armed.
pub fn confirmation_disabled(store: &dyn PersistencePort) -> bool {
    match store.get(DISABLE_DROP_CONFIRM_KEY) {
        Ok(Some(value)) => value == "true",
        Ok(None) => false,
        Err(e) => {
            warn!("Could not read confirmation flag, keeping gate armed: {e}");
            false
        }
    }
}

/// Persists the disable-confirmation flag.
pub fn set_confirmation_disabled(store: &dyn PersistencePort, disabled: bool) -> Result<()> {
    store.set(
        DISABLE_DROP_CONFIRM_KEY,
        if disabled { "true" } else { "false" },
    )
}
