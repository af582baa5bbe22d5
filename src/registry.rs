//! Once-only module initialization.
//!
//! Every behavior module's setup must run at most once per page lifetime,
//! however many times the entry point is invoked (repeated `attach` calls,
//! double inclusion of the script this engine models). The registry is a
//! plain owned flag set — it lives on the engine, never in ambient global
//! state — and flags are set exactly once and never reset.

use std::collections::BTreeSet;

/// Owned record of which modules have already initialized.
#[derive(Debug, Default)]
pub struct ModuleRegistry {
    initialized: BTreeSet<&'static str>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `module` for initialization. True exactly once; afterwards the
    /// flag stays set and claiming is a silent no-op.
    pub fn claim(&mut self, module: &'static str) -> bool {
        self.initialized.insert(module)
    }

    /// Run `setup` if `module` has not initialized yet. Idempotent: on later
    /// calls the closure is not invoked — no side effect, no error.
    pub fn ensure_once(&mut self, module: &'static str, setup: impl FnOnce()) {
        if self.claim(module) {
            setup();
        }
    }

    pub fn is_initialized(&self, module: &str) -> bool {
        self.initialized.contains(module)
    }
}
