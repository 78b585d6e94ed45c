//! Form-to-value translation for Kiln.
//!
//! Every form takes the unit's [`UnitContext`], a syntax node and a
//! [`FormRequest`], and yields either a [`ValueResult`] or a [`FormError`]
//! that has already been recorded in the unit's diagnostic log.
//!
//! # Forms
//!
//! | Form | Meaning |
//! |------|---------|
//! | atom | literal, boolean, character or variable reference |
//! | `(: base field)` | struct field reference, one implicit dereference |
//! | `(setf target value)` | store `value` through an address-producing `target` |
//! | `(# x)` / `(@ p)` | address-of / dereference |
//! | `(alignmentof T)`, `(sizeof T)`, `(offsetof S field)` | layout queries |
//!
//! Any form may be written `(core name ...)` to bypass user overrides.
//!
//! # Tracing
//!
//! Set `RUST_LOG=kiln_forms=debug` to see form entry and every speculative
//! rollback; `trace` adds each emitted instruction.

mod context;
mod error;
pub mod forms;
mod result;
mod scope;
#[cfg(test)]
mod test_helpers;

pub use context::{UnitConfig, UnitContext};
pub use error::{FormError, FormErrorKind};
pub use forms::{resolve_node, FormFn, FormRequest, FormTable};
pub use result::{AddressOf, FormResult, ValueResult};
pub use scope::{ScopeStack, Variable};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Call this early in tests or drivers to enable tracing output.
/// Uses `RUST_LOG` environment variable for filtering.
///
/// Example: `RUST_LOG=kiln_forms=debug cargo test`
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
