//! Rule-set lookup by register name.
//!
//! | register        | source                                                           |
//! |-----------------|------------------------------------------------------------------|
//! | `=`             | the expression register, used as a single alias name             |
//! | letter `x`      | buffer `dps_dial_augends_register_x`, else settings register `x` |
//! | anything else   | buffer `dps_dial_augends`, else the settings default rule-set    |
//!
//! Letters are case-insensitive. Every path falls back to [`DialSettings::augends`].

use dial_core::AugendEntry;
use tracing::debug;

use crate::dispatcher::DialError;
use crate::host::Host;
use crate::settings::DialSettings;

/// Buffer variable holding the default rule-set.
pub const BUFFER_AUGENDS: &str = "dps_dial_augends";

/// Prefix of buffer variables holding per-register rule-sets.
pub const BUFFER_REGISTER_PREFIX: &str = "dps_dial_augends_register_";

/// A register as classified for rule-set lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// `=`.
    Expression,
    /// A letter register, stored lower-cased.
    Letter(char),
    /// The unnamed register, digits and other special registers.
    Other,
}

impl Register {
    /// Classify a register name as reported by the host (`v:register`).
    pub fn parse(name: &str) -> Self {
        match name.chars().next() {
            Some('=') => Self::Expression,
            Some(c) if c.is_ascii_alphabetic() => Self::Letter(c.to_ascii_lowercase()),
            _ => Self::Other,
        }
    }

    /// Name of the buffer variable overriding this register's rule-set.
    pub fn buffer_variable(self) -> Option<String> {
        match self {
            Self::Expression => None,
            Self::Letter(c) => Some(format!("{BUFFER_REGISTER_PREFIX}{c}")),
            Self::Other => Some(BUFFER_AUGENDS.to_string()),
        }
    }
}

/// Resolve the rule-set entries for `register`.
pub fn resolve_entries<H: Host + ?Sized>(
    host: &H,
    settings: &DialSettings,
    register: Register,
) -> Result<Vec<AugendEntry>, DialError> {
    if register == Register::Expression {
        let name = host.expression_register()?;
        debug!(alias = %name, "rule-set from expression register");
        return Ok(vec![AugendEntry::Alias(name)]);
    }

    if let Some(variable) = register.buffer_variable()
        && let Some(value) = host.buffer_variable(&variable)?
    {
        debug!(%variable, "rule-set from buffer variable");
        return Ok(AugendEntry::list_from_value(&value)?);
    }

    let entries = match register {
        Register::Letter(c) => settings.register_entries(c),
        _ => None,
    }
    .unwrap_or(settings.augends.as_slice());
    Ok(entries.to_vec())
}
