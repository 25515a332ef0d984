//! The request surface: five named operations driven by the host's key mappings.
//!
//! A normal-mode increment issues `selectAugendNormal`, then `textobj` (which binds the token
//! range), then `operatorNormal`. A dot-repeat skips the first request. Visual mode issues
//! `selectAugendVisual` followed by `operatorVisual`.

use dial_core::{Augend, AugendError, ConfigError, DialContextHandler, Direction, OperateResult};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::host::{CursorPosition, Host, HostError};
use crate::registers::{Register, resolve_entries};
use crate::settings::DialSettings;
use crate::visual::{operated_spans, probe_text};

/// Errors returned to the host for a failed request.
#[derive(Debug, Error)]
pub enum DialError {
    /// Bad configuration or a malformed argument.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A rule failed (typically a user callback).
    #[error(transparent)]
    Augend(#[from] AugendError),

    /// The host could not serve a read or write.
    #[error("host error: {0}")]
    Host(#[from] HostError),

    /// [`Dial::dispatch`] was given a method it does not know.
    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    /// Wrong number of arguments.
    #[error("'{method}' expects {expected} argument(s), got {got}")]
    Arity {
        /// Method name.
        method: &'static str,
        /// Expected argument count.
        expected: usize,
        /// Received argument count.
        got: usize,
    },
}

fn ensure_arity(method: &'static str, args: &[Value], expected: usize) -> Result<(), DialError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(DialError::Arity {
            method,
            expected,
            got: args.len(),
        })
    }
}

fn invalid(name: &'static str, expected: &str, value: &Value) -> ConfigError {
    ConfigError::InvalidArgument {
        name,
        message: format!("expected {expected}, got {value}"),
    }
}

fn ensure_number(name: &'static str, value: &Value) -> Result<i64, ConfigError> {
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
        .ok_or_else(|| invalid(name, "an integer", value))
}

fn ensure_string<'a>(name: &'static str, value: &'a Value) -> Result<&'a str, ConfigError> {
    value.as_str().ok_or_else(|| invalid(name, "a string", value))
}

fn ensure_bool(name: &'static str, value: &Value) -> Result<bool, ConfigError> {
    value.as_bool().ok_or_else(|| invalid(name, "a boolean", value))
}

fn ensure_direction(value: &Value) -> Result<Direction, ConfigError> {
    ensure_string("direction", value)?.parse()
}

/// Dial session bound to a host.
#[derive(Debug)]
pub struct Dial<H> {
    host: H,
    settings: DialSettings,
    handler: DialContextHandler,
}

impl<H: Host> Dial<H> {
    /// A session over `host` with `settings`.
    pub fn new(host: H, settings: DialSettings) -> Self {
        Self {
            host,
            settings,
            handler: DialContextHandler::new(),
        }
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Current settings.
    pub fn settings(&self) -> &DialSettings {
        &self.settings
    }

    /// Replace the settings; takes effect on the next rule selection.
    pub fn set_settings(&mut self, settings: DialSettings) {
        self.settings = settings;
    }

    /// The dot-repeat state.
    pub fn handler(&self) -> &DialContextHandler {
        &self.handler
    }

    /// Route a request by method name with JSON arguments.
    ///
    /// | method               | arguments                           |
    /// |----------------------|-------------------------------------|
    /// | `selectAugendNormal` | `count`, `register`                 |
    /// | `selectAugendVisual` | `count`, `register`                 |
    /// | `operatorNormal`     | `type`, `direction`                 |
    /// | `operatorVisual`     | `type`, `direction`, `stairlike`    |
    /// | `textobj`            | `count`                             |
    ///
    /// `type` is the operator motion type and is ignored.
    pub fn dispatch(&mut self, method: &str, args: &[Value]) -> Result<(), DialError> {
        debug!(method, ?args, "dispatch");
        match method {
            "selectAugendNormal" => {
                ensure_arity("selectAugendNormal", args, 2)?;
                let count = ensure_number("count", &args[0])?;
                let register = ensure_string("register", &args[1])?;
                self.select_augend_normal(count, register)
            }
            "selectAugendVisual" => {
                ensure_arity("selectAugendVisual", args, 2)?;
                let count = ensure_number("count", &args[0])?;
                let register = ensure_string("register", &args[1])?;
                self.select_augend_visual(count, register)
            }
            "operatorNormal" => {
                ensure_arity("operatorNormal", args, 2)?;
                let direction = ensure_direction(&args[1])?;
                self.operator_normal(direction).map(|_| ())
            }
            "operatorVisual" => {
                ensure_arity("operatorVisual", args, 3)?;
                let direction = ensure_direction(&args[1])?;
                let stairlike = ensure_bool("stairlike", &args[2])?;
                self.operator_visual(direction, stairlike)
            }
            "textobj" => {
                ensure_arity("textobj", args, 1)?;
                let count = ensure_number("count", &args[0])?;
                self.textobj(count)
            }
            other => Err(DialError::UnknownMethod(other.to_string())),
        }
    }

    /// Build the rule-set for `register`.
    pub fn rules(&self, register: &str) -> Result<Vec<Box<dyn Augend>>, DialError> {
        let entries = resolve_entries(&self.host, &self.settings, Register::parse(register))?;
        let callbacks = self.host.callbacks();
        Ok(self
            .settings
            .alias_table()
            .build_all(&entries, callbacks.as_ref())?)
    }

    /// Choose the rule for the token at the caret.
    pub fn select_augend_normal(&mut self, count: i64, register: &str) -> Result<(), DialError> {
        let cursor = self.host.cursor()?;
        let line = self.host.line(cursor.line)?;
        let rules = self.rules(register)?;
        self.handler.select_augend(&line, Some(cursor.col), count, rules)?;
        Ok(())
    }

    /// Choose the rule from the first line of the visual selection.
    pub fn select_augend_visual(&mut self, count: i64, register: &str) -> Result<(), DialError> {
        let region = self.host.visual_selection()?;
        let (top, _) = region.by_line();
        let line = self.host.line(top.line)?;
        let probe = probe_text(&region, &line);
        debug!(?region, probe, "visual probe");
        let rules = self.rules(register)?;
        self.handler.select_augend(probe, None, count, rules)?;
        Ok(())
    }

    /// Apply the bound operation on the caret line and write back what changed.
    pub fn operator_normal(&mut self, direction: Direction) -> Result<OperateResult, DialError> {
        let cursor = self.host.cursor()?;
        let line = self.host.line(cursor.line)?;
        let result = self.handler.operate(&line, cursor.col, direction)?;

        if let Some(new_line) = &result.line {
            self.host.set_line(cursor.line, new_line)?;
        }
        if let Some(col) = result.cursor {
            self.host.set_cursor(CursorPosition::new(cursor.line, col))?;
        }
        debug!(?direction, ?result, "normal operation");
        Ok(result)
    }

    /// Replay the selected rule on every line of the operated region.
    ///
    /// With `stairlike` the n-th line that actually changes is stepped n times as far.
    pub fn operator_visual(
        &mut self,
        direction: Direction,
        stairlike: bool,
    ) -> Result<(), DialError> {
        let region = self.host.operated_region()?;
        let mut tier = 1;
        for (lnum, span) in operated_spans(&region) {
            let line = self.host.line(lnum)?;
            let result = self.handler.operate_visual(&line, span, direction, tier)?;
            if let Some(new_line) = result.line {
                self.host.set_line(lnum, &new_line)?;
                if stairlike {
                    tier += 1;
                }
            }
        }
        debug!(?direction, stairlike, ?region, "visual operation");
        Ok(())
    }

    /// Bind the token range at the caret; a non-zero `count` replaces the repeat count.
    pub fn textobj(&mut self, count: i64) -> Result<(), DialError> {
        if count != 0 {
            self.handler.set_count(count);
        }
        let cursor = self.host.cursor()?;
        let line = self.host.line(cursor.line)?;
        self.handler.find_text_range(&line, cursor.col)?;
        Ok(())
    }
}
