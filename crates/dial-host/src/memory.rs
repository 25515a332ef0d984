//! An in-memory [`Host`] for tests and headless use.

use dial_core::CallbackHost;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::host::{CursorPosition, Host, HostError, Region};

/// A buffer held in memory, with a caret, selections and buffer variables.
#[derive(Clone, Default)]
pub struct MemoryHost {
    lines: Vec<String>,
    cursor: CursorPosition,
    visual: Option<Region>,
    operated: Option<Region>,
    variables: HashMap<String, Value>,
    expression: String,
    callbacks: Option<Rc<dyn CallbackHost>>,
}

impl MemoryHost {
    /// A buffer holding `text`, caret on line 1, column 1.
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            cursor: CursorPosition::new(1, 1),
            ..Self::default()
        }
    }

    /// All lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Buffer content joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Set the live visual selection.
    pub fn set_visual_selection(&mut self, region: Region) {
        self.visual = Some(region);
    }

    /// Set the region of the last operator.
    pub fn set_operated_region(&mut self, region: Region) {
        self.operated = Some(region);
    }

    /// Make both the live selection and the operated region `region`, as happens when a visual
    /// selection is handed to an operator.
    pub fn select(&mut self, region: Region) {
        self.visual = Some(region);
        self.operated = Some(region);
    }

    /// Set (or overwrite) a buffer-local variable.
    pub fn set_buffer_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Remove a buffer-local variable.
    pub fn unset_buffer_variable(&mut self, name: &str) {
        self.variables.remove(name);
    }

    /// Set the value the expression register evaluates to.
    pub fn set_expression_register(&mut self, expression: impl Into<String>) {
        self.expression = expression.into();
    }

    /// Install the callback bridge for user-defined rules.
    pub fn set_callbacks(&mut self, callbacks: Rc<dyn CallbackHost>) {
        self.callbacks = Some(callbacks);
    }

    fn index(&self, lnum: usize) -> Result<usize, HostError> {
        lnum.checked_sub(1)
            .filter(|idx| *idx < self.lines.len())
            .ok_or(HostError::LineOutOfRange(lnum))
    }
}

impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryHost")
            .field("lines", &self.lines)
            .field("cursor", &self.cursor)
            .field("visual", &self.visual)
            .field("operated", &self.operated)
            .finish_non_exhaustive()
    }
}

impl Host for MemoryHost {
    fn cursor(&self) -> Result<CursorPosition, HostError> {
        Ok(self.cursor)
    }

    fn line(&self, lnum: usize) -> Result<String, HostError> {
        let idx = self.index(lnum)?;
        Ok(self.lines[idx].clone())
    }

    fn set_line(&mut self, lnum: usize, text: &str) -> Result<(), HostError> {
        let idx = self.index(lnum)?;
        self.lines[idx] = text.to_string();
        Ok(())
    }

    fn set_cursor(&mut self, position: CursorPosition) -> Result<(), HostError> {
        self.index(position.line)?;
        self.cursor = position;
        Ok(())
    }

    fn visual_selection(&self) -> Result<Region, HostError> {
        self.visual.ok_or(HostError::NoRegion("visual"))
    }

    fn operated_region(&self) -> Result<Region, HostError> {
        self.operated.ok_or(HostError::NoRegion("operated"))
    }

    fn buffer_variable(&self, name: &str) -> Result<Option<Value>, HostError> {
        Ok(self.variables.get(name).cloned())
    }

    fn expression_register(&self) -> Result<String, HostError> {
        Ok(self.expression.clone())
    }

    fn callbacks(&self) -> Option<Rc<dyn CallbackHost>> {
        self.callbacks.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_one_based() {
        let mut host = MemoryHost::new("a\nb");
        assert_eq!(host.line(1).unwrap(), "a");
        assert_eq!(host.line(2).unwrap(), "b");
        assert!(matches!(host.line(0), Err(HostError::LineOutOfRange(0))));
        assert!(matches!(host.line(3), Err(HostError::LineOutOfRange(3))));

        host.set_line(2, "c").unwrap();
        assert_eq!(host.text(), "a\nc");
    }

    #[test]
    fn cursor_must_stay_in_the_buffer() {
        let mut host = MemoryHost::new("one");
        assert!(host.set_cursor(CursorPosition::new(2, 1)).is_err());
        host.set_cursor(CursorPosition::new(1, 3)).unwrap();
        assert_eq!(host.cursor().unwrap(), CursorPosition::new(1, 3));
    }
}
