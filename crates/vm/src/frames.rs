//! Variable frames: global, temporary and the local frame stack.
//!
//! The temporary frame is an `Option<Frame>`: `None` means no frame is
//! active. PUSHFRAME and POPFRAME move frames between the temporary slot
//! and the local stack, so each frame always has exactly one owner.

use std::collections::BTreeMap;

use ippcode_common::{ErrorCode, FrameKind, Value, VarRef};
use thiserror::Error;

/// Errors from frame and variable access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// `TF@` access while no temporary frame exists.
    #[error("temporary frame is not active")]
    NoTemporaryFrame,

    /// PUSHFRAME while no temporary frame exists.
    #[error("PUSHFRAME without an active temporary frame")]
    PushWithoutTemporary,

    /// `LF@` access or POPFRAME with an empty local frame stack.
    #[error("local frame stack is empty")]
    NoLocalFrame,

    /// Variable was never declared in its frame.
    #[error("variable {0} is not declared")]
    Undeclared(String),

    /// DEFVAR of a name that already exists in the frame.
    #[error("variable {0} is already declared")]
    Redeclared(String),

    /// Read of a declared variable that was never written.
    #[error("variable {0} is not initialized")]
    Uninitialized(String),
}

impl FrameError {
    /// Outcome code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            FrameError::NoTemporaryFrame | FrameError::Undeclared(_) => {
                ErrorCode::UndefinedVariable
            }
            FrameError::PushWithoutTemporary | FrameError::NoLocalFrame => ErrorCode::FrameAccess,
            FrameError::Redeclared(_) => ErrorCode::Semantic,
            FrameError::Uninitialized(_) => ErrorCode::MissingValue,
        }
    }
}

/// A namespace of variables. `None` slots are declared but uninitialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    vars: BTreeMap<String, Option<Value>>,
}

impl Frame {
    /// Declare `name` as uninitialized. Returns false if it already exists.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.vars.contains_key(name) {
            return false;
        }
        self.vars.insert(name.to_string(), None);
        true
    }

    /// The slot for `name`, if declared.
    pub fn slot(&self, name: &str) -> Option<&Option<Value>> {
        self.vars.get(name)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<Value>> {
        self.vars.get_mut(name)
    }

    /// Declared variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// The global frame, the temporary frame and the local frame stack.
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    global: Frame,
    temporary: Option<Frame>,
    locals: Vec<Frame>,
}

impl FrameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// CREATEFRAME: install a fresh, empty temporary frame.
    pub fn create_frame(&mut self) {
        self.temporary = Some(Frame::default());
    }

    /// PUSHFRAME: move the temporary frame onto the local stack.
    pub fn push_frame(&mut self) -> Result<(), FrameError> {
        let frame = self
            .temporary
            .take()
            .ok_or(FrameError::PushWithoutTemporary)?;
        self.locals.push(frame);
        Ok(())
    }

    /// POPFRAME: move the top local frame into the temporary slot.
    pub fn pop_frame(&mut self) -> Result<(), FrameError> {
        let frame = self.locals.pop().ok_or(FrameError::NoLocalFrame)?;
        self.temporary = Some(frame);
        Ok(())
    }

    pub fn global(&self) -> &Frame {
        &self.global
    }

    pub fn temporary(&self) -> Option<&Frame> {
        self.temporary.as_ref()
    }

    /// Local frames, innermost last.
    pub fn locals(&self) -> &[Frame] {
        &self.locals
    }

    fn frame(&self, kind: FrameKind) -> Result<&Frame, FrameError> {
        match kind {
            FrameKind::Global => Ok(&self.global),
            FrameKind::Temporary => self.temporary.as_ref().ok_or(FrameError::NoTemporaryFrame),
            FrameKind::Local => self.locals.last().ok_or(FrameError::NoLocalFrame),
        }
    }

    fn frame_mut(&mut self, kind: FrameKind) -> Result<&mut Frame, FrameError> {
        match kind {
            FrameKind::Global => Ok(&mut self.global),
            FrameKind::Temporary => self.temporary.as_mut().ok_or(FrameError::NoTemporaryFrame),
            FrameKind::Local => self.locals.last_mut().ok_or(FrameError::NoLocalFrame),
        }
    }

    /// DEFVAR: declare `var` as uninitialized in its frame.
    pub fn declare(&mut self, var: &VarRef) -> Result<(), FrameError> {
        if self.frame_mut(var.frame)?.declare(&var.name) {
            Ok(())
        } else {
            Err(FrameError::Redeclared(var.to_string()))
        }
    }

    /// Current slot contents of `var`: `None` if declared but uninitialized.
    pub fn lookup(&self, var: &VarRef) -> Result<Option<&Value>, FrameError> {
        self.frame(var.frame)?
            .slot(&var.name)
            .map(Option::as_ref)
            .ok_or_else(|| FrameError::Undeclared(var.to_string()))
    }

    /// Value of an initialized variable.
    pub fn read(&self, var: &VarRef) -> Result<&Value, FrameError> {
        self.lookup(var)?
            .ok_or_else(|| FrameError::Uninitialized(var.to_string()))
    }

    /// Overwrite the slot of a declared variable.
    pub fn write(&mut self, var: &VarRef, value: Value) -> Result<(), FrameError> {
        let slot = self
            .frame_mut(var.frame)?
            .slot_mut(&var.name)
            .ok_or_else(|| FrameError::Undeclared(var.to_string()))?;
        *slot = Some(value);
        Ok(())
    }
}
