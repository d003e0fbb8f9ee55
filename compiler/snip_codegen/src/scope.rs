//! Lexical scopes of locals within one method body.

use rustc_hash::FxHashMap;
use snip_ir::TypeTag;

/// A declared local (or parameter).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Local {
    pub slot: u16,
    pub ty: TypeTag,
}

/// Why a declaration was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Redeclaration {
    SameScope,
    EnclosingScope,
}

/// Stack of block scopes.
#[derive(Debug, Default)]
pub struct Scopes {
    frames: Vec<FxHashMap<String, Local>>,
}

impl Scopes {
    pub fn new() -> Self {
        Scopes::default()
    }

    pub fn push(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Innermost binding of `name`.
    pub fn lookup(&self, name: &str) -> Option<Local> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }

    /// Declare `name` in the innermost scope. Fails if the name is visible
    /// already, in this scope or an enclosing one.
    pub fn declare(&mut self, name: &str, local: Local) -> Result<(), Redeclaration> {
        let (innermost, enclosing) = match self.frames.split_last_mut() {
            Some(split) => split,
            None => return Ok(()),
        };
        if innermost.contains_key(name) {
            return Err(Redeclaration::SameScope);
        }
        if enclosing.iter().any(|frame| frame.contains_key(name)) {
            return Err(Redeclaration::EnclosingScope);
        }
        innermost.insert(name.to_string(), local);
        Ok(())
    }
}
