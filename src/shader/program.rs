use std::collections::HashMap;

use crate::foundation::error::{NtscError, NtscResult};
use crate::shader::registry::PROGRAM_NAME;

/// Pass indices of the shared program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderPass {
    /// RGB to YIQ with composite carrier artifacts.
    Encode = 0,
    /// YIQ to RGB with crosstalk.
    Decode = 1,
    /// Gaussian reconstruction onto the display.
    Reconstruct = 2,
    /// Downsample of the frame into the virtual buffer.
    Capture = 3,
}

impl ShaderPass {
    /// Execution order within a frame.
    pub const SEQUENCE: [ShaderPass; 4] = [
        Self::Capture,
        Self::Encode,
        Self::Decode,
        Self::Reconstruct,
    ];

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(Self::Encode),
            1 => Some(Self::Decode),
            2 => Some(Self::Reconstruct),
            3 => Some(Self::Capture),
            _ => None,
        }
    }
}

/// Resolved program as handed out by a [`ShaderLibrary`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderHandle {
    pub name: String,
    pub pass_count: u32,
}

/// Host shader lookup.
pub trait ShaderLibrary {
    fn find(&self, name: &str) -> Option<ShaderHandle>;
}

/// In-memory library; the CPU device provides the effect program through it.
#[derive(Clone, Debug, Default)]
pub struct StaticShaderLibrary {
    programs: HashMap<String, u32>,
}

impl StaticShaderLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_ntsc() -> Self {
        let mut lib = Self::empty();
        lib.register(PROGRAM_NAME, ShaderPass::SEQUENCE.len() as u32);
        lib
    }

    pub fn register(&mut self, name: impl Into<String>, pass_count: u32) {
        self.programs.insert(name.into(), pass_count);
    }
}

impl ShaderLibrary for StaticShaderLibrary {
    fn find(&self, name: &str) -> Option<ShaderHandle> {
        self.programs.get(name).map(|&pass_count| ShaderHandle {
            name: name.to_owned(),
            pass_count,
        })
    }
}

/// Look up the effect program and check it exposes all four passes.
pub fn find_program(library: &dyn ShaderLibrary) -> NtscResult<ShaderHandle> {
    let handle = library
        .find(PROGRAM_NAME)
        .ok_or_else(|| NtscError::missing_shader(PROGRAM_NAME))?;
    if handle.pass_count < ShaderPass::SEQUENCE.len() as u32 {
        return Err(NtscError::missing_shader(format!(
            "{PROGRAM_NAME} exposes {} passes, expected {}",
            handle.pass_count,
            ShaderPass::SEQUENCE.len()
        )));
    }
    Ok(handle)
}

/// Per-adapter program state.
///
/// Resolution happens once; a failed lookup leaves the slot `Missing` for the adapter's
/// lifetime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ProgramSlot {
    #[default]
    Unresolved,
    Ready(ShaderHandle),
    Missing,
}

impl ProgramSlot {
    pub fn resolve(&mut self, library: &dyn ShaderLibrary) -> bool {
        if let Self::Unresolved = self {
            *self = match find_program(library) {
                Ok(handle) => {
                    tracing::debug!(program = %handle.name, "shader program resolved");
                    Self::Ready(handle)
                }
                Err(err) => {
                    tracing::error!(error = %err, "NTSC effect disabled");
                    Self::Missing
                }
            };
        }
        self.is_ready()
    }

    /// Drop a resolved program; a missing one stays missing.
    pub fn release(&mut self) {
        if let Self::Ready(_) = self {
            *self = Self::Unresolved;
        }
    }

    pub fn handle(&self) -> Option<&ShaderHandle> {
        match self {
            Self::Ready(h) => Some(h),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shader/program.rs"]
mod tests;
