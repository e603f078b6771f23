use std::sync::Arc;

use crate::foundation::core::Extent;
use crate::shader::config::PassConfig;
use crate::shader::program::ShaderPass;
use crate::shader::registry::PropertyId;

/// Texture reference inside a recorded command list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureId {
    /// The camera's current color target.
    CameraTarget,
    /// Input color handed to a custom pass.
    Source,
    /// Output color handed to a custom pass.
    Destination,
    /// Named temporary target owned by the list.
    Temporary(PropertyId),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// Platform default color format.
    #[default]
    Default,
    Rgba16Float,
}

/// Temporary target request; sampling is always bilinear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TemporaryDesc {
    pub size: Extent,
    pub format: TextureFormat,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    GetTemporary {
        id: PropertyId,
        desc: TemporaryDesc,
    },
    ReleaseTemporary {
        id: PropertyId,
    },
    SetGlobalUint {
        property: PropertyId,
        value: u32,
    },
    Blit {
        src: TextureId,
        dst: TextureId,
        pass: ShaderPass,
        config: Arc<PassConfig>,
    },
}

/// Ordered, host-neutral command buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandList {
    pub name: String,
    pub commands: Vec<Command>,
}

impl CommandList {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: Vec::new(),
        }
    }

    pub fn get_temporary(&mut self, id: PropertyId, desc: TemporaryDesc) {
        self.commands.push(Command::GetTemporary { id, desc });
    }

    pub fn release_temporary(&mut self, id: PropertyId) {
        self.commands.push(Command::ReleaseTemporary { id });
    }

    pub fn set_global_uint(&mut self, property: PropertyId, value: u32) {
        self.commands.push(Command::SetGlobalUint { property, value });
    }

    pub fn blit(
        &mut self,
        src: TextureId,
        dst: TextureId,
        pass: ShaderPass,
        config: Arc<PassConfig>,
    ) {
        self.commands.push(Command::Blit {
            src,
            dst,
            pass,
            config,
        });
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Point every blit at a new configuration without re-recording the list.
    pub fn rebind_config(&mut self, config: &Arc<PassConfig>) {
        for cmd in &mut self.commands {
            if let Command::Blit { config: c, .. } = cmd {
                *c = Arc::clone(config);
            }
        }
    }

    pub fn temporary_acquisitions(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::GetTemporary { .. }))
            .count()
    }

    pub fn blit_passes(&self) -> Vec<ShaderPass> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Blit { pass, .. } => Some(*pass),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gfx/command.rs"]
mod tests;
