use crate::foundation::core::Extent;
use crate::foundation::error::NtscResult;
use crate::gfx::command::CommandList;
use crate::gfx::device::GraphicsDevice;

/// Points in the fixed camera pipeline where command lists run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraEvent {
    BeforeImageEffects,
    AfterImageEffects,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommandListId(u32);

/// Camera of the fixed (legacy) pipeline.
#[derive(Debug)]
pub struct Camera {
    pixel_size: Extent,
    attached: Vec<(CommandListId, CameraEvent, CommandList)>,
    next_id: u32,
}

impl Camera {
    pub fn new(pixel_size: Extent) -> Self {
        Self {
            pixel_size,
            attached: Vec::new(),
            next_id: 0,
        }
    }

    pub fn pixel_size(&self) -> Extent {
        self.pixel_size
    }

    pub fn resize(&mut self, pixel_size: Extent) {
        self.pixel_size = pixel_size;
    }

    pub fn add_command_list(&mut self, event: CameraEvent, list: CommandList) -> CommandListId {
        let id = CommandListId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.attached.push((id, event, list));
        id
    }

    pub fn remove_command_list(&mut self, id: CommandListId) -> Option<CommandList> {
        let idx = self.attached.iter().position(|(i, _, _)| *i == id)?;
        Some(self.attached.remove(idx).2)
    }

    pub fn command_list_mut(&mut self, id: CommandListId) -> Option<&mut CommandList> {
        self.attached
            .iter_mut()
            .find(|(i, _, _)| *i == id)
            .map(|(_, _, list)| list)
    }

    pub fn command_lists(&self, event: CameraEvent) -> impl Iterator<Item = &CommandList> + '_ {
        self.attached
            .iter()
            .filter(move |(_, e, _)| *e == event)
            .map(|(_, _, list)| list)
    }

    /// Run the lists attached at each event, in attachment order.
    pub fn render(&self, device: &mut dyn GraphicsDevice) -> NtscResult<()> {
        for event in [CameraEvent::BeforeImageEffects, CameraEvent::AfterImageEffects] {
            for list in self.command_lists(event) {
                device.execute(list)?;
            }
        }
        Ok(())
    }
}

/// Project render-pipeline configuration; any asset means a modern pipeline drives cameras.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineSettings {
    pub default_pipeline: Option<String>,
    pub quality_pipeline: Option<String>,
}

impl PipelineSettings {
    pub fn is_legacy(&self) -> bool {
        self.default_pipeline.is_none() && self.quality_pipeline.is_none()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/camera.rs"]
mod tests;
