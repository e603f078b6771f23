use crate::foundation::core::Extent;
use crate::foundation::error::{NtscError, NtscResult};
use crate::gfx::command::{CommandList, TextureId};
use crate::gfx::device::GraphicsDevice;

/// Graph-scoped texture reference; only valid for the graph that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessFlags {
    Read,
    Write,
    ReadWrite,
}

type RenderFunc = Box<dyn FnOnce(&mut UnsafeGraphContext<'_>) -> NtscResult<()>>;

struct GraphPass {
    name: String,
    accesses: Vec<(TextureHandle, AccessFlags)>,
    render: Option<RenderFunc>,
}

#[derive(Clone, Copy, Debug)]
struct ImportedTexture {
    id: TextureId,
    size: Extent,
}

/// Minimal frame graph: imported textures plus "unsafe" passes that record raw commands.
#[derive(Default)]
pub struct RenderGraph {
    textures: Vec<ImportedTexture>,
    passes: Vec<GraphPass>,
}

impl RenderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn import_texture(&mut self, id: TextureId, size: Extent) -> TextureHandle {
        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(ImportedTexture { id, size });
        handle
    }

    pub fn descriptor(&self, handle: TextureHandle) -> Option<Extent> {
        self.textures.get(handle.0 as usize).map(|t| t.size)
    }

    pub fn pass_count(&self) -> usize {
        self.passes.len()
    }

    /// Declare a pass; `setup` states texture access and installs the render callback.
    pub fn add_unsafe_pass<F>(&mut self, name: impl Into<String>, setup: F) -> NtscResult<()>
    where
        F: FnOnce(&mut UnsafePassBuilder<'_>) -> NtscResult<()>,
    {
        let mut builder = UnsafePassBuilder {
            textures: &self.textures,
            accesses: Vec::new(),
            render: None,
        };
        setup(&mut builder)?;
        let UnsafePassBuilder {
            accesses, render, ..
        } = builder;
        self.passes.push(GraphPass {
            name: name.into(),
            accesses,
            render,
        });
        Ok(())
    }

    /// Run every pass callback, producing one command list per pass.
    pub fn compile(self) -> NtscResult<Vec<CommandList>> {
        let mut lists = Vec::with_capacity(self.passes.len());
        for pass in self.passes {
            let Some(render) = pass.render else {
                tracing::debug!(pass = %pass.name, "graph pass has no render function; culled");
                continue;
            };
            let mut ctx = UnsafeGraphContext {
                textures: &self.textures,
                accesses: &pass.accesses,
                list: CommandList::new(pass.name.clone()),
            };
            render(&mut ctx)?;
            lists.push(ctx.list);
        }
        Ok(lists)
    }

    pub fn execute(self, device: &mut dyn GraphicsDevice) -> NtscResult<()> {
        for list in self.compile()? {
            device.execute(&list)?;
        }
        Ok(())
    }
}

pub struct UnsafePassBuilder<'g> {
    textures: &'g [ImportedTexture],
    accesses: Vec<(TextureHandle, AccessFlags)>,
    render: Option<RenderFunc>,
}

impl UnsafePassBuilder<'_> {
    pub fn use_texture(&mut self, handle: TextureHandle, access: AccessFlags) -> NtscResult<()> {
        if handle.0 as usize >= self.textures.len() {
            return Err(NtscError::device(format!(
                "texture handle {handle:?} is not part of this graph"
            )));
        }
        self.accesses.push((handle, access));
        Ok(())
    }

    pub fn set_render_func<F>(&mut self, func: F)
    where
        F: FnOnce(&mut UnsafeGraphContext<'_>) -> NtscResult<()> + 'static,
    {
        self.render = Some(Box::new(func));
    }
}

/// Execution context handed to an unsafe pass callback.
pub struct UnsafeGraphContext<'g> {
    textures: &'g [ImportedTexture],
    accesses: &'g [(TextureHandle, AccessFlags)],
    list: CommandList,
}

impl UnsafeGraphContext<'_> {
    /// Resolve a handle the pass declared during setup.
    pub fn texture(&self, handle: TextureHandle) -> NtscResult<TextureId> {
        if !self.accesses.iter().any(|(h, _)| *h == handle) {
            return Err(NtscError::device(format!(
                "pass '{}' did not declare access to {handle:?}",
                self.list.name
            )));
        }
        self.textures
            .get(handle.0 as usize)
            .map(|t| t.id)
            .ok_or_else(|| NtscError::device(format!("unknown texture handle {handle:?}")))
    }

    pub fn texture_size(&self, handle: TextureHandle) -> NtscResult<Extent> {
        self.texture(handle)?;
        self.textures
            .get(handle.0 as usize)
            .map(|t| t.size)
            .ok_or_else(|| NtscError::device(format!("unknown texture handle {handle:?}")))
    }

    pub fn native_command_list(&mut self) -> &mut CommandList {
        &mut self.list
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/graph.rs"]
mod tests;
