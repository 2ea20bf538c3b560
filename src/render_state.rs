use crate::id::TextureId;

/// GPU program a draw is rendered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Program {
    /// Native line primitive with a flat atlas color.
    AreaOutline,
    /// CPU-expanded quads offset by their normals in the vertex stage.
    Line,
    /// Incircle triangles clipped to a disc in the fragment stage.
    CapJoin,
    /// Quads sampling a stipple mask along their length.
    DashedLine,
}

/// Ordering bucket of the draw in the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum DepthLayer {
    #[default]
    Geometry,
    UserLine,
    Route,
    Overlay,
}

/// Everything the batching layer needs to know to bind a pipeline for a draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderState {
    pub program: Program,
    pub depth_layer: DepthLayer,
    pub color_texture: TextureId,
    pub mask_texture: Option<TextureId>,
    pub depth_test_enabled: bool,
    /// Overrides the layer's default depth comparison, e.g. so caps win over the line body.
    pub depth_function: Option<wgpu::CompareFunction>,
    /// Draw with the native line primitive instead of triangles.
    pub draw_as_line: bool,
    /// Width hint for native lines, in device pixels.
    pub line_width: u32,
}

impl RenderState {
    pub fn new(program: Program, depth_layer: DepthLayer, color_texture: TextureId) -> Self {
        Self {
            program,
            depth_layer,
            color_texture,
            mask_texture: None,
            depth_test_enabled: true,
            depth_function: None,
            draw_as_line: false,
            line_width: 1,
        }
    }

    pub fn with_mask_texture(mut self, texture: TextureId) -> Self {
        self.mask_texture = Some(texture);
        self
    }

    pub fn with_depth_test(mut self, enabled: bool) -> Self {
        self.depth_test_enabled = enabled;
        self
    }

    pub fn with_depth_function(mut self, function: wgpu::CompareFunction) -> Self {
        self.depth_function = Some(function);
        self
    }

    pub fn with_line(mut self, line_width: u32) -> Self {
        self.draw_as_line = true;
        self.line_width = line_width;
        self
    }

    /// Depth comparison the pipeline should use.
    pub fn depth_compare(&self) -> wgpu::CompareFunction {
        if !self.depth_test_enabled {
            return wgpu::CompareFunction::Always;
        }
        self.depth_function.unwrap_or(wgpu::CompareFunction::LessEqual)
    }

    /// Depth/stencil state for a pipeline rendering this state into `format`. Stencil is left
    /// untouched; lines never clip other content.
    pub fn depth_stencil_state(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: self.depth_test_enabled,
            depth_compare: self.depth_compare(),
            stencil: wgpu::StencilState {
                front: wgpu::StencilFaceState::IGNORE,
                back: wgpu::StencilFaceState::IGNORE,
                read_mask: 0,
                write_mask: 0,
            },
            bias: wgpu::DepthBiasState::default(),
        }
    }
}
