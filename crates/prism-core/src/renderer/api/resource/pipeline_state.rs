// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Pipeline state objects: a program plus the fixed-function state bound with it.

use super::{
    impl_resource, CreationContext, Handle, Program, ResourceCore, ResourceType, RootSignature,
    VertexAttributes,
};
use crate::renderer::api::util::{CompareFunction, PrimitiveTopologyType, TextureFormat};
use crate::renderer::error::ResourceError;
use std::borrow::Cow;

/// How polygons are rasterized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Draw the edges only.
    Wireframe,
    /// Fill the polygon.
    #[default]
    Solid,
}

/// Which polygon faces are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// Keep every face.
    None,
    /// Discard front faces.
    Front,
    /// Discard back faces.
    #[default]
    Back,
}

/// Rasterizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterizerState {
    /// How polygons are rasterized.
    pub fill_mode: FillMode,
    /// Which faces are discarded.
    pub cull_mode: CullMode,
    /// If `true`, counter-clockwise polygons are front facing.
    pub front_counter_clockwise: bool,
    /// Constant depth added to every fragment.
    pub depth_bias: i32,
    /// If `true`, fragments outside of the scissor rectangle are discarded.
    pub scissor_enable: bool,
}

/// Depth and stencil test state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilState {
    /// If `true`, the depth test is performed.
    pub depth_enable: bool,
    /// If `true`, passing fragments write their depth.
    pub depth_write_enable: bool,
    /// The depth test comparison.
    pub depth_func: CompareFunction,
    /// If `true`, the stencil test is performed.
    pub stencil_enable: bool,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_enable: true,
            depth_write_enable: true,
            depth_func: CompareFunction::Less,
            stencil_enable: false,
        }
    }
}

/// A factor of the blend equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    /// `0`.
    Zero,
    /// `1`.
    One,
    /// The source alpha.
    SourceAlpha,
    /// `1 - source alpha`.
    OneMinusSourceAlpha,
}

/// The operation combining source and destination in the blend equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOperation {
    /// `source + destination`.
    Add,
    /// `source - destination`.
    Subtract,
}

/// Blend state of the render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendState {
    /// If `false`, fragments replace the destination.
    pub blend_enable: bool,
    /// The factor applied to the fragment color.
    pub source: BlendFactor,
    /// The factor applied to the destination color.
    pub destination: BlendFactor,
    /// The blend operation.
    pub operation: BlendOperation,
    /// If `true`, alpha is used as a multisample coverage mask.
    pub alpha_to_coverage_enable: bool,
}

impl BlendState {
    /// Classic "over" alpha blending, used for transparent geometry.
    pub fn alpha_blending() -> Self {
        Self {
            blend_enable: true,
            source: BlendFactor::SourceAlpha,
            destination: BlendFactor::OneMinusSourceAlpha,
            operation: BlendOperation::Add,
            alpha_to_coverage_enable: false,
        }
    }
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            blend_enable: false,
            source: BlendFactor::One,
            destination: BlendFactor::Zero,
            operation: BlendOperation::Add,
            alpha_to_coverage_enable: false,
        }
    }
}

/// A descriptor used to create a [`PipelineState`].
#[derive(Debug, Clone)]
pub struct PipelineStateDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The binding layout of the pipeline.
    pub root_signature: Handle<RootSignature>,
    /// The linked shaders.
    pub program: Handle<Program>,
    /// The vertex layout the program consumes.
    pub vertex_attributes: VertexAttributes,
    /// The class of primitives drawn with this pipeline.
    pub primitive_topology_type: PrimitiveTopologyType,
    /// Rasterizer state.
    pub rasterizer_state: RasterizerState,
    /// Depth and stencil state.
    pub depth_stencil_state: DepthStencilState,
    /// Blend state.
    pub blend_state: BlendState,
    /// The formats of the color attachments, one per render target.
    pub render_target_formats: Vec<TextureFormat>,
    /// The format of the depth-stencil attachment, if any.
    pub depth_stencil_format: Option<TextureFormat>,
}

impl<'a> PipelineStateDescriptor<'a> {
    /// A triangle pipeline with default state and a single `Rgba8Unorm` render target.
    pub fn new(
        root_signature: Handle<RootSignature>,
        program: Handle<Program>,
        vertex_attributes: VertexAttributes,
    ) -> Self {
        Self {
            label: None,
            root_signature,
            program,
            vertex_attributes,
            primitive_topology_type: PrimitiveTopologyType::Triangle,
            rasterizer_state: RasterizerState::default(),
            depth_stencil_state: DepthStencilState::default(),
            blend_state: BlendState::default(),
            render_target_formats: vec![TextureFormat::Rgba8Unorm],
            depth_stencil_format: Some(TextureFormat::Depth32Float),
        }
    }

    pub(crate) fn validate(&self, ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        let invalid = |details: String| ResourceError::InvalidDescriptor {
            resource_type: ResourceType::PipelineState,
            details,
        };
        if self.render_target_formats.len() > ctx.capabilities.max_simultaneous_render_targets as usize
        {
            return Err(ctx.unsupported(format!(
                "{} simultaneous render targets",
                self.render_target_formats.len()
            )));
        }
        if let Some(format) = self.render_target_formats.iter().find(|f| f.is_depth()) {
            return Err(invalid(format!("{format:?} is not a color format")));
        }
        if let Some(format) = self.depth_stencil_format.filter(|f| !f.is_depth()) {
            return Err(invalid(format!("{format:?} is not a depth format")));
        }
        let patches = self.primitive_topology_type == PrimitiveTopologyType::Patch;
        if patches != self.program.has_tessellation() {
            return Err(invalid(
                "patch topology and tessellation shaders must be used together".to_string(),
            ));
        }
        Ok(())
    }
}

/// An immutable bundle of a program and fixed-function state, bound atomically.
///
/// The pipeline state keeps its root signature and program alive.
#[derive(Debug)]
pub struct PipelineState {
    core: ResourceCore,
    root_signature: Handle<RootSignature>,
    program: Handle<Program>,
    vertex_attributes: VertexAttributes,
    primitive_topology_type: PrimitiveTopologyType,
    rasterizer_state: RasterizerState,
    depth_stencil_state: DepthStencilState,
    blend_state: BlendState,
}

impl_resource!(PipelineState);

impl PipelineState {
    pub(crate) fn new(core: ResourceCore, descriptor: &PipelineStateDescriptor<'_>) -> Self {
        Self {
            core,
            root_signature: descriptor.root_signature.clone(),
            program: descriptor.program.clone(),
            vertex_attributes: descriptor.vertex_attributes.clone(),
            primitive_topology_type: descriptor.primitive_topology_type,
            rasterizer_state: descriptor.rasterizer_state,
            depth_stencil_state: descriptor.depth_stencil_state,
            blend_state: descriptor.blend_state,
        }
    }

    /// The binding layout of the pipeline.
    pub fn root_signature(&self) -> &Handle<RootSignature> {
        &self.root_signature
    }

    /// The linked shaders.
    pub fn program(&self) -> &Handle<Program> {
        &self.program
    }

    /// The vertex layout the program consumes.
    pub fn vertex_attributes(&self) -> &VertexAttributes {
        &self.vertex_attributes
    }

    /// The class of primitives drawn with this pipeline.
    pub fn primitive_topology_type(&self) -> PrimitiveTopologyType {
        self.primitive_topology_type
    }

    /// Rasterizer state.
    pub fn rasterizer_state(&self) -> &RasterizerState {
        &self.rasterizer_state
    }

    /// Depth and stencil state.
    pub fn depth_stencil_state(&self) -> &DepthStencilState {
        &self.depth_stencil_state
    }

    /// Blend state.
    pub fn blend_state(&self) -> &BlendState {
        &self.blend_state
    }
}
