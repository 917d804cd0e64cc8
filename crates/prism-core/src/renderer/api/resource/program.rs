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

//! Shaders and the programs linking them.

use super::{display_label, impl_resource, CreationContext, Handle, ResourceCore, ResourceType};
use crate::renderer::api::util::ShaderStage;
use crate::renderer::error::ResourceError;
use std::borrow::Cow;

impl ShaderStage {
    /// The resource type of a shader compiled for this stage.
    pub const fn resource_type(self) -> ResourceType {
        match self {
            ShaderStage::Vertex => ResourceType::VertexShader,
            ShaderStage::TessellationControl => ResourceType::TessellationControlShader,
            ShaderStage::TessellationEvaluation => ResourceType::TessellationEvaluationShader,
            ShaderStage::Geometry => ResourceType::GeometryShader,
            ShaderStage::Fragment => ResourceType::FragmentShader,
        }
    }
}

/// The code of a shader. Compiling source is up to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource<'a> {
    /// Shader source code in the backend's language.
    Source(Cow<'a, str>),
    /// Precompiled, backend-specific bytecode.
    Bytecode(Cow<'a, [u8]>),
}

impl ShaderSource<'_> {
    fn is_empty(&self) -> bool {
        match self {
            ShaderSource::Source(source) => source.trim().is_empty(),
            ShaderSource::Bytecode(bytecode) => bytecode.is_empty(),
        }
    }
}

/// A descriptor used to create a [`Shader`].
#[derive(Debug, Clone)]
pub struct ShaderDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The stage the shader is compiled for.
    pub stage: ShaderStage,
    /// The shader code.
    pub source: ShaderSource<'a>,
    /// The entry point function.
    pub entry_point: Cow<'a, str>,
}

impl ShaderDescriptor<'_> {
    pub(crate) fn validate(&self, ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        if self.source.is_empty() {
            return Err(ResourceError::InvalidDescriptor {
                resource_type: self.stage.resource_type(),
                details: format!("shader '{}' has no code", display_label(self.label.as_deref())),
            });
        }
        match self.stage {
            ShaderStage::Geometry if !ctx.capabilities.geometry_shader => {
                Err(ctx.unsupported("geometry shaders"))
            }
            ShaderStage::TessellationControl | ShaderStage::TessellationEvaluation
                if !ctx.capabilities.tessellation_shaders =>
            {
                Err(ctx.unsupported("tessellation shaders"))
            }
            _ => Ok(()),
        }
    }
}

/// A single compiled shader stage.
#[derive(Debug)]
pub struct Shader {
    core: ResourceCore,
    stage: ShaderStage,
    entry_point: String,
}

impl_resource!(Shader);

impl Shader {
    pub(crate) fn new(core: ResourceCore, descriptor: &ShaderDescriptor<'_>) -> Self {
        Self {
            core,
            stage: descriptor.stage,
            entry_point: descriptor.entry_point.to_string(),
        }
    }

    /// The stage the shader is compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The entry point function.
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

/// A descriptor used to create a [`Program`].
#[derive(Debug, Clone)]
pub struct ProgramDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// The vertex shader. Required.
    pub vertex_shader: Handle<Shader>,
    /// The tessellation control shader.
    pub tessellation_control_shader: Option<Handle<Shader>>,
    /// The tessellation evaluation shader.
    pub tessellation_evaluation_shader: Option<Handle<Shader>>,
    /// The geometry shader.
    pub geometry_shader: Option<Handle<Shader>>,
    /// The fragment shader.
    pub fragment_shader: Option<Handle<Shader>>,
}

impl<'a> ProgramDescriptor<'a> {
    /// A program made of a vertex and a fragment shader.
    pub fn new(vertex_shader: Handle<Shader>, fragment_shader: Handle<Shader>) -> Self {
        Self {
            label: None,
            vertex_shader,
            tessellation_control_shader: None,
            tessellation_evaluation_shader: None,
            geometry_shader: None,
            fragment_shader: Some(fragment_shader),
        }
    }

    /// Every shader of the program with the stage its slot expects.
    pub fn shaders(&self) -> impl Iterator<Item = (ShaderStage, &Handle<Shader>)> {
        [
            (ShaderStage::Vertex, Some(&self.vertex_shader)),
            (
                ShaderStage::TessellationControl,
                self.tessellation_control_shader.as_ref(),
            ),
            (
                ShaderStage::TessellationEvaluation,
                self.tessellation_evaluation_shader.as_ref(),
            ),
            (ShaderStage::Geometry, self.geometry_shader.as_ref()),
            (ShaderStage::Fragment, self.fragment_shader.as_ref()),
        ]
        .into_iter()
        .filter_map(|(stage, shader)| shader.map(|shader| (stage, shader)))
    }

    pub(crate) fn validate(&self, _ctx: &CreationContext<'_>) -> Result<(), ResourceError> {
        for (stage, shader) in self.shaders() {
            if shader.stage() != stage {
                return Err(ResourceError::InvalidDescriptor {
                    resource_type: ResourceType::Program,
                    details: format!(
                        "{:?} shader '{}' bound to the {:?} slot",
                        shader.stage(),
                        display_label(shader.core.label()),
                        stage
                    ),
                });
            }
        }
        if self.tessellation_control_shader.is_some()
            != self.tessellation_evaluation_shader.is_some()
        {
            return Err(ResourceError::InvalidDescriptor {
                resource_type: ResourceType::Program,
                details: "tessellation needs both a control and an evaluation shader".to_string(),
            });
        }
        Ok(())
    }
}

/// A linked set of shaders. The program keeps every shader alive.
#[derive(Debug)]
pub struct Program {
    core: ResourceCore,
    vertex_shader: Handle<Shader>,
    tessellation_control_shader: Option<Handle<Shader>>,
    tessellation_evaluation_shader: Option<Handle<Shader>>,
    geometry_shader: Option<Handle<Shader>>,
    fragment_shader: Option<Handle<Shader>>,
}

impl_resource!(Program);

impl Program {
    pub(crate) fn new(core: ResourceCore, descriptor: &ProgramDescriptor<'_>) -> Self {
        Self {
            core,
            vertex_shader: descriptor.vertex_shader.clone(),
            tessellation_control_shader: descriptor.tessellation_control_shader.clone(),
            tessellation_evaluation_shader: descriptor.tessellation_evaluation_shader.clone(),
            geometry_shader: descriptor.geometry_shader.clone(),
            fragment_shader: descriptor.fragment_shader.clone(),
        }
    }

    /// The vertex shader.
    pub fn vertex_shader(&self) -> &Handle<Shader> {
        &self.vertex_shader
    }

    /// The fragment shader, if any.
    pub fn fragment_shader(&self) -> Option<&Handle<Shader>> {
        self.fragment_shader.as_ref()
    }

    /// The geometry shader, if any.
    pub fn geometry_shader(&self) -> Option<&Handle<Shader>> {
        self.geometry_shader.as_ref()
    }

    /// Returns `true` if the program has tessellation stages.
    pub fn has_tessellation(&self) -> bool {
        self.tessellation_control_shader.is_some() && self.tessellation_evaluation_shader.is_some()
    }
}
