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


// Prism Sandbox
// Renders a solid triangle and two blended ones for a few frames.
//
// Usage: sandbox [settings.json]
// The backend can be overridden with PRISM_BACKEND.

use anyhow::{Context, Result};
use prism_core::renderer::*;
use prism_infra::graphics::{CaptureBackend, CaptureEvent};
use prism_infra::{create_backend, init_logging, LoggingConfig};

const FRAMES: usize = 3;
const TRIANGLE_KEY: u32 = 42;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniforms {
    offset: [f32; 2],
}

struct Scene {
    swap_chain: Handle<SwapChain>,
    solid: Handle<PipelineState>,
    blended: Handle<PipelineState>,
    triangle: Handle<VertexArray>,
    uniforms: Handle<Buffer>,
}

fn load_settings() -> Result<RenderSettings> {
    let settings = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from '{path}'"))?;
            RenderSettings::from_json_str(&json)?
        }
        None => RenderSettings::default(),
    };
    Ok(settings.with_env_overrides())
}

fn build_scene(renderer: &Renderer) -> Result<Scene> {
    let swap_chain = renderer.create_swap_chain(&SwapChainDescriptor {
        label: Some("sandbox window".into()),
        native_window_handle: 1,
        width: 1280,
        height: 720,
        color_format: TextureFormat::Bgra8Unorm,
        depth_stencil_format: Some(TextureFormat::Depth32Float),
        vsync: true,
    })?;

    let shader = |stage, code: &'static str| {
        renderer.create_shader(&ShaderDescriptor {
            label: None,
            stage,
            source: ShaderSource::Source(code.into()),
            entry_point: "main".into(),
        })
    };
    let program = renderer.create_program(&ProgramDescriptor::new(
        shader(ShaderStage::Vertex, include_str!("shaders/triangle.vert"))?,
        shader(ShaderStage::Fragment, include_str!("shaders/triangle.frag"))?,
    ))?;
    let root_signature = renderer.create_root_signature(&RootSignatureDescriptor::default())?;

    let attributes = VertexAttributes::new(vec![VertexAttribute::per_vertex(
        "Position",
        VertexAttributeFormat::Float2,
        0,
        std::mem::size_of::<Vertex>() as u32,
    )]);
    let solid = renderer.create_pipeline_state(&PipelineStateDescriptor::new(
        root_signature.clone(),
        program.clone(),
        attributes.clone(),
    ))?;
    let blended = renderer.create_pipeline_state(&PipelineStateDescriptor {
        blend_state: BlendState::alpha_blending(),
        ..PipelineStateDescriptor::new(root_signature, program, attributes.clone())
    })?;

    let vertices = [
        Vertex { position: [0.0, 0.5] },
        Vertex { position: [-0.5, -0.5] },
        Vertex { position: [0.5, -0.5] },
    ];
    let vertex_buffer = renderer.create_vertex_buffer(
        std::mem::size_of_val(&vertices) as u64,
        Some(bytemuck::cast_slice(&vertices)),
        BufferUsage::StaticDraw,
    )?;
    let triangle = renderer.create_vertex_array(&VertexArrayDescriptor {
        label: Some("triangle".into()),
        vertex_attributes: attributes,
        vertex_buffers: vec![vertex_buffer],
        index_buffer: None,
    })?;
    let uniforms = renderer.create_uniform_buffer(
        std::mem::size_of::<ObjectUniforms>() as u64,
        None,
        BufferUsage::DynamicDraw,
    )?;

    Ok(Scene {
        swap_chain,
        solid,
        blended,
        triangle,
        uniforms,
    })
}

/// Adds one triangle as a chain: pipeline, geometry, uniforms, draw.
fn add_triangle(
    bucket: &mut CommandBucket<u32>,
    key: u32,
    scene: &Scene,
    pipeline_state: &Handle<PipelineState>,
    offset: [f32; 2],
) -> Result<()> {
    let head = bucket.add(key, SetPipelineState {
        pipeline_state: pipeline_state.id(),
    });
    let next = bucket.append(head, SetVertexArray {
        vertex_array: scene.triangle.id(),
    })?;
    let next = bucket.append_with_payload(
        next,
        CopyUniformBufferData {
            uniform_buffer: scene.uniforms.id(),
        },
        bytemuck::bytes_of(&ObjectUniforms { offset }),
    )?;
    bucket.append(next, Draw::vertices(3))?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging(&LoggingConfig::default());

    let settings = load_settings()?;
    let instance = create_backend(&settings)?;
    log::info!(
        "Sandbox running on '{}' ({:?})",
        instance.name(),
        instance.renderer.capabilities()
    );

    let scene = build_scene(&instance.renderer)?;
    let (mut backend, captured) = CaptureBackend::new(instance.command_backend);

    let mut frame_setup = CommandBuffer::with_settings(settings.command);
    let mut solid = CommandBucket::with_settings(settings.command);
    let mut transparent = CommandBucket::with_settings(settings.command);

    for frame in 0..FRAMES {
        frame_setup.set_debug_marker(&format!("frame {frame}"));
        frame_setup.push(SetRenderTarget::new(
            scene.swap_chain.id(),
            ResourceType::SwapChain,
        ));
        frame_setup.push(Clear::new(
            ClearFlags::COLOR_DEPTH,
            settings.clear_color,
            1.0,
            0,
        ));

        add_triangle(&mut solid, TRIANGLE_KEY, &scene, &scene.solid, [0.0, 0.0])?;
        add_triangle(&mut transparent, TRIANGLE_KEY, &scene, &scene.blended, [0.5, 0.0])?;
        add_triangle(&mut transparent, TRIANGLE_KEY - 1, &scene, &scene.blended, [-0.5, 0.0])?;
        solid.sort();
        transparent.sort();

        frame_setup.submit_and_clear(&mut backend);
        solid.submit_and_clear(&mut backend);
        transparent.submit_and_clear(&mut backend);

        let commands = captured
            .try_iter()
            .filter(|event| matches!(event, CaptureEvent::Command(_)))
            .count();
        log::info!("Frame {frame}: {commands} commands dispatched");
    }

    log::info!("Sandbox finished after {FRAMES} frames");
    Ok(())
}
