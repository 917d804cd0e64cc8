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


use anyhow::Result;
use prism_core::renderer::*;
use prism_infra::graphics::null::{NullCommandBackend, NullDevice};
use prism_infra::graphics::{CaptureBackend, CaptureEvent};
use prism_infra::create_backend;
use std::sync::Arc;

struct Scene {
    swap_chain: Handle<SwapChain>,
    pipeline_state: Handle<PipelineState>,
    vertex_array: Handle<VertexArray>,
    uniforms: Handle<Buffer>,
}

fn build_scene(renderer: &Renderer) -> Result<Scene> {
    let swap_chain = renderer.create_swap_chain(&SwapChainDescriptor {
        label: Some("main window".into()),
        native_window_handle: 1,
        width: 640,
        height: 480,
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
        shader(ShaderStage::Vertex, "void main() {}")?,
        shader(ShaderStage::Fragment, "void main() {}")?,
    ))?;
    let attributes = VertexAttributes::new(vec![VertexAttribute::per_vertex(
        "Position",
        VertexAttributeFormat::Float2,
        0,
        8,
    )]);
    let pipeline_state = renderer.create_pipeline_state(&PipelineStateDescriptor::new(
        renderer.create_root_signature(&RootSignatureDescriptor::default())?,
        program,
        attributes.clone(),
    ))?;

    let positions: [f32; 6] = [0.0, 0.5, -0.5, -0.5, 0.5, -0.5];
    let vertices = renderer.create_vertex_buffer(
        24,
        Some(bytemuck::cast_slice(&positions)),
        BufferUsage::StaticDraw,
    )?;
    let vertex_array = renderer.create_vertex_array(&VertexArrayDescriptor {
        label: Some("triangle".into()),
        vertex_attributes: attributes,
        vertex_buffers: vec![vertices],
        index_buffer: None,
    })?;
    let uniforms = renderer.create_uniform_buffer(8, None, BufferUsage::DynamicDraw)?;

    Ok(Scene {
        swap_chain,
        pipeline_state,
        vertex_array,
        uniforms,
    })
}

fn record_frame(scene: &Scene, offsets: &[[f32; 2]]) -> (CommandBuffer, CommandBucket<u32>) {
    let mut setup = CommandBuffer::new();
    setup.push(SetRenderTarget::new(scene.swap_chain.id(), ResourceType::SwapChain));
    setup.push(Clear::new(ClearFlags::COLOR | ClearFlags::DEPTH, [0.1, 0.1, 0.1, 1.0], 1.0, 0));

    let mut bucket = CommandBucket::new();
    for (key, offset) in offsets.iter().enumerate().rev() {
        let head = bucket.add(key as u32, SetPipelineState {
            pipeline_state: scene.pipeline_state.id(),
        });
        let next = bucket
            .append(head, SetVertexArray {
                vertex_array: scene.vertex_array.id(),
            })
            .expect("live handle");
        let next = bucket
            .append_with_payload(
                next,
                CopyUniformBufferData {
                    uniform_buffer: scene.uniforms.id(),
                },
                bytemuck::cast_slice(offset),
            )
            .expect("live handle");
        bucket.append(next, Draw::vertices(3)).expect("live handle");
    }
    bucket.sort();
    (setup, bucket)
}

#[test]
fn a_frame_reaches_the_null_backend() -> Result<()> {
    let device = NullDevice::default();
    let renderer = Renderer::new(Arc::new(device.clone()));
    let scene = build_scene(&renderer)?;
    let mut backend = NullCommandBackend::new(device.clone(), true);

    let offsets = [[0.0, 0.0], [0.5, 0.0], [-0.5, 0.0]];
    let (setup, mut bucket) = record_frame(&scene, &offsets);
    setup.submit(&mut backend);
    bucket.submit(&mut backend);

    let stats = backend.stats();
    assert_eq!(stats.submissions, 2);
    assert_eq!(stats.draw_calls, 3);
    assert_eq!(stats.commands_dispatched, 2 + 4 * 3);
    // One render target, one pipeline state and one vertex array; the repeats are elided.
    assert_eq!(stats.state_changes, 3);
    assert_eq!(stats.elided_state_changes, 4);
    assert_eq!(stats.uniform_bytes_uploaded, 3 * 8);

    // Chains run in key order, so the last upload is the one of the highest key.
    let last: &[u8] = bytemuck::cast_slice(&offsets[2]);
    assert_eq!(device.buffer_contents(scene.uniforms.id()), Some(last.to_vec()));
    Ok(())
}

#[test]
fn disabling_the_state_cache_forwards_every_binding() -> Result<()> {
    let settings = RenderSettings::from_json_str(r#"{ "state_cache": false }"#)?;
    let device = NullDevice::default();
    let renderer = Renderer::new(Arc::new(device.clone()));
    let scene = build_scene(&renderer)?;
    let mut backend = NullCommandBackend::new(device, settings.state_cache);

    let (_, mut bucket) = record_frame(&scene, &[[0.0, 0.0], [0.5, 0.0]]);
    bucket.submit(&mut backend);

    assert_eq!(backend.stats().state_changes, 4);
    assert_eq!(backend.stats().elided_state_changes, 0);
    Ok(())
}

#[test]
fn dropping_the_scene_releases_every_native_object() -> Result<()> {
    let device = NullDevice::default();
    let renderer = Renderer::new(Arc::new(device.clone()));
    let scene = build_scene(&renderer)?;
    assert_eq!(device.live_resource_count(), 9);
    assert!(device.allocated_bytes() > 0);

    scene.swap_chain.resize(800, 600)?;
    assert_eq!(device.swap_chain_extent(scene.swap_chain.id()), Some((800, 600)));

    drop(scene);
    assert_eq!(device.live_resource_count(), 0);
    assert_eq!(device.destroyed_resource_count(), 9);
    assert_eq!(device.allocated_bytes(), 0);
    Ok(())
}

#[test]
fn commands_on_released_resources_are_skipped() -> Result<()> {
    let device = NullDevice::default();
    let renderer = Renderer::new(Arc::new(device.clone()));
    let scene = build_scene(&renderer)?;
    let (setup, mut bucket) = record_frame(&scene, &[[0.0, 0.0]]);
    drop(scene);

    let mut backend = NullCommandBackend::new(device, true);
    setup.submit(&mut backend);
    bucket.submit(&mut backend);

    let stats = backend.stats();
    assert_eq!(stats.state_changes, 0);
    assert_eq!(stats.uniform_bytes_uploaded, 0);
    // Plain draws name no resource and still go through.
    assert_eq!(stats.draw_calls, 1);
    Ok(())
}

#[test]
fn selected_backend_runs_a_captured_frame() -> Result<()> {
    let settings = RenderSettings::from_json_str(r#"{ "backend": "Null" }"#)?
        .with_overrides_from(|_| None);
    let instance = create_backend(&settings)?;
    let scene = build_scene(&instance.renderer)?;

    let (mut capture, receiver) = CaptureBackend::new(instance.command_backend);
    let (setup, mut bucket) = record_frame(&scene, &[[0.0, 0.0], [0.5, 0.0]]);
    setup.submit(&mut capture);
    bucket.submit(&mut capture);

    let events: Vec<_> = receiver.try_iter().collect();
    let commands = events
        .iter()
        .filter(|event| matches!(event, CaptureEvent::Command(_)))
        .count();
    let submissions = events
        .iter()
        .filter(|event| **event == CaptureEvent::BeginSubmission)
        .count();
    assert_eq!(commands, 2 + 2 * 4);
    assert_eq!(submissions, 2);
    Ok(())
}
