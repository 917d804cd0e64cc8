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

mod common;

use anyhow::Result;
use common::CountingResources;
use prism_core::renderer::*;
use std::sync::Arc;

fn renderer() -> (Arc<CountingResources>, Renderer) {
    let backend = Arc::new(CountingResources::new());
    (backend.clone(), Renderer::new(backend))
}

#[test]
fn vertex_array_outlives_caller_handles() -> Result<()> {
    let (backend, renderer) = renderer();
    let vertices = renderer.create_vertex_buffer(3 * 12, None, BufferUsage::StaticDraw)?;
    let indices =
        renderer.create_index_buffer(3 * 2, None, BufferUsage::StaticDraw, IndexFormat::Uint16)?;
    let vertex_array = renderer.create_vertex_array(&VertexArrayDescriptor {
        label: Some("triangle".into()),
        vertex_attributes: VertexAttributes::new(vec![VertexAttribute::per_vertex(
            "Position",
            VertexAttributeFormat::Float3,
            0,
            12,
        )]),
        vertex_buffers: vec![vertices.clone()],
        index_buffer: Some(indices.clone()),
    })?;
    assert_eq!(vertices.reference_count(), 2);

    drop(vertices);
    drop(indices);
    assert_eq!(backend.live(), 3);
    assert_eq!(vertex_array.vertex_buffers()[0].reference_count(), 1);

    drop(vertex_array);
    assert_eq!(backend.live(), 0);
    assert_eq!(backend.destroyed(), 3);
    Ok(())
}

#[test]
fn resource_group_binds_to_its_root_parameter() -> Result<()> {
    let (backend, renderer) = renderer();
    let root_signature = renderer.create_root_signature(&RootSignatureDescriptor {
        label: Some("material".into()),
        parameters: vec![RootParameter {
            descriptor_ranges: vec![
                DescriptorRange {
                    range_type: DescriptorRangeType::ShaderResourceView,
                    number_of_descriptors: 1,
                    base_shader_register: 0,
                    base_shader_register_name: "DiffuseMap".into(),
                },
                DescriptorRange {
                    range_type: DescriptorRangeType::UniformBufferView,
                    number_of_descriptors: 1,
                    base_shader_register: 0,
                    base_shader_register_name: "Material".into(),
                },
            ],
            shader_visibility: Some(ShaderStage::Fragment),
        }],
        flags: RootSignatureFlags::ALLOW_INPUT_ASSEMBLER_INPUT_LAYOUT,
    })?;
    let texture = renderer.create_texture_2d(
        2,
        2,
        TextureFormat::Rgba8Unorm,
        TextureFlags::SHADER_RESOURCE,
        Some(&[255; 16]),
    )?;
    let uniforms = renderer.create_uniform_buffer(64, None, BufferUsage::DynamicDraw)?;
    let sampler = renderer.create_sampler_state(&SamplerStateDescriptor::default())?;

    let missing = renderer.create_resource_group(&ResourceGroupDescriptor {
        label: None,
        root_signature: root_signature.clone(),
        root_parameter_index: 1,
        resources: vec![GroupResource::Texture(texture.clone())],
        sampler_states: Vec::new(),
    });
    assert!(matches!(missing, Err(ResourceError::InvalidDescriptor { .. })));

    let group = renderer.create_resource_group(&ResourceGroupDescriptor {
        label: None,
        root_signature,
        root_parameter_index: 0,
        resources: vec![
            GroupResource::Texture(texture),
            GroupResource::Buffer(uniforms),
        ],
        sampler_states: vec![Some(sampler), None],
    })?;

    let mut buffer = CommandBuffer::new();
    buffer.push(SetGraphicsRootDescriptorTable::new(
        group.root_parameter_index(),
        group.id(),
        group.resource_type(),
    ));
    assert_eq!(buffer.len(), 1);

    drop(group);
    assert_eq!(backend.live(), 0);
    Ok(())
}

#[test]
fn swap_chain_resizes_through_the_backend() -> Result<()> {
    let (_backend, renderer) = renderer();
    let swap_chain = renderer.create_swap_chain(&SwapChainDescriptor {
        label: Some("main window".into()),
        native_window_handle: 0xdead_beef,
        width: 1280,
        height: 720,
        color_format: TextureFormat::Bgra8Unorm,
        depth_stencil_format: Some(TextureFormat::Depth24PlusStencil8),
        vsync: true,
    })?;
    swap_chain.resize(1920, 1080)?;
    assert_eq!(swap_chain.size(), (1920, 1080));
    assert!(matches!(
        swap_chain.resize(0, 1080),
        Err(ResourceError::InvalidDimensions { .. })
    ));
    assert_eq!(swap_chain.size(), (1920, 1080));
    Ok(())
}

#[test]
fn handles_are_shared_across_threads() -> Result<()> {
    let (backend, renderer) = renderer();
    let texture = renderer.create_texture_cube(
        16,
        TextureFormat::Rgba16Float,
        TextureFlags::SHADER_RESOURCE | TextureFlags::GENERATE_MIPMAPS,
        None,
    )?;
    assert_eq!(texture.mip_level_count(), 5);

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let texture = texture.clone();
            scope.spawn(move || {
                let copies: Vec<_> = (0..100).map(|_| texture.clone()).collect();
                assert!(copies.iter().all(|copy| copy.ptr_eq(&texture)));
            });
        }
    });
    assert_eq!(texture.reference_count(), 1);
    drop(texture);
    assert_eq!(backend.destroyed(), 1);
    Ok(())
}
