use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use prism_core::renderer::*;
use std::hint::black_box;

/// Counts dispatched draws and nothing else.
#[derive(Default)]
struct DrawCounter {
    draws: u64,
}

impl CommandBackend for DrawCounter {
    fn set_graphics_root_signature(&mut self, _: &SetGraphicsRootSignature) {}
    fn set_graphics_root_descriptor_table(&mut self, _: &SetGraphicsRootDescriptorTable) {}
    fn set_pipeline_state(&mut self, _: &SetPipelineState) {}
    fn set_vertex_array(&mut self, _: &SetVertexArray) {}
    fn set_primitive_topology(&mut self, _: &SetPrimitiveTopology) {}
    fn set_viewport_and_scissor_rectangle(&mut self, _: &SetViewportAndScissorRectangle) {}
    fn set_viewports(&mut self, _: &[Viewport]) {}
    fn set_scissor_rectangles(&mut self, _: &[ScissorRectangle]) {}
    fn set_render_target(&mut self, _: &SetRenderTarget) {}
    fn clear(&mut self, _: &Clear) {}
    fn resolve_multisample_framebuffer(&mut self, _: &ResolveMultisampleFramebuffer) {}
    fn copy_resource(&mut self, _: &CopyResource) {}
    fn draw(&mut self, _: &Draw) {
        self.draws += 1;
    }
    fn draw_indexed(&mut self, _: &DrawIndexed) {
        self.draws += 1;
    }
    fn draw_indirect(&mut self, _: &DrawIndirect) {}
    fn draw_indexed_indirect(&mut self, _: &DrawIndexedIndirect) {}
    fn copy_uniform_buffer_data(&mut self, _: &CopyUniformBufferData, data: &[u8]) {
        black_box(data);
    }
    fn copy_texture_buffer_data(&mut self, _: &CopyTextureBufferData, _: &[u8]) {}
}

fn populate(bucket: &mut CommandBucket<DrawKey>, draws: u32) {
    for i in 0..draws {
        // Pseudo-random pipelines and depths so the sort has work to do.
        let pipeline = (i.wrapping_mul(2_654_435_761) >> 28) as u16;
        let depth = i.wrapping_mul(40_503) & DrawKey::MAX_DEPTH;
        let head = bucket.add_with_payload(
            DrawKey::opaque(0, pipeline, (i % 32) as u16, depth),
            CopyUniformBufferData {
                uniform_buffer: ResourceId(1),
            },
            &[0u8; 64],
        );
        let _ = bucket.append(head, DrawIndexed::indices(36));
    }
}

fn bench_buckets(c: &mut Criterion) {
    let mut group = c.benchmark_group("Command Bucket");

    group.bench_function("Populate 10k chains", |b| {
        let mut bucket = CommandBucket::new();
        b.iter(|| {
            bucket.clear();
            populate(&mut bucket, 10_000);
            black_box(bucket.command_count());
        });
    });

    group.bench_function("Sort 10k chains", |b| {
        b.iter_batched(
            || {
                let mut bucket = CommandBucket::new();
                populate(&mut bucket, 10_000);
                bucket
            },
            |mut bucket| {
                bucket.sort();
                bucket
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("Submit 10k chains", |b| {
        let mut bucket = CommandBucket::new();
        populate(&mut bucket, 10_000);
        bucket.sort();
        b.iter(|| {
            let mut backend = DrawCounter::default();
            bucket.submit(&mut backend);
            black_box(backend.draws);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_buckets);
criterion_main!(benches);
