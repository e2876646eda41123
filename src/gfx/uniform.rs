//! Typed wrapper over a uniform buffer.

use std::marker::PhantomData;

/// A GPU uniform buffer tied to a `#[repr(C)]` content struct.
///
/// Rewrites are skipped when the content did not change since the last
/// upload, which keeps per-frame updates of static objects free.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        match type_name.rfind(':') {
            Some(pos) => &type_name[pos + 1..],
            None => type_name,
        }
    }

    /// Creates the buffer with its initial content uploaded.
    pub fn new_with_data(device: &wgpu::Device, initial: &Content) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", Self::name())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });

        buffer
            .slice(..)
            .get_mapped_range_mut()
            .clone_from_slice(bytemuck::bytes_of(initial));
        buffer.unmap();

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous: bytemuck::bytes_of(initial).to_vec(),
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: Content) {
        let bytes = bytemuck::bytes_of(&content);
        if self.previous == bytes {
            return;
        }
        queue.write_buffer(&self.buffer, 0, bytes);
        self.previous = bytes.to_vec();
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}
