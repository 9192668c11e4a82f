//! A uniform buffer holding exactly one value of type `A`.

use std::{marker::PhantomData, mem::size_of, num::NonZeroU64};

use wgpu::util::DeviceExt;

pub struct Var<A> {
    buffer: wgpu::Buffer,
    phantom_data: PhantomData<A>,
}

impl<A: bytemuck::Pod> Var<A> {
    /// Byte size of `A`; the smallest binding the shader may be given.
    pub fn binding_size() -> Option<NonZeroU64> {
        NonZeroU64::new(size_of::<A>() as u64)
    }

    /// Layout entry for binding `binding` as a uniform visible to `visibility`.
    pub fn layout_entry(
        binding: u32,
        visibility: wgpu::ShaderStages,
    ) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Self::binding_size(),
            },
            count: None,
        }
    }

    /// A `UNIFORM | COPY_DST` buffer initialised with `contents`.
    pub fn uniform(device: &wgpu::Device, label: &str, contents: A) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&contents),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Var {
            buffer,
            phantom_data: PhantomData,
        }
    }

    /// Queue a write of `contents`; it lands before any later submission.
    pub fn write(&self, queue: &wgpu::Queue, contents: A) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&contents));
    }

    pub fn bind_group_entry(&self, binding: u32) -> wgpu::BindGroupEntry {
        wgpu::BindGroupEntry {
            binding,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &self.buffer,
                offset: 0,
                size: Self::binding_size(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::Uniforms;

    #[test]
    fn binding_size_is_the_record_size() {
        assert_eq!(
            Var::<Uniforms>::binding_size().map(NonZeroU64::get),
            Some(size_of::<Uniforms>() as u64)
        );
    }

    #[test]
    fn layout_entry_requires_the_whole_record() {
        let entry = Var::<Uniforms>::layout_entry(0, wgpu::ShaderStages::FRAGMENT);

        assert_eq!(entry.binding, 0);
        assert_eq!(entry.visibility, wgpu::ShaderStages::FRAGMENT);
        match entry.ty {
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset,
                min_binding_size,
            } => {
                assert!(!has_dynamic_offset);
                assert_eq!(min_binding_size, Var::<Uniforms>::binding_size());
            }
            other => panic!("unexpected binding type {:?}", other),
        }
    }
}
