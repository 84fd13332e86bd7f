// crates/skyfire_core/src/renderer/store.rs
//! GPU-resident meshes and textures, addressed by the handles the game holds.

use std::collections::HashMap;
use std::path::Path;

use skyfire_shared::{AssetError, DrawableId, Mesh, TextureFilter, TextureId, Topology};
use tracing::debug;
use wgpu::util::DeviceExt;

use super::context::GraphicsContext;

pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub vertex_count: usize,
    pub index_count: u32,
    pub topology: Topology,
}

pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
}

pub struct GpuStore {
    pub texture_layout: wgpu::BindGroupLayout,
    meshes: HashMap<DrawableId, GpuMesh>,
    textures: HashMap<TextureId, GpuTexture>,
    /// 1x1 white, bound for vertex-colored draws.
    pub blank: GpuTexture,
}

/// Index data padded to the 4-byte copy alignment.
fn index_bytes(indices: &[u16]) -> Vec<u8> {
    let mut bytes: Vec<u8> = bytemuck::cast_slice(indices).to_vec();
    let padded = wgpu::util::align_to(bytes.len(), wgpu::COPY_BUFFER_ALIGNMENT as usize);
    bytes.resize(padded, 0);
    bytes
}

impl GpuStore {
    pub fn new(ctx: &GraphicsContext) -> Self {
        let texture_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some("texture_bind_group_layout"),
            });

        let blank = create_texture(
            ctx,
            &texture_layout,
            &[255; 4],
            (1, 1),
            TextureFilter::Nearest,
            "Blank Texture",
        );

        Self {
            texture_layout,
            meshes: HashMap::new(),
            textures: HashMap::new(),
            blank,
        }
    }

    pub fn mesh(&self, id: DrawableId) -> Option<&GpuMesh> {
        self.meshes.get(&id)
    }

    pub fn texture(&self, id: TextureId) -> Option<&GpuTexture> {
        self.textures.get(&id)
    }

    pub fn upload(&mut self, ctx: &GraphicsContext, id: DrawableId, mesh: &Mesh) {
        let vertex_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
        let index_buffer = ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: &index_bytes(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            });

        self.meshes.insert(
            id,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                vertex_count: mesh.vertices.len(),
                index_count: mesh.index_count(),
                topology: mesh.topology,
            },
        );
    }

    /// Writes in place when the sizes match, otherwise reallocates.
    pub fn update(&mut self, ctx: &GraphicsContext, id: DrawableId, mesh: &Mesh) {
        match self.meshes.get_mut(&id) {
            Some(gpu)
                if gpu.vertex_count == mesh.vertices.len()
                    && gpu.index_count == mesh.index_count() =>
            {
                ctx.queue.write_buffer(
                    &gpu.vertex_buffer,
                    0,
                    bytemuck::cast_slice(&mesh.vertices),
                );
                ctx.queue
                    .write_buffer(&gpu.index_buffer, 0, &index_bytes(&mesh.indices));
                gpu.topology = mesh.topology;
            }
            _ => self.upload(ctx, id, mesh),
        }
    }

    pub fn load_texture(
        &mut self,
        ctx: &GraphicsContext,
        id: TextureId,
        path: &Path,
        filter: TextureFilter,
    ) -> Result<(), AssetError> {
        let image = image::open(path).map_err(|err| match err {
            image::ImageError::IoError(source) => AssetError::io(path, source),
            image::ImageError::Unsupported(reason) => AssetError::unsupported(path, reason),
            other => AssetError::decode(path, other),
        })?;
        // Images are stored top row first; texture coordinates start at the bottom.
        let rgba = image.flipv().to_rgba8();
        let dimensions = rgba.dimensions();
        debug!(path = %path.display(), ?dimensions, ?filter, "Uploading texture");

        let label = path.to_string_lossy();
        let texture = create_texture(ctx, &self.texture_layout, &rgba, dimensions, filter, &label);
        self.textures.insert(id, texture);
        Ok(())
    }
}

fn create_texture(
    ctx: &GraphicsContext,
    layout: &wgpu::BindGroupLayout,
    rgba: &[u8],
    (width, height): (u32, u32),
    filter: TextureFilter,
    label: &str,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let filter_mode = match filter {
        TextureFilter::Nearest => wgpu::FilterMode::Nearest,
        TextureFilter::Linear => wgpu::FilterMode::Linear,
    };
    let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: filter_mode,
        min_filter: filter_mode,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
        label: Some(label),
    });

    GpuTexture {
        texture,
        bind_group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_index_counts_are_padded() {
        assert_eq!(index_bytes(&[0, 1, 2, 3, 0]).len(), 12);
        assert_eq!(index_bytes(&[0, 1, 3, 1, 2, 3]).len(), 12);
        assert_eq!(&index_bytes(&[7])[..], &[7, 0, 0, 0]);
    }
}
