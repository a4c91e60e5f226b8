//! Binding contract between a unit's WGSL and the host pipeline.

use std::borrow::Cow;

use anyhow::{ensure, Result};

/// A `(group, binding)` pair as written in WGSL `@group(g) @binding(b)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BindingSlot {
    pub group: u32,
    pub binding: u32,
}

impl BindingSlot {
    pub const fn new(group: u32, binding: u32) -> Self {
        Self { group, binding }
    }
}

#[derive(Debug, Clone)]
pub struct BindGroupContract {
    pub group: u32,
    pub label: &'static str,
    pub entries: Vec<wgpu::BindGroupLayoutEntry>,
}

impl BindGroupContract {
    pub fn entry(&self, binding: u32) -> Option<&wgpu::BindGroupLayoutEntry> {
        self.entries.iter().find(|e| e.binding == binding)
    }
}

/// Everything a host needs to build a pipeline for one shading unit.
#[derive(Debug, Clone)]
pub struct UnitContract {
    pub label: &'static str,
    pub source: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
    /// In buffer slot order.
    pub vertex_buffers: Vec<wgpu::VertexBufferLayout<'static>>,
    /// Sorted by group index, no gaps.
    pub bind_groups: Vec<BindGroupContract>,
    /// Bytes of immediate data; zero when the unit uses none.
    pub immediate_size: u32,
}

impl UnitContract {
    pub fn shader_source(&self) -> wgpu::ShaderModuleDescriptor<'static> {
        wgpu::ShaderModuleDescriptor {
            label: Some(self.label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(self.source)),
        }
    }

    pub fn bind_group(&self, group: u32) -> Option<&BindGroupContract> {
        self.bind_groups.iter().find(|g| g.group == group)
    }

    pub fn binding(&self, slot: BindingSlot) -> Option<&wgpu::BindGroupLayoutEntry> {
        self.bind_group(slot.group)?.entry(slot.binding)
    }

    pub fn bind_group_layout_descriptor(&self, group: u32) -> Option<wgpu::BindGroupLayoutDescriptor<'_>> {
        self.bind_group(group).map(|g| wgpu::BindGroupLayoutDescriptor {
            label: Some(g.label),
            entries: &g.entries,
        })
    }

    /// `layouts` must be created from `bind_group_layout_descriptor` in group order.
    pub fn pipeline_layout_descriptor<'a>(
        &'a self,
        layouts: &'a [&'a wgpu::BindGroupLayout],
    ) -> wgpu::PipelineLayoutDescriptor<'a> {
        wgpu::PipelineLayoutDescriptor {
            label: Some(self.label),
            bind_group_layouts: layouts,
            immediate_size: self.immediate_size,
        }
    }

    pub fn required_features(&self) -> wgpu::Features {
        if self.immediate_size > 0 {
            wgpu::Features::IMMEDIATES
        } else {
            wgpu::Features::empty()
        }
    }

    /// Fails if a device with `features` and `limits` cannot run this unit.
    pub fn check_device(&self, features: wgpu::Features, limits: &wgpu::Limits) -> Result<()> {
        let missing = self.required_features().difference(features);
        ensure!(
            missing.is_empty(),
            "{}: device is missing features {missing:?}",
            self.label
        );
        ensure!(
            limits.max_immediate_size >= self.immediate_size,
            "{}: needs {} bytes of immediate data, device allows {}",
            self.label,
            self.immediate_size,
            limits.max_immediate_size
        );
        ensure!(
            limits.max_bind_groups as usize >= self.bind_groups.len(),
            "{}: needs {} bind groups, device allows {}",
            self.label,
            self.bind_groups.len(),
            limits.max_bind_groups
        );
        Ok(())
    }
}

// ── entry builders ────────────────────────────────────────────────────────

pub(crate) fn uniform_entry<T>(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
        },
        count: None,
    }
}

pub(crate) fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub(crate) fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}
