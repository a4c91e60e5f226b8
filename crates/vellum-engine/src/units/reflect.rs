//! Test-only WGSL reflection: parses a unit's source with naga and checks it
//! against the unit's `UnitContract`.

use naga::{AddressSpace, Binding, Module, Scalar, ShaderStage, TypeInner, VectorSize};

use super::{BindingSlot, UnitContract};

pub(crate) fn parse_and_validate(source: &str) -> Module {
    let module = match naga::front::wgsl::parse_str(source) {
        Ok(m) => m,
        Err(e) => panic!("wgsl parse error:\n{}", e.emit_to_string(source)),
    };
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    if let Err(e) = validator.validate(&module) {
        panic!("wgsl validation error: {e:?}");
    }
    module
}

/// `(slot, address space)` for every bound resource.
pub(crate) fn resource_bindings(module: &Module) -> Vec<(BindingSlot, AddressSpace)> {
    let mut out: Vec<_> = module
        .global_variables
        .iter()
        .filter_map(|(_, g)| {
            g.binding
                .as_ref()
                .map(|b| (BindingSlot::new(b.group, b.binding), g.space))
        })
        .collect();
    out.sort_by_key(|(slot, _)| (slot.group, slot.binding));
    out
}

pub(crate) fn immediate_size(module: &Module) -> u32 {
    let mut layouter = naga::proc::Layouter::default();
    layouter.update(module.to_ctx()).expect("layout");
    module
        .global_variables
        .iter()
        .filter(|(_, g)| g.space == AddressSpace::Immediate)
        .map(|(_, g)| layouter[g.ty].size)
        .sum()
}

pub(crate) fn entry_point<'m>(module: &'m Module, stage: ShaderStage) -> &'m naga::EntryPoint {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage)
        .unwrap_or_else(|| panic!("no {stage:?} entry point"))
}

/// Location bindings of an entry point's inputs (arguments flattened through structs).
pub(crate) fn input_locations(module: &Module, stage: ShaderStage) -> Vec<(u32, Binding, naga::Handle<naga::Type>)> {
    let ep = entry_point(module, stage);
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        match (&arg.binding, &module.types[arg.ty].inner) {
            (Some(b @ Binding::Location { location, .. }), _) => out.push((*location, b.clone(), arg.ty)),
            (None, TypeInner::Struct { members, .. }) => {
                for m in members {
                    if let Some(b @ Binding::Location { location, .. }) = &m.binding {
                        out.push((*location, b.clone(), m.ty));
                    }
                }
            }
            _ => {}
        }
    }
    out.sort_by_key(|(loc, ..)| *loc);
    out
}

fn vertex_format(module: &Module, ty: naga::Handle<naga::Type>) -> Option<wgpu::VertexFormat> {
    use wgpu::VertexFormat as F;
    match module.types[ty].inner {
        TypeInner::Scalar(s) if s == Scalar::F32 => Some(F::Float32),
        TypeInner::Scalar(s) if s == Scalar::U32 => Some(F::Uint32),
        TypeInner::Vector { size, scalar } if scalar == Scalar::F32 => Some(match size {
            VectorSize::Bi => F::Float32x2,
            VectorSize::Tri => F::Float32x3,
            VectorSize::Quad => F::Float32x4,
        }),
        _ => None,
    }
}

/// Vertex-stage `(location, format)` pairs as declared in WGSL.
pub(crate) fn vertex_inputs(module: &Module) -> Vec<(u32, Option<wgpu::VertexFormat>)> {
    input_locations(module, ShaderStage::Vertex)
        .into_iter()
        .map(|(loc, _, ty)| (loc, vertex_format(module, ty)))
        .collect()
}

/// Asserts the WGSL source agrees with every field of `contract`.
pub(crate) fn assert_contract_matches(contract: &UnitContract) {
    let module = parse_and_validate(contract.source);

    let vs = entry_point(&module, ShaderStage::Vertex);
    let fs = entry_point(&module, ShaderStage::Fragment);
    assert_eq!(vs.name, contract.vertex_entry);
    assert_eq!(fs.name, contract.fragment_entry);

    // Resources
    let declared = resource_bindings(&module);
    let expected: Vec<BindingSlot> = contract
        .bind_groups
        .iter()
        .flat_map(|g| g.entries.iter().map(move |e| BindingSlot::new(g.group, e.binding)))
        .collect();
    assert_eq!(
        declared.iter().map(|(slot, _)| *slot).collect::<Vec<_>>(),
        expected,
        "{}: resource slots",
        contract.label
    );
    for (slot, space) in &declared {
        let entry = contract.binding(*slot).expect("slot present");
        match entry.ty {
            wgpu::BindingType::Buffer { ty: wgpu::BufferBindingType::Uniform, .. } => {
                assert_eq!(*space, AddressSpace::Uniform, "{slot:?}")
            }
            wgpu::BindingType::Texture { .. } | wgpu::BindingType::Sampler(_) => {
                assert_eq!(*space, AddressSpace::Handle, "{slot:?}")
            }
            ref other => panic!("unexpected binding type {other:?}"),
        }
    }

    // Vertex inputs
    let mut expected_inputs: Vec<(u32, Option<wgpu::VertexFormat>)> = contract
        .vertex_buffers
        .iter()
        .flat_map(|l| l.attributes.iter().map(|a| (a.shader_location, Some(a.format))))
        .collect();
    expected_inputs.sort_by_key(|(loc, _)| *loc);
    assert_eq!(vertex_inputs(&module), expected_inputs, "{}: vertex inputs", contract.label);

    assert_eq!(immediate_size(&module), contract.immediate_size, "{}: immediates", contract.label);
}
