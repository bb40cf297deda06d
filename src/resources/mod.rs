/**
 * This module contains all logic for loading the cockpit model from the asset archive.
 *
 * Loading is three steps: read the entry, parse it (`gltf_parts` or `facet`),
 * then hand the typed byte ranges to `mesh` which builds device buffers.
 */
pub mod facet;
pub mod gltf_parts;
pub mod mesh;

use crate::{
    context::GraphicsDevice,
    errors::{IngestError, Result},
    resources::{
        facet::ingest_facet_text,
        gltf_parts::GltfSource,
        mesh::{build_facet_model, build_parts, FacetModel, PartList},
    },
    settings::{CockpitSource, Settings},
    storage::Archive,
};

/// A cockpit as it is drawn: indexed parts, or one flat triangle list.
pub enum Cockpit<B> {
    Parts(PartList<B>),
    Facets(FacetModel<B>),
}

pub fn load_cockpit<D: GraphicsDevice, A: Archive + ?Sized>(
    device: &D,
    archive: &mut A,
    source: &CockpitSource,
    max_line_len: usize,
) -> Result<Cockpit<D::Buffer>> {
    let cockpit = match source {
        CockpitSource::Gltf(name) => Cockpit::Parts(load_gltf_parts(device, archive, name)?),
        CockpitSource::FacetText(name) => {
            Cockpit::Facets(load_facet_model(device, archive, name, max_line_len)?)
        }
    };
    Ok(cockpit)
}

/// The cockpit `settings` ask for.
///
/// A cockpit that fails to load is fatal only with
/// [`Settings::require_cockpit`]. Otherwise the failure is logged and the demo
/// flies without one.
pub fn load_optional_cockpit<D: GraphicsDevice, A: Archive + ?Sized>(
    device: &D,
    archive: &mut A,
    settings: &Settings,
) -> Result<Option<Cockpit<D::Buffer>>> {
    match load_cockpit(device, archive, &settings.cockpit, settings.max_line_len) {
        Ok(cockpit) => Ok(Some(cockpit)),
        Err(e) if settings.require_cockpit => Err(e),
        Err(e) => {
            log::warn!("flying without a cockpit, {} did not load: {}", settings.cockpit.name(), e);
            Ok(None)
        }
    }
}

pub fn load_gltf_parts<D: GraphicsDevice, A: Archive + ?Sized>(
    device: &D,
    archive: &mut A,
    name: &str,
) -> Result<PartList<D::Buffer>> {
    let bytes = archive.read_entry(name).inspect_err(|e| log::error!("{}", e))?;
    let source = GltfSource::open(name, &bytes, archive).inspect_err(|e| log::error!("{}", e))?;
    let parts = source.extract_parts().map_err(|e| {
        log::error!("{}: {}", name, e);
        IngestError::malformed(name, e)
    })?;
    let parts = build_parts(device, name, &parts).inspect_err(|e| log::error!("{}", e))?;
    log::info!("{}: {} parts", name, parts.len());
    Ok(parts)
}

pub fn load_facet_model<D: GraphicsDevice, A: Archive + ?Sized>(
    device: &D,
    archive: &mut A,
    name: &str,
    max_line_len: usize,
) -> Result<FacetModel<D::Buffer>> {
    let bytes = archive.read_entry(name).inspect_err(|e| log::error!("{}", e))?;
    let mesh = ingest_facet_text(&bytes, max_line_len).map_err(|e| {
        log::error!("{}: {}", name, e);
        IngestError::malformed(name, e)
    })?;
    let model = build_facet_model(device, name, &mesh).inspect_err(|e| log::error!("{}", e))?;
    log::info!("{}: {} vertices", name, model.vertex_count());
    Ok(model)
}
