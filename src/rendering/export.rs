use super::painter;
use super::scene::Scene;
use crate::error::{Error, Result};
use std::path::Path;

// --- File Export Entry Points ---

pub fn export_png(scene: &Scene, path: &Path) -> Result<()> {
    let projection = painter::project(scene, &scene.style);
    let err = |e: cairo::Error| Error::export(path, e.to_string());

    let surface = cairo::ImageSurface::create(
        cairo::Format::ARgb32,
        projection.width.ceil() as i32,
        projection.height.ceil() as i32,
    )
    .map_err(err)?;
    let cr = cairo::Context::new(&surface).map_err(err)?;
    painter::draw_projection(&cr, &projection, &scene.style, true).map_err(err)?;
    drop(cr);

    let mut file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    surface
        .write_to_png(&mut file)
        .map_err(|e| Error::export(path, e.to_string()))
}

pub fn export_pdf(scene: &Scene, path: &Path) -> Result<()> {
    let projection = painter::project(scene, &scene.style);
    let err = |e: cairo::Error| Error::export(path, e.to_string());

    let surface = cairo::PdfSurface::new(projection.width, projection.height, path).map_err(err)?;
    let cr = cairo::Context::new(&surface).map_err(err)?;
    painter::draw_projection(&cr, &projection, &scene.style, true).map_err(err)?;
    drop(cr);

    surface.finish();
    surface.status().map_err(err)
}

pub fn export_svg(scene: &Scene, path: &Path) -> Result<()> {
    let projection = painter::project(scene, &scene.style);
    let err = |e: cairo::Error| Error::export(path, e.to_string());

    let surface =
        cairo::SvgSurface::new(projection.width, projection.height, Some(path)).map_err(err)?;
    let cr = cairo::Context::new(&surface).map_err(err)?;
    // Transparent background keeps the SVG embeddable
    painter::draw_projection(&cr, &projection, &scene.style, false).map_err(err)?;
    drop(cr);

    surface.finish();
    surface.status().map_err(err)
}
