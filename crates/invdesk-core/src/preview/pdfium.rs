//! Full page rasterization through a dynamically loaded pdfium library.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgba};
use pdfium_render::prelude::{PdfBitmapFormat, PdfRenderConfig, Pdfium};
use tracing::debug;

use super::{PageRenderer, Result};
use crate::error::RenderError;

/// Width pages are rasterized at before scaling to the viewport.
const RENDER_WIDTH: i32 = 1600;

pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Bind to pdfium next to the executable, falling back to the system library.
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| RenderError::Backend(e.to_string()))?;
        debug!("Bound pdfium library");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render_page(&self, path: &Path, page: u32) -> Result<DynamicImage> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| RenderError::Open(e.to_string()))?;

        let index = u16::try_from(page).map_err(|_| RenderError::InvalidPage(page))?;
        let pdf_page = document
            .pages()
            .get(index)
            .map_err(|_| RenderError::InvalidPage(page))?;

        let config = PdfRenderConfig::new()
            .set_target_width(RENDER_WIDTH)
            .render_form_data(false)
            .render_annotations(false)
            .set_reverse_byte_order(false)
            .set_format(PdfBitmapFormat::BGRA);

        let bitmap = pdf_page
            .render_with_config(&config)
            .map_err(|e| RenderError::Backend(e.to_string()))?;

        let width = bitmap.width().max(0) as u32;
        let height = bitmap.height().max(0) as u32;
        let bgra = bitmap.as_raw_bytes();
        let stride = if height == 0 { 0 } else { bgra.len() / height as usize };

        let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height as usize {
            for x in 0..width as usize {
                let i = y * stride + x * 4;
                let px = bgra.get(i..i + 4).unwrap_or(&[255, 255, 255, 255]);
                rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        }

        ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, rgba)
            .map(DynamicImage::ImageRgba8)
            .ok_or(RenderError::Empty(page))
    }
}
