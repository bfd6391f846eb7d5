//! Page preview: rasterize a page and fit it to the viewport width.

mod embedded;
#[cfg(feature = "pdfium")]
mod pdfium;

pub use embedded::EmbeddedImageRenderer;
#[cfg(feature = "pdfium")]
pub use pdfium::PdfiumRenderer;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::error::RenderError;
use crate::pdf::is_pdf;

/// Result type for rendering.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Turns a document page into a bitmap.
pub trait PageRenderer {
    /// Render the page at zero-based `page` of the document at `path`.
    fn render_page(&self, path: &Path, page: u32) -> Result<DynamicImage>;
}

impl<R: PageRenderer + ?Sized> PageRenderer for Box<R> {
    fn render_page(&self, path: &Path, page: u32) -> Result<DynamicImage> {
        (**self).render_page(path, page)
    }
}

/// Renderer for `backend`: `"embedded"`, or `"pdfium"` when built with it.
pub fn renderer_for(backend: &str) -> Result<Box<dyn PageRenderer>> {
    match backend {
        "embedded" => Ok(Box::new(EmbeddedImageRenderer::new())),
        #[cfg(feature = "pdfium")]
        "pdfium" => Ok(Box::new(PdfiumRenderer::new()?)),
        other => Err(RenderError::Backend(format!("renderer not available: {}", other))),
    }
}

/// Resize `image` to `width` pixels, keeping its aspect ratio.
pub fn scale_to_width(image: &DynamicImage, width: u32) -> RgbaImage {
    let width = width.max(1);
    let (w, h) = (image.width().max(1), image.height());
    let height = ((h as u64 * width as u64 + w as u64 / 2) / w as u64).max(1) as u32;
    imageops::resize(image, width, height, FilterType::Lanczos3)
}

/// Collapses bursts of events into one action after a quiet period.
///
/// Every [`schedule`](Self::schedule) replaces the pending deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the pending action is due at `now`. A due action is consumed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Preview of the first page of the selected document.
pub struct PreviewPane<R> {
    renderer: R,
    width: u32,
    current: Option<PathBuf>,
    image: Option<RgbaImage>,
    debouncer: Debouncer,
}

impl<R: PageRenderer> PreviewPane<R> {
    pub fn new(renderer: R, width: u32, resize_delay: Duration) -> Self {
        Self {
            renderer,
            width,
            current: None,
            image: None,
            debouncer: Debouncer::new(resize_delay),
        }
    }

    /// Show the first page of `path`.
    ///
    /// Files without a `.pdf` suffix are ignored and leave the current
    /// preview in place; returns whether anything was rendered.
    pub fn display(&mut self, path: &Path) -> Result<bool> {
        if !is_pdf(path) {
            debug!("Not previewing {}", path.display());
            return Ok(false);
        }

        self.current = Some(path.to_path_buf());
        self.debouncer.cancel();
        self.render()?;
        Ok(true)
    }

    /// Record a new viewport width; the re-render waits for [`poll`](Self::poll).
    pub fn resize(&mut self, width: u32, now: Instant) {
        if width == self.width {
            return;
        }
        self.width = width;
        if self.current.is_some() {
            self.debouncer.schedule(now);
        }
    }

    /// Re-render if a resize is due. Returns whether a render happened.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        if self.debouncer.poll(now) {
            self.render()?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn render(&mut self) -> Result<()> {
        let Some(path) = &self.current else {
            return Ok(());
        };
        let page = self.renderer.render_page(path, 0)?;
        let scaled = scale_to_width(&page, self.width);
        debug!(
            "Rendered {} at {}x{}",
            path.display(),
            scaled.width(),
            scaled.height()
        );
        self.image = Some(scaled);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedRenderer {
        calls: Cell<usize>,
    }

    impl PageRenderer for FixedRenderer {
        fn render_page(&self, _path: &Path, page: u32) -> Result<DynamicImage> {
            assert_eq!(page, 0);
            self.calls.set(self.calls.get() + 1);
            Ok(DynamicImage::new_rgba8(200, 100))
        }
    }

    fn pane() -> PreviewPane<FixedRenderer> {
        let renderer = FixedRenderer { calls: Cell::new(0) };
        PreviewPane::new(renderer, 800, Duration::from_millis(5))
    }

    #[test]
    fn test_scale_keeps_aspect_ratio() {
        let image = DynamicImage::new_rgba8(300, 200);
        let scaled = scale_to_width(&image, 150);
        assert_eq!(scaled.dimensions(), (150, 100));

        let scaled = scale_to_width(&image, 0);
        assert_eq!(scaled.dimensions(), (1, 1));
    }

    #[test]
    fn test_debouncer_reschedules() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(5));
        assert!(!debouncer.poll(start));

        debouncer.schedule(start);
        debouncer.schedule(start + Duration::from_millis(3));
        assert!(!debouncer.poll(start + Duration::from_millis(6)));
        assert!(debouncer.poll(start + Duration::from_millis(8)));
        assert!(!debouncer.is_pending());
        assert!(!debouncer.poll(start + Duration::from_millis(20)));
    }

    #[test]
    fn test_unknown_renderer() {
        assert!(renderer_for("embedded").is_ok());
        assert!(matches!(renderer_for("ghostscript"), Err(RenderError::Backend(_))));
    }

    #[test]
    fn test_display_ignores_non_pdf() {
        let mut pane = pane();
        assert!(!pane.display(Path::new("notes.txt")).unwrap());
        assert!(pane.image().is_none());
        assert_eq!(pane.renderer().calls.get(), 0);
    }

    #[test]
    fn test_display_renders_first_page() {
        let mut pane = pane();
        assert!(pane.display(Path::new("a.PDF")).unwrap());
        assert_eq!(pane.image().unwrap().dimensions(), (800, 400));
        assert_eq!(pane.current(), Some(Path::new("a.PDF")));
    }

    #[test]
    fn test_resize_burst_renders_once() {
        let start = Instant::now();
        let mut pane = pane();
        pane.display(Path::new("a.pdf")).unwrap();

        pane.resize(600, start);
        pane.resize(400, start + Duration::from_millis(2));
        assert!(!pane.poll(start + Duration::from_millis(4)).unwrap());
        assert!(pane.poll(start + Duration::from_millis(10)).unwrap());
        assert!(!pane.poll(start + Duration::from_millis(30)).unwrap());

        assert_eq!(pane.renderer().calls.get(), 2);
        assert_eq!(pane.image().unwrap().dimensions(), (400, 200));
    }

    #[test]
    fn test_resize_without_document() {
        let start = Instant::now();
        let mut pane = pane();
        pane.resize(300, start);
        assert!(!pane.poll(start + Duration::from_secs(1)).unwrap());
        assert_eq!(pane.width(), 300);
    }
}
