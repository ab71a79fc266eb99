use std::path::Path;
use std::process::Command;

use image::DynamicImage;

use crate::error::{ConfigError, ProcessError};
use crate::processor::PageRenderer;

/// Rasterizes pages with poppler's `pdftoppm`.
///
/// Each call renders exactly one page into its own temporary directory,
/// which is removed when the call returns, whether or not rendering worked.
#[derive(Debug, Clone)]
pub struct PdftoppmRenderer {
    dpi: u32,
}

impl PdftoppmRenderer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Checks that `pdftoppm` can be launched.
    pub fn check_available() -> Result<(), ConfigError> {
        Command::new("pdftoppm").arg("-v").output().map_err(|e| {
            ConfigError::RendererUnavailable(format!(
                "failed to run pdftoppm: {}. Make sure poppler-utils is installed.",
                e
            ))
        })?;
        Ok(())
    }
}

impl PageRenderer for PdftoppmRenderer {
    fn render_page(&self, path: &Path, page: u32) -> Result<DynamicImage, ProcessError> {
        let _span = tracing::info_span!("processor.render", page, dpi = self.dpi).entered();

        let scratch = tempfile::Builder::new()
            .prefix("pdfaudit_render_")
            .tempdir()
            .map_err(|e| ProcessError::RenderFailed(format!("failed to create temp dir: {}", e)))?;
        let output_prefix = scratch.path().join("page");

        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-gray")
            .arg("-singlefile")
            .args(["-r", &self.dpi.to_string()])
            .args(["-f", &page.to_string(), "-l", &page.to_string()])
            .arg(path)
            .arg(&output_prefix)
            .output()
            .map_err(|e| {
                ProcessError::RenderFailed(format!(
                    "failed to run pdftoppm: {}. Make sure poppler-utils is installed.",
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(ProcessError::RenderFailed(format!(
                "pdftoppm failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        // With -singlefile pdftoppm writes exactly <prefix>.png.
        let image_path = output_prefix.with_extension("png");
        let image = image::open(&image_path).map_err(|e| {
            ProcessError::RenderFailed(format!("failed to read rendered image: {}", e))
        })?;

        Ok(image)
    }
}
