//! PDF page rendering via poppler's `pdftoppm`
//!
//! Page rasterization is delegated to the external tool rather than a
//! native PDF stack: the pipeline needs images for the layout/OCR models,
//! not extracted text.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::error::{Error, Result};

/// Renders PDF pages to PNG images
pub struct PdfRenderer {
    /// Render resolution
    dpi: u32,
}

impl PdfRenderer {
    /// Create a renderer
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    /// Render every page of `pdf` into `out_dir` as `page-N.png`, returning
    /// the image paths in page order.
    pub async fn render(&self, pdf: &[u8], out_dir: &Path) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(out_dir).await?;

        // pdftoppm reads from a file, so stage the upload in a temp dir
        let temp_dir = tempfile::tempdir()?;
        let input_path = temp_dir.path().join("upload.pdf");
        tokio::fs::write(&input_path, pdf).await?;

        let prefix = out_dir.join("page");
        let args = pdftoppm_args(self.dpi, &input_path, &prefix);

        let output = Command::new("pdftoppm")
            .args(&args)
            .output()
            .await
            .map_err(|e| Error::PdfRender(format!("Failed to run pdftoppm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::PdfRender(format!(
                "pdftoppm exited with {}: {}",
                output.status, stderr
            )));
        }

        let pages = collect_page_images(out_dir).await?;
        if pages.is_empty() {
            return Err(Error::PdfRender(
                "pdftoppm produced no page images".to_string(),
            ));
        }

        Ok(pages)
    }
}

/// Argument list for a `pdftoppm` invocation
fn pdftoppm_args(dpi: u32, input: &Path, prefix: &Path) -> Vec<OsString> {
    vec![
        OsString::from("-png"),
        OsString::from("-r"),
        OsString::from(dpi.to_string()),
        input.as_os_str().to_os_string(),
        prefix.as_os_str().to_os_string(),
    ]
}

/// Collect `page-N.png` files from a directory, sorted by page number.
/// pdftoppm zero-pads page numbers, so numeric ordering is required.
async fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut pages: Vec<(u32, PathBuf)> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if let Some(number) = page_number(&path) {
            pages.push((number, path));
        }
    }

    pages.sort_by_key(|(number, _)| *number);
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// Parse the page number out of a `page-N.png` filename
fn page_number(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let digits = stem.rsplit('-').next()?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_include_format_resolution_and_paths() {
        let args = pdftoppm_args(150, Path::new("/tmp/in.pdf"), Path::new("/tmp/out/page"));
        assert_eq!(
            args,
            vec![
                OsString::from("-png"),
                OsString::from("-r"),
                OsString::from("150"),
                OsString::from("/tmp/in.pdf"),
                OsString::from("/tmp/out/page"),
            ]
        );
    }

    #[test]
    fn page_numbers_parse_with_zero_padding() {
        assert_eq!(page_number(Path::new("uploads/x/page-1.png")), Some(1));
        assert_eq!(page_number(Path::new("uploads/x/page-07.png")), Some(7));
        assert_eq!(page_number(Path::new("uploads/x/page-12.png")), Some(12));
        assert_eq!(page_number(Path::new("uploads/x/page-12.txt")), None);
        assert_eq!(page_number(Path::new("uploads/x/notes.png")), None);
    }

    #[tokio::test]
    async fn collects_pages_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-2.png", "page-1.png"] {
            tokio::fs::write(dir.path().join(name), b"png").await.unwrap();
        }

        let pages = collect_page_images(dir.path()).await.unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["page-1.png", "page-2.png", "page-10.png"]);
    }
}
