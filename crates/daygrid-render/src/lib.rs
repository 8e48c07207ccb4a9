//! # daygrid-render
//!
//! Rendering backends for daygrid timelines.
//!
//! This crate provides:
//! - Excel workbooks (the primary output)
//! - Text previews for the terminal
//! - Output writing with locked-file detection
//!
//! ## Example
//!
//! ```rust,ignore
//! use daygrid_core::{Renderer, TimelineConfig};
//! use daygrid_layout::build_timeline;
//! use daygrid_render::{ExcelRenderer, TextRenderer};
//!
//! let timeline = build_timeline(&TimelineConfig::default())?;
//!
//! // Workbook on disk
//! ExcelRenderer::new().save(&timeline.grid, "project_schedule.xlsx".as_ref())?;
//!
//! // Quick look in the terminal
//! let preview = TextRenderer::new().max_days(62).render(&timeline.grid)?;
//! println!("{preview}");
//! ```

pub mod excel;
pub mod text;

pub use excel::ExcelRenderer;
pub use text::TextRenderer;

use daygrid_core::RenderError;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Windows `ERROR_SHARING_VIOLATION`
const ERROR_SHARING_VIOLATION: i32 = 32;
/// Windows `ERROR_LOCK_VIOLATION`
const ERROR_LOCK_VIOLATION: i32 = 33;

/// Write rendered bytes to `path`, replacing any existing file
///
/// The file handle is closed before returning on every path.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
    debug!(path = %path.display(), bytes = bytes.len(), "writing output");
    let mut file = File::create(path).map_err(|e| classify_write_error(path, e))?;
    file.write_all(bytes)
        .and_then(|()| file.flush())
        .map_err(|e| classify_write_error(path, e))
}

/// Map an I/O failure on the output file to a render error
///
/// Permission failures (and sharing violations on Windows, which is how an
/// open spreadsheet shows up there) become [`RenderError::Locked`].
pub fn classify_write_error(path: &Path, err: io::Error) -> RenderError {
    let sharing_violation = cfg!(windows)
        && matches!(
            err.raw_os_error(),
            Some(ERROR_SHARING_VIOLATION | ERROR_LOCK_VIOLATION)
        );

    if err.kind() == io::ErrorKind::PermissionDenied || sharing_violation {
        RenderError::Locked {
            path: path.to_path_buf(),
        }
    } else {
        RenderError::Write {
            path: path.to_path_buf(),
            source: err,
        }
    }
}
