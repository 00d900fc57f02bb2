mod assemble;
mod assets;
mod error;
pub mod fields;
mod fonts;
pub mod model;
mod pdf;

pub use assemble::{
    AttributeRow, COMPLIANCE, DECLARATION_HEADING, DISCLAIMER, ParameterRow, SPEC_HEADERS, TITLE,
    assemble, attribute_rows, section_rows,
};
pub use assets::{AssetPaths, FOOTER_FILE, LOGO_FILE};
pub use error::Error;
pub use fields::FieldMap;
pub use pdf::render;

use std::path::Path;
use std::time::Instant;

/// Assemble and render in one go. Returns the complete PDF, or nothing.
pub fn generate_pdf(fields: &FieldMap, assets: &AssetPaths) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();

    let doc = assemble(fields, assets)?;
    let t_assemble = t0.elapsed();

    let bytes = render(&doc)?;

    log::info!(
        "Timing: assemble={:.1}ms, render={:.1}ms (output {} bytes)",
        t_assemble.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_assemble).as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(bytes)
}

/// Generate and write to `output`. The file is only created once the whole
/// document rendered.
pub fn write_pdf(fields: &FieldMap, assets: &AssetPaths, output: &Path) -> Result<(), Error> {
    let bytes = generate_pdf(fields, assets)?;
    std::fs::write(output, &bytes).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, output.display()),
        ))
    })?;
    log::info!("wrote {} ({} bytes)", output.display(), bytes.len());
    Ok(())
}
