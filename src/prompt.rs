//! Prompt composition for the diffusion backend.
//!
//! The template is fixed. Identical requests must produce byte-identical
//! prompts, so generation results stay reproducible and debuggable; user
//! text is interpolated verbatim, never truncated or reordered.

use crate::models::{LogoRequest, Style};

/// Compose the generation prompt from a validated request.
///
/// Field order: description, business name, background type, aspect ratio,
/// styles (joined with `" and "` in selection order), closing instruction.
pub fn compose(request: &LogoRequest) -> String {
    let styles = request
        .styles
        .iter()
        .map(Style::as_str)
        .collect::<Vec<_>>()
        .join(" and ");

    format!(
        "Create a logo according to {} for my business called '{}'. \
         The logo should contain the business name. \
         The background should be {}. \
         The aspect ratio should be {}. \
         The style of the logo should be {}. \
         Make sure the design is visually appealing and reflects the essence of the business.",
        request.description,
        request.business_name,
        request.background_type.as_str(),
        request.aspect_ratio.as_str(),
        styles,
    )
}
