//! Material colour substitution.

use crate::model::colour::{hex_to_rgba, to_linear};
use crate::model::document::ModelDocument;
use crate::model::template::ModelTemplate;
use crate::palette::Palette;
use crate::params::CanonicalParams;

/// Produce a copy of `template` with the requested material colours.
///
/// Values are checked against the palette again before use. Materials
/// without a name or without a matching parameter are left as they are.
pub fn customize(template: &ModelTemplate, params: &CanonicalParams, palette: &Palette) -> ModelDocument {
    let mut document = template.instantiate();

    for material in &mut document.materials {
        let Some(slot) = material.slot() else {
            continue;
        };
        let Some(token) = params.get(&slot) else {
            continue;
        };
        let Some(rgba) = palette.canonical(token).as_deref().and_then(hex_to_rgba) else {
            tracing::debug!(slot = %slot, token = %token, "Skipping colour outside the palette");
            continue;
        };

        material.set_base_color_factor(to_linear(rgba));
    }

    document
}
