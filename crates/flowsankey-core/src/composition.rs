//! Human-readable rendering of a material composition.
//!
//! Both representations (diagram markup and the single-line export form) are produced from
//! one pass over the fraction list, so tooltips and CSV rows cannot drift apart.

use crate::locale::{Localizer, NumberFormat};
use crate::records::{Composition, Materials, Repository};

pub const NO_COMPOSITION: &str = "no composition defined";
pub const MATERIAL_NOT_FOUND: &str = "material not found";
pub const AVOIDABLE: &str = "avoidable";

pub const MARKUP_LINE_BREAK: &str = "<br>";
pub const FLAT_DELIMITER: &str = " | ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionText {
    /// Diagram text; entries separated by `<br>`, names HTML-escaped.
    pub markup: String,
    /// Export text; entries separated by `" | "`, no markup.
    pub flattened: String,
}

struct Entry<'a> {
    percent: String,
    material: Option<&'a str>,
    avoidable: bool,
}

/// Percentage of a fraction, rounded to three decimal places.
pub fn fraction_percent(fraction: f64) -> f64 {
    (fraction * 100_000.0).round() / 1000.0
}

pub struct CompositionFormatter<'a> {
    materials: &'a Materials,
    localizer: &'a dyn Localizer,
    numbers: NumberFormat,
}

impl<'a> CompositionFormatter<'a> {
    pub fn new(
        materials: &'a Materials,
        localizer: &'a dyn Localizer,
        numbers: NumberFormat,
    ) -> Self {
        Self {
            materials,
            localizer,
            numbers,
        }
    }

    pub fn format(&self, composition: Option<&Composition>) -> CompositionText {
        let entries = composition
            .map(|c| {
                c.fractions
                    .iter()
                    .map(|f| Entry {
                        percent: self.numbers.format(fraction_percent(f.fraction)),
                        material: self.materials.get(f.material).map(|m| m.name.as_str()),
                        avoidable: f.avoidable,
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if entries.is_empty() {
            let placeholder = self.localizer.gettext(NO_COMPOSITION).into_owned();
            return CompositionText {
                markup: placeholder.clone(),
                flattened: placeholder,
            };
        }

        let not_found = self.localizer.gettext(MATERIAL_NOT_FOUND);
        let avoidable = self.localizer.gettext(AVOIDABLE);

        let mut markup = Vec::with_capacity(entries.len());
        let mut flattened = Vec::with_capacity(entries.len());
        for entry in &entries {
            let name = entry.material.unwrap_or(not_found.as_ref());

            let mut m = format!("{}% {}", entry.percent, htmlize::escape_text(name));
            let mut f = format!("{}% {}", entry.percent, name);
            if entry.avoidable {
                m.push_str(&format!(" <i>{}</i>", htmlize::escape_text(avoidable.as_ref())));
                f.push(' ');
                f.push_str(&avoidable);
            }
            markup.push(m);
            flattened.push(f);
        }

        CompositionText {
            markup: markup.join(MARKUP_LINE_BREAK),
            flattened: flattened.join(FLAT_DELIMITER),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{Catalog, Untranslated};
    use crate::records::{Fraction, MaterialRecord};

    fn materials() -> Materials {
        [
            MaterialRecord {
                id: 1,
                name: "Plastic".to_string(),
            },
            MaterialRecord {
                id: 2,
                name: "Food & Organics".to_string(),
            },
        ]
        .into_iter()
        .collect()
    }

    fn composition(fractions: &[(u64, f64, bool)]) -> Composition {
        Composition {
            fractions: fractions
                .iter()
                .map(|&(material, fraction, avoidable)| Fraction {
                    material,
                    fraction,
                    avoidable,
                })
                .collect(),
        }
    }

    #[test]
    fn missing_composition_renders_placeholder() {
        let materials = materials();
        let fmt = CompositionFormatter::new(&materials, &Untranslated, NumberFormat::default());
        let text = fmt.format(None);
        assert_eq!(text.markup, "no composition defined");
        assert_eq!(text.flattened, "no composition defined");

        let empty = Composition::default();
        assert_eq!(fmt.format(Some(&empty)).markup, "no composition defined");
    }

    #[test]
    fn percentages_keep_three_decimals() {
        let materials = materials();
        let fmt = CompositionFormatter::new(&materials, &Untranslated, NumberFormat::default());
        let text = fmt.format(Some(&composition(&[(1, 0.333333, false)])));
        assert_eq!(text.flattened, "33.333% Plastic");
        assert!(text.markup.contains("33.333%"));
    }

    #[test]
    fn unknown_material_and_avoidable_are_annotated() {
        let materials = materials();
        let fmt = CompositionFormatter::new(&materials, &Untranslated, NumberFormat::default());
        let text = fmt.format(Some(&composition(&[(1, 0.5, true), (99, 0.7, false)])));
        assert_eq!(
            text.markup,
            "50% Plastic <i>avoidable</i><br>70% material not found"
        );
        assert_eq!(text.flattened, "50% Plastic avoidable | 70% material not found");
    }

    #[test]
    fn inconsistent_sums_are_rendered_as_is() {
        let materials = materials();
        let fmt = CompositionFormatter::new(&materials, &Untranslated, NumberFormat::default());
        let text = fmt.format(Some(&composition(&[(1, 0.9, false), (2, 0.9, false)])));
        assert_eq!(text.flattened, "90% Plastic | 90% Food & Organics");
        assert_eq!(text.markup, "90% Plastic<br>90% Food &amp; Organics");
    }

    #[test]
    fn localized_markers_and_separators() {
        let materials = materials();
        let mut catalog = Catalog::default();
        catalog.insert("avoidable", "vermeidbar");
        let fmt =
            CompositionFormatter::new(&materials, &catalog, NumberFormat::for_language("de"));
        let text = fmt.format(Some(&composition(&[(1, 0.125, true)])));
        assert_eq!(text.flattened, "12,5% Plastic vermeidbar");
    }
}
