//! Grouping mapped code points by the advance width of their glyph.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use serde::Serialize;
use skrifa::MetadataProvider;
use write_fonts::{
    read::{FontRef, TableProvider},
    types::GlyphId,
};

use crate::error::{table, Error};

/// Code points grouped by the advance width of the glyph they map to.
///
/// Serializes as a JSON object whose keys are widths and whose values are
/// arrays of code points, e.g. `{"500": [65, 913], "600": [66]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WidthTable(BTreeMap<u16, Vec<u32>>);

impl WidthTable {
    /// All distinct widths, ascending.
    pub fn widths(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.keys().copied()
    }

    /// The code points whose glyph has `width`.
    pub fn code_points(&self, width: u16) -> &[u32] {
        self.0.get(&width).map(Vec::as_slice).unwrap_or_default()
    }

    /// The width recorded for `code_point`, if it is in the table.
    pub fn width_of(&self, code_point: u32) -> Option<u16> {
        self.0
            .iter()
            .find_map(|(width, cps)| cps.contains(&code_point).then_some(*width))
    }

    /// Number of distinct widths.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &[u32])> + '_ {
        self.0.iter().map(|(width, cps)| (*width, cps.as_slice()))
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, Error> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn write_json(&self, path: impl AsRef<Path>, pretty: bool) -> Result<(), Error> {
        let path = path.as_ref();
        let json = self.to_json(pretty)?;
        std::fs::write(path, json).map_err(|e| Error::io(path, e))
    }
}

/// Build the width table for `font`.
///
/// Only glyphs reachable from the Unicode character map are included. Glyphs
/// without a horizontal metric are skipped.
pub fn extract_glyph_widths(font: &FontRef) -> Result<WidthTable, Error> {
    let hmtx = table(font.hmtx())?;
    let num_glyphs = table(font.maxp())?.num_glyphs() as u32;

    let mut reverse_cmap: HashMap<GlyphId, Vec<u32>> = HashMap::new();
    for (code_point, gid) in font.charmap().mappings() {
        reverse_cmap.entry(gid).or_default().push(code_point);
    }

    let mut buckets = BTreeMap::<u16, Vec<u32>>::new();
    for gid in (0..num_glyphs).map(GlyphId::from) {
        let Some(code_points) = reverse_cmap.get_mut(&gid) else {
            continue;
        };
        let Some(advance) = hmtx.advance(gid) else {
            log::debug!("{gid} is mapped but has no advance, skipping");
            continue;
        };
        code_points.sort_unstable();
        buckets.entry(advance).or_default().extend_from_slice(code_points);
    }
    Ok(WidthTable(buckets))
}

/// Read the font at `input` and write its width table to `output` as JSON.
pub fn extract_widths_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    pretty: bool,
) -> Result<WidthTable, Error> {
    let input = input.as_ref();
    let output = output.as_ref();
    let data = std::fs::read(input).map_err(|e| Error::io(input, e))?;
    let font = FontRef::new(&data).map_err(|source| Error::InvalidFont {
        path: input.to_owned(),
        source,
    })?;
    let table = extract_glyph_widths(&font)?;
    table.write_json(output, pretty)?;
    log::info!("Glyph widths extracted and saved to {}", output.display());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fetstil_test_data::{bold_fixture, widths_fixture};
    use pretty_assertions::assert_eq;

    fn widths(data: &[u8]) -> WidthTable {
        let _ = env_logger::builder().is_test(true).try_init();
        extract_glyph_widths(&FontRef::new(data).unwrap()).unwrap()
    }

    #[test]
    fn groups_code_points_by_width() {
        let table = widths(&widths_fixture().build());
        assert_eq!(table.to_json(false).unwrap(), r#"{"500":[65,913],"600":[66]}"#);
    }

    #[test]
    fn unmapped_glyphs_are_dropped() {
        let table = widths(&widths_fixture().build());
        // .notdef and the ornament have no code points
        assert_eq!(table.widths().collect::<Vec<_>>(), vec![500, 600]);
        assert_eq!(table.code_points(700), &[] as &[u32]);
    }

    #[test]
    fn every_code_point_has_its_glyph_width() {
        let data = bold_fixture().build();
        let font = FontRef::new(&data).unwrap();
        let hmtx = font.hmtx().unwrap();
        let charmap = font.charmap();
        let table = widths(&data);
        for (width, code_points) in table.iter() {
            for cp in code_points {
                let gid = charmap.map(*cp).unwrap();
                assert_eq!(hmtx.advance(gid), Some(width), "U+{cp:04X}");
                assert_eq!(table.width_of(*cp), Some(width));
            }
        }
        assert_eq!(table.width_of('Z' as u32), None);
    }

    #[test]
    fn output_is_deterministic() {
        let data = bold_fixture().build();
        let first = widths(&data).to_json(true).unwrap();
        let second = widths(&data).to_json(true).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pretty_output_parses_back() {
        let table = widths(&widths_fixture().build());
        let json = table.to_json(true).unwrap();
        assert!(json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["500"], serde_json::json!([65, 913]));
        assert_eq!(value["600"], serde_json::json!([66]));
    }

    #[test]
    fn shared_widths_keep_glyph_order() {
        // space (250), A and Aacute (500), B and O (600)
        let table = widths(&bold_fixture().build());
        assert_eq!(table.len(), 3);
        assert_eq!(table.code_points(250), &[0x20]);
        assert_eq!(table.code_points(500), &[0x41, 0xC1]);
        assert_eq!(table.code_points(600), &[0x42, 0x4F]);
    }

    #[test]
    fn missing_hmtx_is_reported() {
        let data = widths_fixture().build();
        let font = FontRef::new(&data).unwrap();
        let mut builder = write_fonts::FontBuilder::new();
        for tag in [b"head", b"hhea", b"maxp", b"cmap"] {
            let tag = write_fonts::types::Tag::new(tag);
            builder.add_raw(tag, font.table_data(tag).unwrap().as_bytes());
        }
        let stripped = builder.build();
        let font = FontRef::new(&stripped).unwrap();
        assert!(matches!(
            extract_glyph_widths(&font),
            Err(Error::MissingTable(tag)) if tag == write_fonts::types::Tag::new(b"hmtx")
        ));
    }
}
