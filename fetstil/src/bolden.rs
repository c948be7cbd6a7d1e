//! Synthesizing a bold font by overstriking glyph outlines.
//!
//! Every simple glyph is drawn twice: once where it was, and once shifted
//! right by a fixed offset. The union of the two reads as a heavier stroke.
//! The advance width grows by the same offset so that spacing is preserved.

use std::path::Path;

use kurbo::{Affine, BezPath, Rect};
use skrifa::{
    outline::{pen::PathElement, DrawSettings, OutlineGlyphCollection},
    prelude::{LocationRef, Size},
    GlyphNames, MetadataProvider,
};
use write_fonts::{
    from_obj::ToOwnedTable,
    read::{
        tables::{
            glyf::{Anchor, Component, Glyf, Glyph, SimpleGlyph as ReadSimpleGlyph},
            loca::Loca,
        },
        FontRef, TableProvider, TopLevelTable,
    },
    tables::{glyf::Bbox, glyf::SimpleGlyph, head::Head, hhea::Hhea, maxp::Maxp},
    types::{GlyphId, Tag},
    FontBuilder,
};

use crate::{
    error::{table, Error},
    glyf_loca::GlyfLocaWriter,
    metrics::{self, HMetric},
    pens::{replay, OverstrikePen},
};

/// The offset used when none is given, in font units.
pub const DEFAULT_OFFSET: u16 = 100;

const MAX_NESTING_LEVEL: u8 = 64;
const GVAR: Tag = Tag::new(b"gvar");

/// Settings for [`bolden`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoldenOptions {
    /// Horizontal distance between the original outline and its copy.
    ///
    /// This is also added to the advance width of every emboldened glyph.
    pub offset: u16,
    /// Also embolden the `.notdef` glyph (glyph id 0).
    pub include_notdef: bool,
}

impl Default for BoldenOptions {
    fn default() -> Self {
        Self {
            offset: DEFAULT_OFFSET,
            include_notdef: false,
        }
    }
}

impl BoldenOptions {
    pub fn with_offset(offset: u16) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }
}

/// Counts reported after emboldening.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BoldenReport {
    /// Simple glyphs whose outline was overstruck.
    pub outlines: usize,
    /// Glyphs without contours that were only widened.
    pub empty: usize,
    /// Composite glyphs left as they were.
    pub composites: usize,
}

/// Read the font at `input`, embolden it, and write the result to `output`.
pub fn bolden_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &BoldenOptions,
) -> Result<BoldenReport, Error> {
    let input = input.as_ref();
    let output = output.as_ref();
    let data = std::fs::read(input).map_err(|e| Error::io(input, e))?;
    let font = FontRef::new(&data).map_err(|source| Error::InvalidFont {
        path: input.to_owned(),
        source,
    })?;
    let (bytes, report) = bolden(&font, options)?;
    std::fs::write(output, bytes).map_err(|e| Error::io(output, e))?;
    log::info!("Bold font saved as {}", output.display());
    Ok(report)
}

/// Embolden `font`, returning the compiled bytes of the new font.
///
/// Composite glyphs keep their original data. Every other table that is not
/// derived from outlines or metrics is copied unchanged.
pub fn bolden(font: &FontRef, options: &BoldenOptions) -> Result<(Vec<u8>, BoldenReport), Error> {
    if options.offset == 0 {
        return Err(Error::InvalidOffset);
    }
    if font.table_data(GVAR).is_some() {
        return Err(Error::VariableFont);
    }
    let names = GlyphNames::new(font);
    let mut glyphs = GlyphSet::load(font, &names)?;
    let report = glyphs.embolden(&font.outline_glyphs(), options, &names)?;
    log::info!(
        "emboldened {} outlines, widened {} empty glyphs, kept {} composites",
        report.outlines,
        report.empty,
        report.composites
    );
    let bytes = glyphs.compile(font, &names)?;
    Ok((bytes, report))
}

/// Draw a recorded outline twice into one path: in place, then shifted
/// right by `offset`.
///
/// `origin` is added to every x coordinate of both copies.
pub(crate) fn overstrike(recording: &[PathElement], origin: f64, offset: u16) -> BezPath {
    let mut pen = OverstrikePen::new();
    pen.set_shift(origin);
    replay(recording, &mut pen);
    pen.set_shift(origin + offset as f64);
    replay(recording, &mut pen);
    pen.into_path()
}

/// The outline state of one glyph.
enum Outline<'a> {
    Empty,
    Original(Glyph<'a>),
    Bolded(SimpleGlyph),
}

/// Point and contour totals and bounds of a glyph, components resolved.
#[derive(Clone, Copy, Debug, Default)]
struct Extent {
    points: usize,
    contours: usize,
    bbox: Option<Bbox>,
}

/// All glyphs of a font along with their horizontal metrics.
///
/// This owns every piece of per-glyph state that changes while emboldening;
/// the source font is only read.
struct GlyphSet<'a> {
    outlines: Vec<Outline<'a>>,
    metrics: Vec<HMetric>,
}

fn glyph_name(names: &GlyphNames, gid: GlyphId) -> String {
    names
        .get(gid)
        .map(|name| name.to_string())
        .unwrap_or_default()
}

fn malformed(names: &GlyphNames, gid: GlyphId, reason: impl Into<String>) -> Error {
    Error::MalformedOutline {
        glyph: gid,
        name: glyph_name(names, gid),
        reason: reason.into(),
    }
}

impl<'a> GlyphSet<'a> {
    fn load(font: &FontRef<'a>, names: &GlyphNames) -> Result<Self, Error> {
        let glyf = table(font.glyf())?;
        let loca = table(font.loca(None))?;
        let hmtx = table(font.hmtx())?;
        let num_glyphs = table(font.maxp())?.num_glyphs() as u32;

        let mut outlines = Vec::with_capacity(num_glyphs as usize);
        let mut metrics = Vec::with_capacity(num_glyphs as usize);
        for gid in (0..num_glyphs).map(GlyphId::from) {
            let glyph = loca
                .get_glyf(gid, &glyf)
                .map_err(|source| Error::GlyphData {
                    glyph: gid,
                    name: glyph_name(names, gid),
                    source,
                })?;
            let outline = match glyph {
                Some(glyph) => Outline::Original(glyph),
                None => Outline::Empty,
            };
            let metric =
                metrics::metric(&hmtx, gid).ok_or_else(|| Error::MissingMetrics {
                    glyph: gid,
                    name: glyph_name(names, gid),
                })?;
            outlines.push(outline);
            metrics.push(metric);
        }
        Ok(Self { outlines, metrics })
    }

    fn embolden(
        &mut self,
        sources: &OutlineGlyphCollection,
        options: &BoldenOptions,
        names: &GlyphNames,
    ) -> Result<BoldenReport, Error> {
        let offset = options.offset;
        let mut report = BoldenReport::default();
        for (ix, (outline, metric)) in self
            .outlines
            .iter_mut()
            .zip(self.metrics.iter_mut())
            .enumerate()
        {
            let gid = GlyphId::from(ix as u32);
            if gid == GlyphId::NOTDEF && !options.include_notdef {
                continue;
            }
            let bolded = match &*outline {
                Outline::Original(Glyph::Composite(_)) => {
                    log::debug!("{gid} ('{}') is composite, skipping", glyph_name(names, gid));
                    report.composites += 1;
                    continue;
                }
                Outline::Original(Glyph::Simple(simple)) if simple.number_of_contours() > 0 => {
                    Some(overstrike_glyph(sources, simple, gid, offset, names)?)
                }
                _ => None,
            };
            match bolded {
                Some(glyph) => {
                    *outline = Outline::Bolded(glyph);
                    report.outlines += 1;
                }
                None => report.empty += 1,
            }
            let advance = metric.advance;
            metric.advance = advance
                .checked_add(offset)
                .ok_or_else(|| Error::AdvanceOverflow {
                    glyph: gid,
                    name: glyph_name(names, gid),
                    advance,
                    offset,
                })?;
        }
        Ok(report)
    }

    /// Resolve the extent of every glyph, failing on component cycles.
    fn extents(&self, names: &GlyphNames) -> Result<Vec<Extent>, Error> {
        let mut cache = vec![None; self.outlines.len()];
        let mut visiting = vec![false; self.outlines.len()];
        (0..self.outlines.len())
            .map(|ix| {
                let gid = GlyphId::from(ix as u32);
                self.resolve(gid, &mut cache, &mut visiting, 0, names)
            })
            .collect()
    }

    fn resolve(
        &self,
        gid: GlyphId,
        cache: &mut [Option<Extent>],
        visiting: &mut [bool],
        depth: u8,
        names: &GlyphNames,
    ) -> Result<Extent, Error> {
        let ix = gid.to_u32() as usize;
        if let Some(Some(extent)) = cache.get(ix) {
            return Ok(*extent);
        }
        if depth > MAX_NESTING_LEVEL {
            return Err(malformed(names, gid, "components nested too deeply"));
        }
        let extent = match self.outlines.get(ix) {
            None => return Err(malformed(names, gid, "no such glyph")),
            Some(Outline::Empty) => Extent::default(),
            Some(Outline::Bolded(glyph)) => Extent {
                points: glyph.contours.iter().map(|c| c.len()).sum(),
                contours: glyph.contours.len(),
                bbox: Some(glyph.bbox),
            },
            Some(Outline::Original(Glyph::Simple(glyph))) => Extent {
                points: glyph.num_points(),
                contours: glyph.number_of_contours().max(0) as usize,
                bbox: (glyph.number_of_contours() > 0).then(|| Bbox {
                    x_min: glyph.x_min(),
                    y_min: glyph.y_min(),
                    x_max: glyph.x_max(),
                    y_max: glyph.y_max(),
                }),
            },
            Some(Outline::Original(Glyph::Composite(glyph))) => {
                if visiting[ix] {
                    return Err(malformed(names, gid, "component refers back to itself"));
                }
                visiting[ix] = true;
                let header = Bbox {
                    x_min: glyph.x_min(),
                    y_min: glyph.y_min(),
                    x_max: glyph.x_max(),
                    y_max: glyph.y_max(),
                };
                let mut extent = Extent::default();
                for component in glyph.components() {
                    let child_gid = component.glyph.into();
                    let child = self.resolve(child_gid, cache, visiting, depth + 1, names)?;
                    extent.points += child.points;
                    extent.contours += child.contours;
                    let placed = child.bbox.map(|bbox| place_component(bbox, &component, header));
                    extent.bbox = match (extent.bbox, placed) {
                        (Some(a), Some(b)) => Some(a.union(b)),
                        (a, b) => a.or(b),
                    };
                }
                visiting[ix] = false;
                extent
            }
        };
        cache[ix] = Some(extent);
        Ok(extent)
    }

    fn compile(&self, font: &FontRef<'a>, names: &GlyphNames) -> Result<Vec<u8>, Error> {
        let mut writer = GlyfLocaWriter::new();
        for (ix, outline) in self.outlines.iter().enumerate() {
            match outline {
                Outline::Empty => writer.add_glyph(&[]),
                Outline::Original(glyph) => writer.add_glyph(glyph.offset_data().as_bytes()),
                Outline::Bolded(glyph) => {
                    let gid = GlyphId::from(ix as u32);
                    let bytes =
                        write_fonts::dump_table(glyph).map_err(|e| Error::CompileGlyph {
                            glyph: gid,
                            name: glyph_name(names, gid),
                            reason: e.to_string(),
                        })?;
                    writer.add_glyph(&bytes);
                }
            }
        }
        let glyf_loca = writer.build();

        let extents = self.extents(names)?;
        let bounds: Vec<_> = extents.iter().map(|extent| extent.bbox).collect();
        let (hmtx, number_of_h_metrics) = metrics::compile_hmtx(&self.metrics);
        let mut hhea: Hhea = table(font.hhea())?.to_owned_table();
        metrics::update_hhea(&mut hhea, &self.metrics, &bounds, number_of_h_metrics);

        let mut maxp: Maxp = table(font.maxp())?.to_owned_table();
        self.update_maxp(&mut maxp, &extents);

        let mut head: Head = table(font.head())?.to_owned_table();
        let font_bbox = bounds
            .iter()
            .flatten()
            .copied()
            .reduce(Bbox::union)
            .unwrap_or_default();
        head.x_min = font_bbox.x_min;
        head.y_min = font_bbox.y_min;
        head.x_max = font_bbox.x_max;
        head.y_max = font_bbox.y_max;
        head.index_to_loc_format = glyf_loca.format as i16;

        // checkSumAdjustment is written by the builder
        let mut builder = FontBuilder::new();
        builder
            .add_raw(Glyf::TAG, glyf_loca.glyf)
            .add_raw(Loca::TAG, glyf_loca.loca);
        builder
            .add_table(&head)?
            .add_table(&hhea)?
            .add_table(&hmtx)?
            .add_table(&maxp)?;
        builder.copy_missing_tables(font.clone());
        Ok(builder.build())
    }

    /// Recompute the 'maxp' outline limits; version 0.5 tables have none.
    fn update_maxp(&self, maxp: &mut Maxp, extents: &[Extent]) {
        if maxp.max_points.is_none() {
            return;
        }
        let mut simple = (0, 0);
        let mut composite = (0, 0);
        for (outline, extent) in self.outlines.iter().zip(extents) {
            let target = match outline {
                Outline::Original(Glyph::Composite(_)) => &mut composite,
                Outline::Empty => continue,
                _ => &mut simple,
            };
            target.0 = target.0.max(extent.points);
            target.1 = target.1.max(extent.contours);
        }
        let clamp = |v: usize| v.min(u16::MAX as usize) as u16;
        maxp.max_points = Some(clamp(simple.0));
        maxp.max_contours = Some(clamp(simple.1));
        maxp.max_composite_points = Some(clamp(composite.0));
        maxp.max_composite_contours = Some(clamp(composite.1));
    }
}

/// Bounds of a component's glyph once placed in its composite.
///
/// Components aligned by point number fall back to the composite's own
/// header bounds.
fn place_component(bbox: Bbox, component: &Component, header: Bbox) -> Bbox {
    let Anchor::Offset { x, y } = component.anchor else {
        return header;
    };
    let t = &component.transform;
    let affine = Affine::new([
        t.xx.to_f32() as f64,
        t.yx.to_f32() as f64,
        t.xy.to_f32() as f64,
        t.yy.to_f32() as f64,
        x as f64,
        y as f64,
    ]);
    let rect = Rect::new(
        bbox.x_min as f64,
        bbox.y_min as f64,
        bbox.x_max as f64,
        bbox.y_max as f64,
    );
    affine.transform_rect_bbox(rect).into()
}

fn overstrike_glyph(
    sources: &OutlineGlyphCollection,
    source: &ReadSimpleGlyph,
    gid: GlyphId,
    offset: u16,
    names: &GlyphNames,
) -> Result<SimpleGlyph, Error> {
    if source.x_max() as i32 + offset as i32 > i16::MAX as i32 {
        return Err(Error::CoordinateOverflow {
            glyph: gid,
            name: glyph_name(names, gid),
            x_max: source.x_max(),
            offset,
        });
    }
    let outline = sources
        .get(gid)
        .ok_or_else(|| malformed(names, gid, "outline not available"))?;
    let mut recording: Vec<PathElement> = Vec::new();
    let adjusted = outline
        .draw(
            DrawSettings::unhinted(Size::unscaled(), LocationRef::default()),
            &mut recording,
        )
        .map_err(|e| malformed(names, gid, e.to_string()))?;
    // the drawn outline is moved so that x_min sits at the side bearing
    let origin = adjusted.lsb.unwrap_or_default() as f64;
    let path = overstrike(&recording, origin, offset);
    let mut glyph = SimpleGlyph::from_bezpath(&path)
        .map_err(|e| malformed(names, gid, format!("{e:?}")))?;
    glyph.recompute_bounding_box();
    log::debug!(
        "{gid} ('{}'): {} -> {} contours",
        glyph_name(names, gid),
        source.number_of_contours(),
        glyph.contours.len()
    );
    Ok(glyph)
}
