//! Fixture fonts for fetstil tests.
//!
//! Fonts are compiled on demand with `write-fonts` rather than stored as
//! binaries, so each fixture is readable alongside the tests that use it.

use kurbo::{BezPath, Rect, Shape};
use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{
            Anchor, Bbox, Component, ComponentFlags, CompositeGlyph, GlyfLocaBuilder, Glyph,
            SimpleGlyph, Transform,
        },
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        maxp::Maxp,
        post::Post,
    },
    types::{FWord, GlyphId, GlyphId16, Tag, UfWord},
    FontBuilder,
};

/// The outline of a fixture glyph.
#[derive(Clone, Debug)]
pub enum Outline {
    Empty,
    Path(BezPath),
    /// A single component referencing another glyph, offset by (dx, dy).
    Component { glyph: u16, dx: i16, dy: i16 },
    /// Several components, each as (glyph, dx, dy).
    Components(Vec<(u16, i16, i16)>),
}

impl Outline {
    fn components(&self) -> Vec<(u16, i16, i16)> {
        match self {
            Outline::Component { glyph, dx, dy } => vec![(*glyph, *dx, *dy)],
            Outline::Components(components) => components.clone(),
            _ => Vec::new(),
        }
    }
}

/// A glyph in a fixture font.
#[derive(Clone, Debug)]
pub struct TestGlyph {
    pub name: &'static str,
    pub outline: Outline,
    pub advance: u16,
    /// Left side bearing; defaults to the outline's x_min.
    pub lsb: Option<i16>,
    pub code_points: Vec<char>,
}

impl TestGlyph {
    pub fn new(name: &'static str, outline: Outline, advance: u16) -> Self {
        Self {
            name,
            outline,
            advance,
            lsb: None,
            code_points: Vec::new(),
        }
    }

    pub fn with_lsb(mut self, lsb: i16) -> Self {
        self.lsb = Some(lsb);
        self
    }

    pub fn mapped(mut self, code_points: &[char]) -> Self {
        self.code_points.extend_from_slice(code_points);
        self
    }
}

/// A rectangular outline from (x0, y0) to (x1, y1).
pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Outline {
    Outline::Path(Rect::new(x0, y0, x1, y1).to_path(0.1))
}

/// A closed outline made of two quadratic arcs, like a lens.
pub fn lens(x0: f64, x1: f64, height: f64) -> Outline {
    let mid = (x0 + x1) / 2.0;
    let mut path = BezPath::new();
    path.move_to((x0, height / 2.0));
    path.quad_to((mid, height), (x1, height / 2.0));
    path.quad_to((mid, 0.0), (x0, height / 2.0));
    path.close_path();
    Outline::Path(path)
}

/// Compiles a list of glyphs into a minimal TrueType font.
///
/// The font has 'head', 'hhea', 'maxp' (version 1.0), 'hmtx', 'glyf',
/// 'loca', 'cmap' and 'post' (with glyph names) tables.
#[derive(Clone, Debug, Default)]
pub struct TestFont {
    glyphs: Vec<TestGlyph>,
    extra_tables: Vec<(Tag, Vec<u8>)>,
}

impl TestFont {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyph(mut self, glyph: TestGlyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    /// Add an arbitrary table, copied into the font as is.
    pub fn raw_table(mut self, tag: Tag, data: Vec<u8>) -> Self {
        self.extra_tables.push((tag, data));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut glyf_builder = GlyfLocaBuilder::new();
        let mut bounds = Vec::with_capacity(self.glyphs.len());
        let mut max_points = 0;
        let mut max_contours = 0;
        for glyph_def in &self.glyphs {
            let compiled = match &glyph_def.outline {
                Outline::Empty => Glyph::Empty,
                Outline::Path(path) => {
                    let simple = SimpleGlyph::from_bezpath(path).expect("valid fixture path");
                    let points: usize = simple.contours.iter().map(|c| c.len()).sum();
                    max_points = max_points.max(points as u16);
                    max_contours = max_contours.max(simple.contours.len() as u16);
                    Glyph::Simple(simple)
                }
                Outline::Component { .. } | Outline::Components(_) => {
                    let mut parts =
                        glyph_def
                            .outline
                            .components()
                            .into_iter()
                            .map(|(glyph, dx, dy)| {
                                let component = Component::new(
                                    GlyphId16::new(glyph),
                                    Anchor::Offset { x: dx, y: dy },
                                    Transform::default(),
                                    ComponentFlags::default(),
                                );
                                (component, shifted(self.component_bbox(glyph), dx, dy))
                            });
                    let (first, bbox) = parts.next().expect("composite has components");
                    let mut composite = CompositeGlyph::new(first, bbox);
                    for (component, bbox) in parts {
                        composite.add_component(component, bbox);
                    }
                    Glyph::Composite(composite)
                }
            };
            bounds.push(glyph_bbox(&compiled));
            glyf_builder.add_glyph(&compiled).expect("fixture glyph compiles");
        }
        let (glyf, loca, loca_format) = glyf_builder.build();

        let font_bbox = bounds
            .iter()
            .flatten()
            .copied()
            .reduce(Bbox::union)
            .unwrap_or_default();
        let head = Head {
            units_per_em: 1000,
            x_min: font_bbox.x_min,
            y_min: font_bbox.y_min,
            x_max: font_bbox.x_max,
            y_max: font_bbox.y_max,
            index_to_loc_format: loca_format as i16,
            ..Default::default()
        };

        let (hmtx, number_of_h_metrics) = self.hmtx();
        let hhea = Hhea {
            ascender: FWord::new(800),
            descender: FWord::new(-200),
            advance_width_max: UfWord::new(
                self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0),
            ),
            caret_slope_rise: 1,
            number_of_h_metrics,
            ..Default::default()
        };

        let num_glyphs = self.glyphs.len() as u16;
        let maxp = Maxp {
            num_glyphs,
            max_points: Some(max_points),
            max_contours: Some(max_contours),
            max_composite_points: Some(max_points),
            max_composite_contours: Some(max_contours),
            max_zones: Some(1),
            max_twilight_points: Some(0),
            max_storage: Some(0),
            max_function_defs: Some(0),
            max_instruction_defs: Some(0),
            max_stack_elements: Some(0),
            max_size_of_instructions: Some(0),
            max_component_elements: Some(1),
            max_component_depth: Some(1),
        };

        let cmap = Cmap::from_mappings(self.glyphs.iter().enumerate().flat_map(|(gid, g)| {
            g.code_points
                .iter()
                .map(move |ch| (*ch, GlyphId::new(gid as u32)))
        }))
        .expect("fixture cmap has no conflicts");

        let post = Post::new_v2(self.glyphs.iter().map(|g| g.name));

        let mut builder = FontBuilder::new();
        builder
            .add_table(&head)
            .expect("head")
            .add_table(&hhea)
            .expect("hhea")
            .add_table(&maxp)
            .expect("maxp")
            .add_table(&hmtx)
            .expect("hmtx")
            .add_table(&cmap)
            .expect("cmap")
            .add_table(&post)
            .expect("post")
            .add_table(&glyf)
            .expect("glyf")
            .add_table(&loca)
            .expect("loca");
        for (tag, data) in &self.extra_tables {
            builder.add_raw(*tag, data.clone());
        }
        builder.build()
    }

    fn component_bbox(&self, gid: u16) -> Bbox {
        match self.glyphs.get(gid as usize).map(|g| &g.outline) {
            Some(Outline::Path(path)) => path.bounding_box().into(),
            _ => Bbox::default(),
        }
    }

    // trailing glyphs sharing the last advance are written as side bearings
    fn hmtx(&self) -> (Hmtx, u16) {
        let metrics: Vec<_> = self
            .glyphs
            .iter()
            .map(|g| {
                let lsb = match &g.outline {
                    Outline::Empty => 0,
                    _ => self.bbox_of(g).x_min,
                };
                let lsb = g.lsb.unwrap_or(lsb);
                (g.advance, lsb)
            })
            .collect();
        let mut num_long = metrics.len();
        while num_long > 1 && metrics[num_long - 2].0 == metrics[num_long - 1].0 {
            num_long -= 1;
        }
        let hmtx = Hmtx {
            h_metrics: metrics[..num_long]
                .iter()
                .map(|(advance, side_bearing)| LongMetric {
                    advance: *advance,
                    side_bearing: *side_bearing,
                })
                .collect(),
            left_side_bearings: metrics[num_long..].iter().map(|(_, lsb)| *lsb).collect(),
        };
        (hmtx, num_long as u16)
    }

    fn bbox_of(&self, glyph: &TestGlyph) -> Bbox {
        match &glyph.outline {
            Outline::Empty => Bbox::default(),
            Outline::Path(path) => path.bounding_box().into(),
            composite => composite
                .components()
                .into_iter()
                .map(|(glyph, dx, dy)| shifted(self.component_bbox(glyph), dx, dy))
                .reduce(Bbox::union)
                .unwrap_or_default(),
        }
    }
}

fn shifted(bbox: Bbox, dx: i16, dy: i16) -> Bbox {
    Bbox {
        x_min: bbox.x_min + dx,
        y_min: bbox.y_min + dy,
        x_max: bbox.x_max + dx,
        y_max: bbox.y_max + dy,
    }
}

fn glyph_bbox(glyph: &Glyph) -> Option<Bbox> {
    match glyph {
        Glyph::Empty => None,
        Glyph::Simple(simple) => Some(simple.bbox),
        Glyph::Composite(composite) => Some(composite.bbox),
    }
}

/// Glyph ids in [`bold_fixture`].
pub mod bold {
    pub const NOTDEF: u32 = 0;
    pub const SPACE: u32 = 1;
    pub const A: u32 = 2;
    pub const B: u32 = 3;
    pub const O: u32 = 4;
    pub const AACUTE: u32 = 5;
}

/// A font with a `.notdef` box, an empty space, two rectangles "A" (width
/// 500) and "B" (width 600), a curved "O", and a composite "Aacute" that
/// references "A".
pub fn bold_fixture() -> TestFont {
    TestFont::new()
        .glyph(TestGlyph::new(".notdef", rect(50.0, 0.0, 450.0, 700.0), 500))
        .glyph(TestGlyph::new("space", Outline::Empty, 250).mapped(&[' ']))
        .glyph(TestGlyph::new("A", rect(100.0, 0.0, 400.0, 700.0), 500).mapped(&['A']))
        .glyph(TestGlyph::new("B", rect(100.0, 0.0, 500.0, 700.0), 600).mapped(&['B']))
        .glyph(TestGlyph::new("O", lens(40.0, 560.0, 700.0), 600).mapped(&['O']))
        .glyph(
            TestGlyph::new(
                "Aacute",
                Outline::Component {
                    glyph: bold::A as u16,
                    dx: 0,
                    dy: 0,
                },
                500,
            )
            .mapped(&['\u{C1}']),
        )
}

/// A font where U+0041 and U+0391 share a glyph of width 500, U+0042 maps to
/// a glyph of width 600, and an unmapped glyph has width 700.
pub fn widths_fixture() -> TestFont {
    TestFont::new()
        .glyph(TestGlyph::new(".notdef", rect(50.0, 0.0, 450.0, 700.0), 500))
        .glyph(
            TestGlyph::new("A", rect(100.0, 0.0, 400.0, 700.0), 500).mapped(&['A', '\u{391}']),
        )
        .glyph(TestGlyph::new("B", rect(100.0, 0.0, 500.0, 700.0), 600).mapped(&['B']))
        .glyph(TestGlyph::new("ornament", rect(0.0, 0.0, 700.0, 700.0), 700))
}

/// A monospaced font: every glyph after the first shares one advance, so
/// 'hmtx' stores a single long metric followed by side bearings.
pub fn monospace_fixture() -> TestFont {
    TestFont::new()
        .glyph(TestGlyph::new(".notdef", rect(50.0, 0.0, 550.0, 700.0), 600))
        .glyph(TestGlyph::new("I", rect(250.0, 0.0, 350.0, 700.0), 600).mapped(&['I']))
        .glyph(TestGlyph::new("L", rect(100.0, 0.0, 500.0, 700.0), 600).mapped(&['L']))
        .glyph(TestGlyph::new("space", Outline::Empty, 600).mapped(&[' ']))
}
