//! Post-processing for TrueType fonts.
//!
//! This crate provides two independent operations, each reading a single
//! `glyf`-flavoured font:
//!
//! - [`bolden`] synthesizes a heavier variant of a font by drawing every
//!   simple glyph twice, the second copy shifted right, and widening each
//!   glyph's advance by the same amount.
//! - [`extract_glyph_widths`] groups the font's mapped code points by the
//!   advance width of their glyph, producing a [`WidthTable`] that can be
//!   written as JSON.
//!
//! Both have file-level wrappers ([`bolden_file`], [`extract_widths_file`])
//! that back the `font-bolden` and `font-widths` binaries.
//!
//! ```no_run
//! use fetstil::{bolden_file, BoldenOptions};
//!
//! bolden_file("Regular.ttf", "Bold.ttf", &BoldenOptions::with_offset(60)).unwrap();
//! ```

mod bolden;
mod error;
mod glyf_loca;
mod metrics;
pub mod pens;
mod widths;

pub use bolden::{bolden, bolden_file, BoldenOptions, BoldenReport, DEFAULT_OFFSET};
pub use error::Error;
pub use metrics::HMetric;
pub use widths::{extract_glyph_widths, extract_widths_file, WidthTable};
