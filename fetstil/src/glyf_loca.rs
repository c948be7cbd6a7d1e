//! Assembling raw 'glyf' and 'loca' data.

/// Which offset size the 'loca' table uses.
///
/// This is stored in the 'head' table's `indexToLocFormat` field.
#[repr(i16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum LocaFormat {
    Short = 0,
    Long = 1,
}

/// Concatenates compiled glyphs and tracks their offsets.
///
/// Glyphs are added in glyph id order. Each glyph is padded to an even
/// length so that the short loca format remains available.
#[derive(Debug)]
pub(crate) struct GlyfLocaWriter {
    glyf: Vec<u8>,
    offsets: Vec<u32>,
}

pub(crate) struct GlyfLoca {
    pub glyf: Vec<u8>,
    pub loca: Vec<u8>,
    pub format: LocaFormat,
}

fn padded_size(len: usize) -> usize {
    len + len % 2
}

impl GlyfLocaWriter {
    pub fn new() -> Self {
        Self {
            glyf: Vec::new(),
            offsets: vec![0],
        }
    }

    /// Append one glyph; an empty slice records an empty glyph.
    pub fn add_glyph(&mut self, data: &[u8]) {
        self.glyf.extend_from_slice(data);
        self.glyf.resize(padded_size(self.glyf.len()), 0);
        self.offsets.push(self.glyf.len() as u32);
    }

    pub fn build(mut self) -> GlyfLoca {
        let format = loca_format(&self.offsets);
        let loca = match format {
            LocaFormat::Short => self
                .offsets
                .iter()
                .flat_map(|off| ((off >> 1) as u16).to_be_bytes())
                .collect(),
            LocaFormat::Long => self
                .offsets
                .iter()
                .flat_map(|off| off.to_be_bytes())
                .collect(),
        };
        // As a special case when all glyph in the font are empty, add a zero byte to the table,
        // so that OTS doesn’t reject it, and to make the table work on Windows as well.
        // See https://github.com/khaledhosny/ots/issues/52
        if self.glyf.is_empty() {
            self.glyf.push(0);
        }
        GlyfLoca {
            glyf: self.glyf,
            loca,
            format,
        }
    }
}

// https://github.com/fonttools/fonttools/blob/1c283756a5e39d69459eea80ed12792adc4922dd/Lib/fontTools/ttLib/tables/_l_o_c_a.py#L37
fn loca_format(offsets: &[u32]) -> LocaFormat {
    const MAX_SHORT_LOCA_VALUE: u32 = 0x20000;
    if offsets.last().copied().unwrap_or_default() < MAX_SHORT_LOCA_VALUE
        && offsets.iter().all(|offset| offset % 2 == 0)
    {
        LocaFormat::Short
    } else {
        LocaFormat::Long
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pads_and_uses_short_offsets() {
        let mut writer = GlyfLocaWriter::new();
        writer.add_glyph(&[1, 2, 3]);
        writer.add_glyph(&[]);
        writer.add_glyph(&[4, 5]);
        let built = writer.build();
        assert_eq!(built.format, LocaFormat::Short);
        assert_eq!(built.glyf, vec![1, 2, 3, 0, 4, 5]);
        // offsets 0, 4, 4, 6 halved
        assert_eq!(built.loca, vec![0, 0, 0, 2, 0, 2, 0, 3]);
    }

    #[test]
    fn switches_to_long_offsets() {
        let mut writer = GlyfLocaWriter::new();
        writer.add_glyph(&vec![0xAB; 0x20000]);
        writer.add_glyph(&[]);
        let built = writer.build();
        assert_eq!(built.format, LocaFormat::Long);
        assert_eq!(
            built.loca,
            vec![0, 0, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0]
        );
    }

    #[test]
    fn all_empty_glyphs() {
        let mut writer = GlyfLocaWriter::new();
        writer.add_glyph(&[]);
        writer.add_glyph(&[]);
        let built = writer.build();
        assert_eq!(built.glyf, vec![0]);
        assert_eq!(built.loca, vec![0; 6]);
    }
}
