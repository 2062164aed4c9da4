use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;
use ttf_parser::Face;

static CATALOG: Lazy<Mutex<FontCatalog>> = Lazy::new(|| Mutex::new(FontCatalog::new()));

const MISSING_GLYPH_FACTOR: f32 = 0.55;

/// Measures `text` at `font_size` using the first resolvable family from a
/// CSS-style family list. `None` when no matching font is installed; the
/// caller falls back to calibrated widths.
pub fn measure_text_width(text: &str, font_size: f32, font_family: &str) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut catalog = CATALOG.lock().ok()?;
    let font = catalog.resolve(font_family)?;
    let normalized = text.replace('\t', "    ");
    Some(font.width_of(&normalized, font_size))
}

struct FontCatalog {
    db: Database,
    system_loaded: bool,
    fonts: HashMap<String, Option<LoadedFont>>,
}

impl FontCatalog {
    fn new() -> Self {
        Self {
            db: Database::new(),
            system_loaded: false,
            fonts: HashMap::new(),
        }
    }

    fn resolve(&mut self, font_family: &str) -> Option<&LoadedFont> {
        let key = font_family.trim().to_string();
        if !self.fonts.contains_key(&key) {
            let loaded = self.load(font_family);
            self.fonts.insert(key.clone(), loaded);
        }
        self.fonts.get(&key).and_then(Option::as_ref)
    }

    fn load(&mut self, font_family: &str) -> Option<LoadedFont> {
        if !self.system_loaded {
            self.db.load_system_fonts();
            self.system_loaded = true;
        }

        let entries = parse_family_list(font_family);
        let families: Vec<Family<'_>> = entries
            .iter()
            .map(|entry| match entry {
                FamilyEntry::Named(name) => Family::Name(name.as_str()),
                FamilyEntry::Generic(generic) => *generic,
            })
            .collect();

        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;

        let mut loaded = None;
        self.db.with_face_data(id, |data, index| {
            loaded = LoadedFont::from_bytes(data, index);
        });
        loaded
    }
}

enum FamilyEntry {
    Named(String),
    Generic(Family<'static>),
}

fn parse_family_list(font_family: &str) -> Vec<FamilyEntry> {
    let mut entries = Vec::new();
    for part in font_family.split(',') {
        let name = part.trim().trim_matches('"').trim_matches('\'');
        if name.is_empty() {
            continue;
        }
        let entry = match name.to_ascii_lowercase().as_str() {
            "serif" => FamilyEntry::Generic(Family::Serif),
            "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                FamilyEntry::Generic(Family::SansSerif)
            }
            "monospace" | "ui-monospace" => FamilyEntry::Generic(Family::Monospace),
            "cursive" => FamilyEntry::Generic(Family::Cursive),
            "fantasy" => FamilyEntry::Generic(Family::Fantasy),
            _ => FamilyEntry::Named(name.to_string()),
        };
        entries.push(entry);
    }
    if entries.is_empty() {
        entries.push(FamilyEntry::Generic(Family::SansSerif));
    }
    entries
}

/// Advance data pulled out of a face eagerly so nothing borrows the font
/// bytes. Non-ASCII text re-parses the face, which is rare enough not to
/// matter.
struct LoadedFont {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
}

impl LoadedFont {
    fn from_bytes(data: &[u8], index: u32) -> Option<Self> {
        let face = Face::parse(data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph).unwrap_or(0);
            }
        }
        Some(Self {
            data: data.to_vec(),
            index,
            units_per_em,
            ascii_advances,
        })
    }

    fn width_of(&self, text: &str, font_size: f32) -> f32 {
        let scale = font_size / self.units_per_em as f32;
        let missing = font_size * MISSING_GLYPH_FACTOR;

        if text.is_ascii() {
            let width: f32 = text
                .bytes()
                .filter(|byte| *byte != b'\n')
                .map(|byte| {
                    let advance = self.ascii_advances[byte as usize];
                    if advance == 0 {
                        missing
                    } else {
                        advance as f32 * scale
                    }
                })
                .sum();
            return width.max(0.0);
        }

        let Ok(face) = Face::parse(&self.data, self.index) else {
            return text.chars().count() as f32 * missing;
        };
        let width: f32 = text
            .chars()
            .filter(|ch| *ch != '\n')
            .map(|ch| {
                face.glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(|advance| advance as f32 * scale)
                    .unwrap_or(missing)
            })
            .sum();
        width.max(0.0)
    }
}
