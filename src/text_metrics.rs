use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Mutex;
use ttf_parser::Face;

static TEXT_MEASURER: Lazy<Mutex<TextMeasurer>> = Lazy::new(|| Mutex::new(TextMeasurer::new()));

/// Advance width of `text` in px, or `None` when no usable face was found.
pub fn measure_text_width(
    text: &str,
    font_size: f32,
    font_family: &str,
    font_weight: u16,
) -> Option<f32> {
    if text.is_empty() || font_size <= 0.0 {
        return Some(0.0);
    }
    let mut guard = TEXT_MEASURER.lock().ok()?;
    guard.measure(text, font_size, font_family, font_weight)
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct FaceKey {
    family: String,
    weight: u16,
}

impl FaceKey {
    fn new(font_family: &str, weight: u16) -> Self {
        let trimmed = font_family.trim();
        let family = if trimmed.is_empty() {
            "sans-serif".to_string()
        } else {
            trimmed.to_string()
        };
        // Only regular and bold faces are distinguished.
        let weight = if weight >= 600 { 700 } else { 400 };
        Self { family, weight }
    }
}

struct TextMeasurer {
    db: Database,
    loaded_system_fonts: bool,
    faces: HashMap<FaceKey, Option<FontFace>>,
}

impl TextMeasurer {
    fn new() -> Self {
        Self {
            db: Database::new(),
            loaded_system_fonts: false,
            faces: HashMap::new(),
        }
    }

    fn measure(
        &mut self,
        text: &str,
        font_size: f32,
        font_family: &str,
        font_weight: u16,
    ) -> Option<f32> {
        let key = FaceKey::new(font_family, font_weight);
        if !self.faces.contains_key(&key) {
            let face = self.load_face(&key);
            self.faces.insert(key.clone(), face);
        }
        let face = self.faces.get_mut(&key)?.as_mut()?;
        face.measure_width(text, font_size)
    }

    fn load_face(&mut self, key: &FaceKey) -> Option<FontFace> {
        if let Some(face) = load_cached_face(key) {
            return Some(face);
        }

        let mut names: Vec<&str> = Vec::new();
        let mut generics: Vec<Option<Family<'static>>> = Vec::new();
        for part in key.family.split(',') {
            let raw = part.trim().trim_matches('"').trim_matches('\'');
            if raw.is_empty() {
                continue;
            }
            let generic = match raw.to_ascii_lowercase().as_str() {
                "serif" => Some(Family::Serif),
                "sans-serif" | "system-ui" | "-apple-system" | "ui-sans-serif" => {
                    Some(Family::SansSerif)
                }
                "monospace" | "ui-monospace" => Some(Family::Monospace),
                "cursive" => Some(Family::Cursive),
                "fantasy" => Some(Family::Fantasy),
                _ => None,
            };
            names.push(raw);
            generics.push(generic);
        }

        let mut families: Vec<Family<'_>> = names
            .iter()
            .zip(&generics)
            .map(|(name, generic)| (*generic).unwrap_or(Family::Name(*name)))
            .collect();
        if families.is_empty() {
            families.push(Family::SansSerif);
        }

        if !self.loaded_system_fonts {
            self.db.load_system_fonts();
            self.loaded_system_fonts = true;
        }

        let query = Query {
            families: &families,
            weight: Weight(key.weight),
            stretch: Stretch::Normal,
            style: Style::Normal,
        };
        let id = self.db.query(&query)?;
        let mut loaded: Option<FontFace> = None;
        self.db.with_face_data(id, |data, index| {
            let bytes = data.to_vec();
            if let Some(face) = FontFace::parse(bytes, index) {
                store_cached_face(key, &face);
                loaded = Some(face);
            }
        });
        loaded
    }
}

struct FontFace {
    data: Vec<u8>,
    index: u32,
    units_per_em: u16,
    ascii_advances: [u16; 128],
    advance_cache: HashMap<char, Option<u16>>,
}

impl FontFace {
    fn parse(data: Vec<u8>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em().max(1);
        let mut ascii_advances = [0u16; 128];
        for byte in 0u8..=127 {
            if let Some(glyph_id) = face.glyph_index(byte as char) {
                ascii_advances[byte as usize] = face.glyph_hor_advance(glyph_id).unwrap_or(0);
            }
        }
        Some(Self {
            data,
            index,
            units_per_em,
            ascii_advances,
            advance_cache: HashMap::new(),
        })
    }

    fn measure_width(&mut self, text: &str, font_size: f32) -> Option<f32> {
        let scale = font_size / self.units_per_em as f32;
        let fallback = font_size * 0.56;
        let mut width = 0.0f32;
        let mut pending: Vec<char> = Vec::new();

        for ch in text.chars() {
            if ch == '\n' {
                continue;
            }
            let ch = if ch == '\t' { ' ' } else { ch };
            if ch.is_ascii() {
                let advance = self.ascii_advances[ch as usize];
                width += if advance == 0 {
                    fallback
                } else {
                    advance as f32 * scale
                };
                continue;
            }
            match self.advance_cache.get(&ch) {
                Some(Some(advance)) => width += *advance as f32 * scale,
                Some(None) => width += fallback,
                None => pending.push(ch),
            }
        }

        if !pending.is_empty() {
            let face = Face::parse(&self.data, self.index).ok()?;
            for ch in pending {
                let advance = face
                    .glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph));
                self.advance_cache.insert(ch, advance);
                width += match advance {
                    Some(advance) => advance as f32 * scale,
                    None => fallback,
                };
            }
        }

        Some(width.max(0.0))
    }
}

fn cache_paths(key: &FaceKey) -> Option<(PathBuf, PathBuf)> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))?;
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    let hash = hasher.finish();
    let dir = base.join("ddr").join("font-cache");
    Some((dir.join(format!("{hash:x}.font")), dir.join(format!("{hash:x}.meta"))))
}

fn store_cached_face(key: &FaceKey, face: &FontFace) {
    let Some((font_path, meta_path)) = cache_paths(key) else {
        return;
    };
    if font_path.exists() {
        return;
    }
    if let Some(parent) = font_path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let _ = fs::write(&font_path, &face.data);
    let _ = fs::write(&meta_path, face.index.to_string());
}

fn load_cached_face(key: &FaceKey) -> Option<FontFace> {
    let (font_path, meta_path) = cache_paths(key)?;
    if !font_path.exists() || !meta_path.exists() {
        return None;
    }
    let bytes = fs::read(font_path).ok()?;
    let index: u32 = fs::read_to_string(meta_path).ok()?.trim().parse().ok()?;
    FontFace::parse(bytes, index)
}
