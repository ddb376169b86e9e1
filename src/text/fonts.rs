//! Font list lookup and weight mapping for text layers.
//!
//! The font list is injected into each text layer; there is no process-wide font cache.

/// Font weight on a 100-900 scale, matching CSS font-weight values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct FontWeight(pub u16);

impl Default for FontWeight {
    fn default() -> Self {
        Self::REGULAR
    }
}

impl FontWeight {
    /// Thin weight (100).
    pub const THIN: Self = Self(100);
    /// Ultra-light weight (200).
    pub const ULTRA_LIGHT: Self = Self(200);
    /// Light weight (300).
    pub const LIGHT: Self = Self(300);
    /// Regular weight (400).
    pub const REGULAR: Self = Self(400);
    /// Medium weight (500).
    pub const MEDIUM: Self = Self(500);

    /// Weight for one of the recognized style names.
    pub fn from_style_name(style: &str) -> Option<Self> {
        match style {
            "UltraLight" => Some(Self::ULTRA_LIGHT),
            "Thin" => Some(Self::THIN),
            "Light" => Some(Self::LIGHT),
            "Regular" => Some(Self::REGULAR),
            "Medium" => Some(Self::MEDIUM),
            _ => None,
        }
    }

    pub(crate) fn to_parley(self) -> parley::style::FontWeight {
        parley::style::FontWeight::new(f32::from(self.0))
    }
}

/// One entry of the font list supplied with an animation.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontDescriptor {
    /// Family name text documents refer to.
    pub family: String,
    /// Style name (`Regular`, `Light`, ...).
    pub style: String,
}

impl FontDescriptor {
    /// Descriptor for `family` in `style`.
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

/// Ordered, read-only font list.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FontList {
    fonts: Vec<FontDescriptor>,
}

impl FontList {
    /// List holding `fonts` in order.
    pub fn new(fonts: Vec<FontDescriptor>) -> Self {
        Self { fonts }
    }

    /// Entries in order.
    pub fn fonts(&self) -> &[FontDescriptor] {
        &self.fonts
    }

    /// Resolve `family` at `size`.
    ///
    /// Every entry of `family` with a recognized style is considered and the last one wins, the
    /// way the list is declared. Without a match the result is a generic regular font built from
    /// the family name.
    pub fn resolve(&self, family: &str, size: f64) -> ResolvedFont {
        let weight = self
            .fonts
            .iter()
            .filter(|f| f.family == family)
            .filter_map(|f| FontWeight::from_style_name(&f.style))
            .last();
        match weight {
            Some(weight) => ResolvedFont {
                family: family.to_string(),
                size,
                weight,
                generic: false,
            },
            None => ResolvedFont::generic(family, size),
        }
    }
}

/// Font chosen for a text layer at a given frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedFont {
    /// Family name.
    pub family: String,
    /// Size in points.
    pub size: f64,
    /// Weight.
    pub weight: FontWeight,
    /// Built from (family, size) only, without a font list match.
    pub generic: bool,
}

impl ResolvedFont {
    /// Generic regular font for `family` at `size`.
    pub fn generic(family: &str, size: f64) -> Self {
        Self {
            family: family.to_string(),
            size,
            weight: FontWeight::REGULAR,
            generic: true,
        }
    }
}

/// Resolve through an optional font list.
pub fn resolve_font(fonts: Option<&FontList>, family: &str, size: f64) -> ResolvedFont {
    match fonts {
        Some(list) => list.resolve(family, size),
        None => ResolvedFont::generic(family, size),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/fonts.rs"]
mod tests;
