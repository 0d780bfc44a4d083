use crate::foundation::error::{GenError, GenResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const TEXT_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const EMOJI_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoEmoji-Regular.ttf",
    "/usr/share/fonts/noto/NotoEmoji-Regular.ttf",
    "/usr/share/fonts/google-noto-emoji/NotoEmoji-Regular.ttf",
    "/usr/share/fonts/truetype/ancient-scripts/Symbola_hint.ttf",
    "/usr/share/fonts/TTF/Symbola.ttf",
    "C:\\Windows\\Fonts\\seguiemj.ttf",
];

/// Brush slot of laid-out text. Colors are chosen per glyph at paint time, so it carries nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct TextBrush;

/// Which font a piece of text is set in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FontRole {
    /// Caption text.
    Text,
    /// Face glyphs; falls back to the text font.
    Emoji,
}

/// Raw font files used for captions and face glyphs.
#[derive(Clone, Debug, Default)]
pub struct FontSet {
    text: Option<Arc<Vec<u8>>>,
    emoji: Option<Arc<Vec<u8>>>,
}

impl FontSet {
    /// No fonts: text layers are skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load explicit font files.
    pub fn from_paths(text: Option<&Path>, emoji: Option<&Path>) -> GenResult<Self> {
        let read = |p: &Path| -> GenResult<Arc<Vec<u8>>> {
            std::fs::read(p).map(Arc::new).map_err(|e| {
                GenError::validation(format!("failed to read font '{}': {e}", p.display()))
            })
        };
        Ok(Self {
            text: text.map(read).transpose()?,
            emoji: emoji.map(read).transpose()?,
        })
    }

    /// Use explicit paths where given and probe common system locations for the rest.
    pub fn discover(text: Option<&Path>, emoji: Option<&Path>) -> GenResult<Self> {
        let text = match text {
            Some(p) => Some(p.to_path_buf()),
            None => first_existing(TEXT_FONT_CANDIDATES),
        };
        let emoji = match emoji {
            Some(p) => Some(p.to_path_buf()),
            None => first_existing(EMOJI_FONT_CANDIDATES),
        };
        tracing::debug!(text = ?text, emoji = ?emoji, "resolved fonts");
        Self::from_paths(text.as_deref(), emoji.as_deref())
    }

    /// Build from in-memory font bytes.
    pub fn from_bytes(text: Option<Vec<u8>>, emoji: Option<Vec<u8>>) -> Self {
        Self {
            text: text.map(Arc::new),
            emoji: emoji.map(Arc::new),
        }
    }

    /// `true` when at least a text font is available.
    pub fn has_text_font(&self) -> bool {
        self.text.is_some()
    }

    fn bytes_for(&self, role: FontRole) -> Option<&Arc<Vec<u8>>> {
        match role {
            FontRole::Text => self.text.as_ref(),
            FontRole::Emoji => self.emoji.as_ref().or(self.text.as_ref()),
        }
    }
}

fn first_existing(candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Shaped text plus the font its glyph ids refer to.
#[derive(Clone)]
pub(crate) struct TextLayout {
    pub(crate) layout: Arc<parley::Layout<TextBrush>>,
    pub(crate) font: vello_cpu::peniko::FontData,
}

impl TextLayout {
    pub(crate) fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    pub(crate) fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LayoutKey {
    role: FontRole,
    text: String,
    size_px: u32,
}

/// Parley-backed shaping with a per-string cache.
///
/// Captions and face glyphs cycle through short fixed lists, so the cache stays small.
pub(crate) struct TextLayoutEngine {
    fonts: FontSet,
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    families: HashMap<FontRole, (String, vello_cpu::peniko::FontData)>,
    cache: HashMap<LayoutKey, TextLayout>,
    warned_missing: bool,
}

impl TextLayoutEngine {
    pub(crate) fn new(fonts: FontSet) -> Self {
        Self {
            fonts,
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
            cache: HashMap::new(),
            warned_missing: false,
        }
    }

    /// Shape `text` at `size_px`. Returns `None` when no font is available for `role`.
    pub(crate) fn layout(
        &mut self,
        role: FontRole,
        text: &str,
        size_px: u32,
    ) -> GenResult<Option<TextLayout>> {
        if size_px == 0 {
            return Err(GenError::validation("text size_px must be > 0"));
        }
        let key = LayoutKey {
            role,
            text: text.to_owned(),
            size_px,
        };
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Some(hit.clone()));
        }

        let Some((family_name, font)) = self.family_for(role)? else {
            if !self.warned_missing {
                tracing::warn!("no font available; text layers will be skipped");
                self.warned_missing = true;
            }
            return Ok(None);
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);

        let out = TextLayout {
            layout: Arc::new(layout),
            font,
        };
        self.cache.insert(key, out.clone());
        Ok(Some(out))
    }

    fn family_for(
        &mut self,
        role: FontRole,
    ) -> GenResult<Option<(String, vello_cpu::peniko::FontData)>> {
        if let Some((name, font)) = self.families.get(&role) {
            return Ok(Some((name.clone(), font.clone())));
        }
        let Some(bytes) = self.fonts.bytes_for(role).cloned() else {
            return Ok(None);
        };

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.as_ref().clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            GenError::validation("no font families registered from font bytes")
        })?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GenError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
            0,
        );
        self.families
            .insert(role, (family_name.clone(), font.clone()));
        Ok(Some((family_name, font)))
    }
}
