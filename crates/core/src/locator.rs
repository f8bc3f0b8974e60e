use std::fmt;

use crate::model::{MIME_HTML, MIME_PLAIN, MIME_PNG};

/// Preferred payload when fetching a rich result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    Image,
    Text,
    Table,
}

impl TypeHint {
    /// Unknown hints are not an error: they simply fall through to the default preference.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "image" => Some(Self::Image),
            "text" => Some(Self::Text),
            "table" => Some(Self::Table),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Image => MIME_PNG,
            Self::Text => MIME_PLAIN,
            Self::Table => MIME_HTML,
        }
    }
}

/// Handle for one output payload, as quoted in digests.
///
/// Positions are 1-based and derived from the current cell order, so a locator is only
/// meaningful until the notebook is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub cell_index: i64,
    pub output_index: i64,
    pub type_hint: Option<TypeHint>,
}

impl Locator {
    pub fn new(cell_index: i64, output_index: i64) -> Self {
        Self {
            cell_index,
            output_index,
            type_hint: None,
        }
    }

    /// Locator for 0-based positions inside a loaded notebook.
    pub(crate) fn from_positions(cell_pos: usize, output_pos: usize) -> Self {
        Self::new(one_based(cell_pos), one_based(output_pos))
    }

    pub fn with_type_hint(mut self, type_hint: Option<TypeHint>) -> Self {
        self.type_hint = type_hint;
        self
    }

    /// Display-only image identifier; not stable across reorders.
    pub fn image_id(&self) -> String {
        format!("IMG_ID{:03}{:03}", self.cell_index, self.output_index)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(cell {} [1-based], output {} [1-based])",
            self.cell_index, self.output_index
        )
    }
}

fn one_based(pos: usize) -> i64 {
    i64::try_from(pos).map_or(i64::MAX, |pos| pos.saturating_add(1))
}

/// 0-based position of an existing element, if `index` (1-based) addresses one.
pub(crate) fn existing_position(index: i64, len: usize) -> Option<usize> {
    let pos = usize::try_from(index.checked_sub(1)?).ok()?;
    (pos < len).then_some(pos)
}

/// 0-based insertion point for `index` (1-based); `len + 1` appends.
pub(crate) fn insertion_position(index: i64, len: usize) -> Option<usize> {
    let pos = usize::try_from(index.checked_sub(1)?).ok()?;
    (pos <= len).then_some(pos)
}
