//! Fenced metadata block scanning.
//!
//! The accepted delimiters are declared once, in a fence table, and compiled
//! into a single alternation. Scanning is a pure function of the text: each
//! call walks its own match iterator, so one scanner can be shared across any
//! number of messages without state carrying over between them.
//!
//! | Fence | Opens with | Tag | Closes with |
//! |-------|------------|-----|-------------|
//! | [`FenceKind::Dashes`] | `---` | optional `yaml` (stripped) | `---` |
//! | [`FenceKind::YamlCode`] | ```` ``` ```` | required `yaml` | ```` ``` ```` |
//!
//! Matches are non-overlapping and found left to right; the closing fence of
//! one block is never reused to open the next. A trailing unmatched fence
//! produces nothing.

use std::sync::LazyLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Fence table
// ---------------------------------------------------------------------------

/// Names a fence style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FenceKind {
    /// `---` … `---`, with an optional `yaml` tag after the opener.
    Dashes,
    /// ```` ```yaml ```` … ```` ``` ````.
    YamlCode,
}

impl FenceKind {
    /// Every fence style, in matching priority order.
    pub const ALL: [FenceKind; 2] = [FenceKind::Dashes, FenceKind::YamlCode];

    /// Returns the table entry for this style.
    pub fn fence(self) -> Fence {
        match self {
            FenceKind::Dashes => Fence {
                kind: self,
                open: "---",
                tag: Some(FenceTag::Optional("yaml")),
                close: "---",
            },
            FenceKind::YamlCode => Fence {
                kind: self,
                open: "```",
                tag: Some(FenceTag::Required("yaml")),
                close: "```",
            },
        }
    }

    /// Configuration name of this style (`dashes`, `yaml-code`).
    pub fn name(self) -> &'static str {
        match self {
            FenceKind::Dashes => "dashes",
            FenceKind::YamlCode => "yaml-code",
        }
    }
}

impl std::fmt::Display for FenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown fence '{s}' (expected 'dashes' or 'yaml-code')"))
    }
}

/// Info-string rule applied right after an opening fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceTag {
    /// The tag may follow the opener; if present it is not part of the block.
    Optional(&'static str),
    /// The tag must follow the opener for the fence to count.
    Required(&'static str),
}

/// One delimiter pair of the block grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    /// Which style this entry describes.
    pub kind: FenceKind,
    /// Opening marker.
    pub open: &'static str,
    /// Tag rule for the text immediately after the opener.
    pub tag: Option<FenceTag>,
    /// Closing marker.
    pub close: &'static str,
}

impl Fence {
    /// Regex fragment for this fence with exactly one capture group: the body.
    fn pattern(&self) -> String {
        let tag = match self.tag {
            Some(FenceTag::Optional(tag)) => format!("(?:{})?", regex::escape(tag)),
            Some(FenceTag::Required(tag)) => regex::escape(tag),
            None => String::new(),
        };
        format!(
            r"{open}{tag}([\s\S]*?){close}",
            open = regex::escape(self.open),
            close = regex::escape(self.close),
        )
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// A block found by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'t> {
    /// Fence style that delimited the block.
    pub kind: FenceKind,
    /// Interior text, verbatim (tag stripped, surrounding newlines kept).
    pub text: &'t str,
    /// Byte offset of the opening fence in the scanned text.
    pub start: usize,
}

/// Scans text for fenced metadata blocks.
#[derive(Debug, Clone)]
pub struct BlockScanner {
    fences: Vec<Fence>,
    pattern: Option<Regex>,
}

impl BlockScanner {
    /// Builds a scanner from a fence table. Earlier entries win when two
    /// fences could open at the same position.
    ///
    /// An empty table yields a scanner that never matches.
    pub fn new(fences: impl IntoIterator<Item = Fence>) -> Result<Self, regex::Error> {
        let fences: Vec<Fence> = fences.into_iter().collect();
        let pattern = if fences.is_empty() {
            None
        } else {
            let alternation = fences
                .iter()
                .map(Fence::pattern)
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation)?)
        };
        Ok(Self { fences, pattern })
    }

    /// Builds a scanner for a set of fence styles, in the given order.
    pub fn with_kinds(kinds: impl IntoIterator<Item = FenceKind>) -> Result<Self, regex::Error> {
        Self::new(kinds.into_iter().map(FenceKind::fence))
    }

    /// Lazily yields every block in `text`, in order of appearance.
    pub fn blocks<'s, 't>(&'s self, text: &'t str) -> impl Iterator<Item = RawBlock<'t>> + 's
    where
        't: 's,
    {
        self.pattern
            .iter()
            .flat_map(move |pattern| pattern.captures_iter(text))
            .filter_map(move |captures| {
                let start = captures.get(0)?.start();
                // Each alternative contributes exactly one group, so the
                // group index identifies the fence that matched.
                let (index, body) = captures
                    .iter()
                    .skip(1)
                    .enumerate()
                    .find_map(|(index, group)| group.map(|g| (index, g)))?;
                Some(RawBlock {
                    kind: self.fences[index].kind,
                    text: body.as_str(),
                    start,
                })
            })
    }

    /// Lazily yields the interior text of every block in `text`.
    pub fn scan<'s, 't>(&'s self, text: &'t str) -> impl Iterator<Item = &'t str> + 's
    where
        't: 's,
    {
        self.blocks(text).map(|block| block.text)
    }
}

static DEFAULT_SCANNER: LazyLock<BlockScanner> = LazyLock::new(|| {
    BlockScanner::with_kinds(FenceKind::ALL).expect("built-in fence table is a valid regex")
});

impl Default for BlockScanner {
    fn default() -> Self {
        DEFAULT_SCANNER.clone()
    }
}

/// Scans `text` with the built-in fence table.
pub fn scan(text: &str) -> impl Iterator<Item = &str> {
    DEFAULT_SCANNER.scan(text)
}
