use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::content::ContentRecord;
use crate::layout::{GridArea, GridError, GridLayout, GridSize};

/// One cell of the seven-tile bento grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileId {
    Projects,
    Dsa,
    Resume,
    Profile,
    Tech,
    Contact,
    Basic,
}

impl TileId {
    /// Every tile in grid reading order.
    pub const ALL: [TileId; 7] = [
        TileId::Projects,
        TileId::Dsa,
        TileId::Resume,
        TileId::Profile,
        TileId::Tech,
        TileId::Contact,
        TileId::Basic,
    ];

    /// The profile tile is decorative and never expands.
    pub const fn is_inert(self) -> bool {
        matches!(self, TileId::Profile)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            TileId::Projects => "projects",
            TileId::Dsa => "dsa",
            TileId::Resume => "resume",
            TileId::Profile => "profile",
            TileId::Tech => "tech",
            TileId::Contact => "contact",
            TileId::Basic => "basic",
        }
    }

    /// Caption printed on the tile face.
    pub const fn label(self) -> &'static str {
        match self {
            TileId::Projects => "Projects",
            TileId::Dsa => "DSA",
            TileId::Resume => "Resume",
            TileId::Profile => "Profile",
            TileId::Tech => "Tech Stack",
            TileId::Contact => "Contact Me",
            TileId::Basic => "Basic Info",
        }
    }

    /// Zone id used for the tile in the grid layout.
    pub const fn zone_id(self) -> &'static str {
        match self {
            TileId::Projects => "tile:projects",
            TileId::Dsa => "tile:dsa",
            TileId::Resume => "tile:resume",
            TileId::Profile => "tile:profile",
            TileId::Tech => "tile:tech",
            TileId::Contact => "tile:contact",
            TileId::Basic => "tile:basic",
        }
    }

    pub fn grid_area(self) -> GridArea {
        match self {
            TileId::Projects => GridArea::span_cols(0, 0..2),
            TileId::Dsa => GridArea::cell(0, 2),
            TileId::Resume => GridArea::cell(1, 0),
            TileId::Profile => GridArea::cell(1, 1),
            TileId::Tech => GridArea::cell(1, 2),
            TileId::Contact => GridArea::cell(2, 0),
            TileId::Basic => GridArea::span_cols(2, 1..3),
        }
    }

    /// Short line shown under the label. The profile face is drawn
    /// separately from the profile record.
    pub fn teaser(self, content: &ContentRecord) -> &str {
        match self {
            TileId::Projects => "Selected work",
            TileId::Dsa => "Problem solving",
            TileId::Resume => "Experience",
            TileId::Profile => &content.profile.name,
            TileId::Tech => "What I use",
            TileId::Contact => "Let's talk about systems",
            TileId::Basic => &content.basic_info.headline,
        }
    }

    /// Tiles that take pointer and keyboard activation.
    pub fn interactive() -> impl Iterator<Item = TileId> {
        Self::ALL.into_iter().filter(|tile| !tile.is_inert())
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TileId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        TileId::ALL
            .into_iter()
            .find(|tile| tile.as_str().eq_ignore_ascii_case(raw))
            .ok_or_else(|| format!("unknown tile `{raw}`"))
    }
}

/// The 3x3 bento grid: `1fr 2fr 1fr` on both axes.
pub fn bento_grid(gap: u16) -> Result<GridLayout, GridError> {
    let mut grid = GridLayout::new();
    let (narrow, wide) = (GridSize::try_flex(1)?, GridSize::try_flex(2)?);
    grid.add_col(narrow).add_col(wide).add_col(narrow);
    grid.add_row(narrow).add_row(wide).add_row(narrow);
    grid.with_gap(gap);

    for tile in TileId::ALL {
        grid.place(tile.zone_id(), tile.grid_area())?;
    }
    Ok(grid)
}
