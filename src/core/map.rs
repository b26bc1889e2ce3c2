//! Tile grid and the sectioned `.map` loader.
//!
//! ```text
//! [metadata]
//! width=8
//! height=8
//! [player]
//! posX=3.5
//! posY=3.5
//! angle=0
//! [map]
//! 1 1 1 1 1 1 1 1
//! ...
//! ```
use std::fmt;
use std::fs;
use std::path::Path;

use crate::core::player::Camera;

/// Flat row-major grid. `0` is open floor, anything else is a wall.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![0; width * height] }
    }

    /// Empty interior with a one-tile wall border.
    pub fn bordered(width: usize, height: usize) -> Self {
        let mut grid = Self::new(width, height);
        for x in 0..width {
            grid.set(x, 0, 1);
            grid.set(x, height.saturating_sub(1), 1);
        }
        for y in 0..height {
            grid.set(0, y, 1);
            grid.set(width.saturating_sub(1), y, 1);
        }
        grid
    }

    pub fn from_rows(rows: &[&[u32]]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut grid = Self::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                grid.set(x, y, v);
            }
        }
        grid
    }

    #[inline] pub fn width(&self) -> usize { self.width }
    #[inline] pub fn height(&self) -> usize { self.height }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    pub fn set(&mut self, x: usize, y: usize, value: u32) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = value;
        }
    }

    /// Out-of-range cells count as walls so an unbordered map still stops every ray.
    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_none_or(|v| v > 0)
    }

    /// Wall test for a world-space point.
    #[inline]
    pub fn is_wall_at(&self, wx: f32, wy: f32) -> bool {
        self.is_wall(wx.floor() as i32, wy.floor() as i32)
    }
}

/// A map file that could not be read or parsed. Line numbers are 1-based.
#[derive(Debug)]
pub enum MapError {
    Io { path: String, source: std::io::Error },
    MissingDimension(&'static str),
    BadValue { line: usize, key: &'static str, value: String },
    ShortRow { line: usize, row: usize, found: usize, expected: usize },
    BadCell { line: usize, cell: String },
    MissingRows { expected: usize, found: usize },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io { path, source } => write!(f, "could not read map {path}: {source}"),
            MapError::MissingDimension(key) => write!(f, "map is missing {key} in [metadata]"),
            MapError::BadValue { line, key, value } => write!(f, "line {line}: invalid value {value:?} for {key}"),
            MapError::ShortRow { line, row, found, expected } => {
                write!(f, "line {line}: row {row} has {found} cells, expected {expected}")
            }
            MapError::BadCell { line, cell } => write!(f, "line {line}: cell {cell:?} is not a non-negative integer"),
            MapError::MissingRows { expected, found } => write!(f, "map declares {expected} rows but has {found}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A parsed level: grid plus the camera the `[player]` section describes.
#[derive(Clone, Debug)]
pub struct Level {
    pub grid: TileGrid,
    pub camera: Camera,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Section {
    None,
    Metadata,
    Player,
    Map,
}

pub fn load_map(path: &Path) -> Result<Level, MapError> {
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_map(&text)
}

pub fn parse_map(text: &str) -> Result<Level, MapError> {
    let mut section = Section::None;
    let mut width: Option<usize> = None;
    let mut height: Option<usize> = None;
    let (mut pos_x, mut pos_y, mut angle) = (3.5f32, 3.5f32, 0.0f32);
    let mut grid: Option<TileGrid> = None;
    let mut row = 0usize;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        match line {
            "[metadata]" => { section = Section::Metadata; continue; }
            "[player]" => { section = Section::Player; continue; }
            "[map]" => {
                section = Section::Map;
                let w = width.ok_or(MapError::MissingDimension("width"))?;
                let h = height.ok_or(MapError::MissingDimension("height"))?;
                grid = Some(TileGrid::new(w, h));
                continue;
            }
            "" => continue,
            _ => {}
        }

        match section {
            Section::Metadata => {
                if let Some(v) = line.strip_prefix("width=") {
                    width = Some(parse_value(line_no, "width", v)?);
                } else if let Some(v) = line.strip_prefix("height=") {
                    height = Some(parse_value(line_no, "height", v)?);
                }
            }
            Section::Player => {
                if let Some(v) = line.strip_prefix("posX=") {
                    pos_x = parse_value(line_no, "posX", v)?;
                } else if let Some(v) = line.strip_prefix("posY=") {
                    pos_y = parse_value(line_no, "posY", v)?;
                } else if let Some(v) = line.strip_prefix("angle=") {
                    angle = parse_value(line_no, "angle", v)?;
                }
            }
            Section::Map => {
                let Some(g) = grid.as_mut() else { continue };
                if row >= g.height() {
                    continue;
                }
                let cells: Vec<&str> = line.split_whitespace().collect();
                if cells.len() < g.width() {
                    return Err(MapError::ShortRow { line: line_no, row, found: cells.len(), expected: g.width() });
                }
                for (x, cell) in cells.iter().take(g.width()).enumerate() {
                    let v: u32 = cell.parse().map_err(|_| MapError::BadCell { line: line_no, cell: cell.to_string() })?;
                    g.set(x, row, v);
                }
                row += 1;
            }
            Section::None => {}
        }
    }

    let grid = match grid {
        Some(g) => g,
        None => {
            width.ok_or(MapError::MissingDimension("width"))?;
            height.ok_or(MapError::MissingDimension("height"))?;
            return Err(MapError::MissingRows { expected: height.unwrap_or(0), found: 0 });
        }
    };
    if row < grid.height() {
        return Err(MapError::MissingRows { expected: grid.height(), found: row });
    }

    Ok(Level { grid, camera: Camera::from_angle(pos_x, pos_y, angle) })
}

fn parse_value<T: std::str::FromStr>(line: usize, key: &'static str, v: &str) -> Result<T, MapError> {
    v.trim().parse().map_err(|_| MapError::BadValue { line, key, value: v.to_string() })
}
