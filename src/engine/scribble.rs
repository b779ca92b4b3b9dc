use super::image::linear_index;
use crate::error::{MattingError, Result};

/// Class a scribble asserts for the pixels it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Foreground,
    Background,
}

impl Label {
    pub fn opposite(self) -> Self {
        match self {
            Label::Foreground => Label::Background,
            Label::Background => Label::Foreground,
        }
    }
}

/// Pixel coordinate as produced by a stroke; may lie outside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Ordered set of pixels marked with a single label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scribble {
    pub label: Label,
    pub points: Vec<Point>,
}

impl Scribble {
    pub fn new<P: Into<Point>>(label: Label, points: impl IntoIterator<Item = P>) -> Self {
        Self {
            label,
            points: points.into_iter().map(Into::into).collect(),
        }
    }

    pub fn foreground<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Self {
        Self::new(Label::Foreground, points)
    }

    pub fn background<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Self {
        Self::new(Label::Background, points)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Which classes have received at least one scribble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScribbleState {
    #[default]
    Empty,
    /// Only the given class has been scribbled
    Partial(Label),
    /// Both classes have been scribbled
    Full,
}

impl ScribbleState {
    /// State after accepting a scribble of `label`
    pub fn advance(self, label: Label) -> Self {
        match self {
            ScribbleState::Empty => ScribbleState::Partial(label),
            ScribbleState::Partial(seen) if seen == label => self,
            ScribbleState::Partial(_) | ScribbleState::Full => ScribbleState::Full,
        }
    }

    pub fn has(self, label: Label) -> bool {
        match self {
            ScribbleState::Empty => false,
            ScribbleState::Partial(seen) => seen == label,
            ScribbleState::Full => true,
        }
    }
}

/// Outcome of appending a non-empty scribble to the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appended {
    /// Position of the scribble in the log
    pub index: usize,
    pub label: Label,
    /// Linear pixel indices claimed by the scribble, deduplicated, in stroke order
    pub claimed: Vec<usize>,
    /// Number of claimed pixels previously owned by the opposite label
    pub displaced: usize,
}

#[derive(Debug, Clone)]
struct Entry {
    label: Label,
    pixels: Vec<usize>,
}

/// Append-only history of scribbles with last-writer-wins pixel ownership
#[derive(Debug, Clone)]
pub struct ScribbleLog {
    width: u32,
    height: u32,
    entries: Vec<Entry>,
    // pixel index -> index of the newest scribble covering it
    owner: Vec<Option<u32>>,
}

impl ScribbleLog {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            entries: Vec::new(),
            owner: vec![None; width as usize * height as usize],
        }
    }

    /// Record a scribble
    ///
    /// Returns `Ok(None)` for an empty scribble, which leaves the log untouched.
    /// A single out-of-bounds point rejects the whole scribble before any
    /// state changes.
    pub fn append(&mut self, scribble: &Scribble) -> Result<Option<Appended>> {
        if scribble.is_empty() {
            return Ok(None);
        }

        let mut claimed = Vec::with_capacity(scribble.points.len());
        for &Point { x, y } in &scribble.points {
            let index = linear_index(x, y, self.width, self.height).ok_or(
                MattingError::OutOfBounds {
                    x,
                    y,
                    width: self.width,
                    height: self.height,
                },
            )?;
            claimed.push(index);
        }

        let scribble_index = self.entries.len();
        let tag = scribble_index as u32;

        let mut displaced = 0;
        claimed.retain(|&pixel| {
            let previous = self.owner[pixel];
            if previous == Some(tag) {
                // repeated point within this scribble
                return false;
            }
            if let Some(previous) = previous {
                if self.entries[previous as usize].label != scribble.label {
                    displaced += 1;
                }
            }
            self.owner[pixel] = Some(tag);
            true
        });

        self.entries.push(Entry {
            label: scribble.label,
            pixels: claimed.clone(),
        });

        Ok(Some(Appended {
            index: scribble_index,
            label: scribble.label,
            claimed,
            displaced,
        }))
    }

    /// Number of scribbles accepted so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Label of the newest scribble covering `pixel`
    #[inline]
    pub fn owner_label(&self, pixel: usize) -> Option<Label> {
        self.owner[pixel].map(|tag| self.entries[tag as usize].label)
    }

    /// Pixels whose newest covering scribble carries `label`
    pub fn owned_pixels(&self, label: Label) -> impl Iterator<Item = usize> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.label == label)
            .flat_map(move |(tag, entry)| {
                entry
                    .pixels
                    .iter()
                    .copied()
                    .filter(move |&pixel| self.owner[pixel] == Some(tag as u32))
            })
    }
}
