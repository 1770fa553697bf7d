use serde::{Deserialize, Serialize};

/// One-based page index inside a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageNumber(u32);

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    /// Returns `None` for zero; pages are counted from one.
    pub fn new(page: u32) -> Option<Self> {
        (page >= 1).then_some(Self(page))
    }

    /// Lenient conversion for values read off the wire: anything missing or
    /// below one lands on the first page.
    pub fn from_wire(page: Option<i64>) -> Self {
        page.and_then(|page| u32::try_from(page).ok())
            .and_then(Self::new)
            .unwrap_or(Self::FIRST)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for PageNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: ScreenPoint) -> f32 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    pub origin: ScreenPoint,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub const fn new(origin: ScreenPoint, width: f32, height: f32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }
}

/// A renderable document plus the page the viewer should open on.
///
/// `resource_url` never carries the page anchor; use [`ViewerTarget::viewer_url`]
/// for the URL handed to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerTarget {
    pub resource_url: String,
    pub page: PageNumber,
}

impl ViewerTarget {
    pub fn viewer_url(&self) -> String {
        format!("{}#page={}", self.resource_url, self.page)
    }
}
