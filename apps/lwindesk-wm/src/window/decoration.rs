use tracing::debug;

use crate::window::draw::{Artwork, TitlebarRenderer};
use crate::window::frame::{DecorationRegion, TITLEBAR_HEIGHT};

/// Server-side title bar state for one view.
///
/// `artwork` is present exactly while `enabled` is set, and its width is the
/// width it was last rendered at.
#[derive(Debug, Default)]
pub struct Decoration {
    enabled: bool,
    width: i32,
    cached_title: Option<String>,
    artwork: Option<Artwork>,
}

impl Decoration {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn cached_title(&self) -> Option<&str> {
        self.cached_title.as_deref()
    }

    pub fn artwork(&self) -> Option<&Artwork> {
        self.artwork.as_ref()
    }

    /// Height the title bar adds above the surface, zero when disabled.
    pub fn offset(&self) -> i32 {
        if self.enabled {
            TITLEBAR_HEIGHT
        } else {
            0
        }
    }

    /// Render the initial artwork. Does nothing if already enabled.
    pub fn enable(&mut self, renderer: &mut dyn TitlebarRenderer, width: i32, title: Option<&str>) {
        if self.enabled {
            return;
        }
        let width = width.max(1);
        self.artwork = Some(renderer.render(width, TITLEBAR_HEIGHT, title.unwrap_or("")));
        self.width = width;
        self.cached_title = title.map(str::to_owned);
        self.enabled = true;
        debug!("Decoration enabled at width {}", width);
    }

    /// Re-render if the surface width or title changed since the last
    /// render. Returns whether any rendering happened.
    pub fn update(&mut self, renderer: &mut dyn TitlebarRenderer, width: i32, title: Option<&str>) -> bool {
        if !self.enabled || width <= 0 {
            return false;
        }
        if width == self.width && title == self.cached_title.as_deref() {
            return false;
        }
        self.artwork = Some(renderer.render(width, TITLEBAR_HEIGHT, title.unwrap_or("")));
        self.width = width;
        self.cached_title = title.map(str::to_owned);
        true
    }

    /// Drop the artwork and stop answering hit-tests.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        self.width = 0;
        self.cached_title = None;
        self.artwork = None;
    }

    /// Region under a point relative to the decoration's top-left corner.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<DecorationRegion> {
        if !self.enabled {
            return None;
        }
        DecorationRegion::classify(self.width, x, y)
    }
}
