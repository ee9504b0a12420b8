use tracing::info;

use crate::core::geometry::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub name: String,
    pub rect: Rect,
}

/// The arrangement of monitors in layout space.
#[derive(Debug, Default)]
pub struct OutputLayout {
    outputs: Vec<Output>,
}

impl OutputLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an output, or move it if one with the same name exists.
    pub fn add(&mut self, name: impl Into<String>, rect: Rect) {
        let name = name.into();
        info!(
            "Output {} at {},{} {}x{}",
            name, rect.x, rect.y, rect.width, rect.height
        );
        if let Some(existing) = self.outputs.iter_mut().find(|o| o.name == name) {
            existing.rect = rect;
        } else {
            self.outputs.push(Output { name, rect });
        }
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.outputs.len();
        self.outputs.retain(|o| o.name != name);
        let removed = self.outputs.len() != before;
        if removed {
            info!("Output {} removed", name);
        }
        removed
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Geometry of the output containing the point, if any.
    pub fn output_at(&self, x: f64, y: f64) -> Option<Rect> {
        self.outputs.iter().map(|o| o.rect).find(|r| r.contains(x, y))
    }

    /// Bounding box of all outputs; empty when there are none.
    pub fn extents(&self) -> Rect {
        self.outputs
            .iter()
            .fold(Rect::default(), |acc, o| acc.union(&o.rect))
    }
}
