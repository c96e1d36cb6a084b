//! Display list: a flat sequence of drawing commands in paint order.

use botblocks_common::{Color, Rect};
use serde::Serialize;

/// A single drawing command.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid (possibly translucent) colour.
    FillRect {
        /// Area to fill.
        rect: Rect,
        /// Fill colour.
        color: Color,
    },
    /// Outline a rectangle.
    StrokeRect {
        /// Rectangle to outline.
        rect: Rect,
        /// Line colour.
        color: Color,
        /// Line width in pixels.
        width: f32,
    },
    /// Draw one line of text with its top-left corner at `(x, y)`.
    DrawText {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Text to draw.
        text: String,
        /// Font size in pixels.
        font_size: f32,
        /// Text colour.
        color: Color,
    },
    /// Draw an image scaled into `rect`.
    ///
    /// `source` is the path the image provider knows the image by.
    DrawImage {
        /// Destination rectangle.
        rect: Rect,
        /// Image path.
        source: String,
    },
}

/// Executes drawing commands. Implemented by the host.
pub trait RenderSurface {
    /// Execute one command.
    fn draw(&mut self, command: &DisplayCommand);
}

/// An ordered list of drawing commands (back to front).
#[derive(Debug, Clone, Default, Serialize)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Append a command.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// The commands in paint order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Play every command onto `surface`, in order.
    pub fn replay(&self, surface: &mut dyn RenderSurface) {
        for command in &self.commands {
            surface.draw(command);
        }
    }
}
