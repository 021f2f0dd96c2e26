//! Text layout primitives for the editor core.
//!
//! * [`Fixed`]: 26.6 fixed-point scalar for horizontal pixel math.
//! * [`geom`]: integer pixel points, sizes, rectangles and constraints.
//! * [`Shaper`]: capability that wraps text into [`VisualLine`]s, plus the
//!   [`MonospaceShaper`] reference implementation.
//! * [`LineLayoutCache`]: dirty-flagged memo of the wrapped lines.

mod cache;
mod fixed;
pub mod geom;
mod shaper;

pub use cache::{Dimensions, INF, LineLayoutCache, align, lines_dimens, text_padding};
pub use fixed::Fixed;
pub use geom::{Constraints, Point, Rect, Size};
pub use shaper::{InkBounds, LayoutOptions, MonospaceShaper, Shaper, VisualLine};

/// Horizontal placement of each line inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Start,
    Middle,
    End,
}
