//! Error types for drawing and shape-protocol failures.
//!
//! Platform setup failures (window, renderer) stay `Result<_, String>` at the
//! `engine::run` boundary, matching how the SDL2 bindings report them. Errors
//! that the application can recover from are typed here.

use thiserror::Error;

/// A drawing operation that could not be carried out. The operation is a
/// no-op; the frame loop keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrawError {
    /// Ellipse or circle called with a negative radius.
    #[error("negative radius: rx={rx} ry={ry}")]
    NegativeRadius { rx: i32, ry: i32 },

    /// Polygon fill needs at least three vertices.
    #[error("polygon fill needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),

    /// Parallel vertex arrays differ in length.
    #[error("vertex array length mismatch: {xs} x-coords vs {ys} y-coords")]
    VertexMismatch { xs: usize, ys: usize },

    /// `polygon_begin` called while another shape is still open.
    #[error("polygon_begin called while a shape is already open")]
    ShapeAlreadyOpen,

    /// `polygon_vertex` or `polygon_end` called with no open shape.
    #[error("no shape open")]
    ShapeNotOpen,

    /// The rendering backend rejected a primitive.
    #[error("renderer: {0}")]
    Backend(String),
}

impl DrawError {
    /// Wrap an SDL error string.
    pub fn backend(e: impl Into<String>) -> Self {
        Self::Backend(e.into())
    }
}
