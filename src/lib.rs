//! fresco: a small software-leaning 2D engine over SDL2.
//!
//! Applications implement [`Application`] and hand it to [`engine::run`]
//! together with a [`Config`]. The loop drives input, update, drawing into a
//! low-resolution offscreen target that is scaled up to the window, and a
//! bank of countdown timers. Curved and polygonal primitives are rasterized
//! scanline by scanline in [`raster`]; images, text sheets and sounds are
//! thin layers over SDL2_image and the SDL audio queue.

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod gfx;
pub mod image;
pub mod input;
pub mod math;
pub mod pixels;
pub mod raster;
pub mod shape;
pub mod timer;

pub use audio::Sound;
pub use config::Config;
pub use engine::{run, Application, Context};
pub use error::DrawError;
pub use gfx::{Gfx, Transform};
pub use image::{BitmapFont, Image, ImageStore, Sprite};
pub use input::{Button, InputState};
pub use math::Vec2;
pub use pixels::PixelBlock;
pub use shape::ShapeBuilder;
pub use timer::{TimerBank, TimerId, TIMER_SLOTS};
