//! Frame loop driver.
//!
//! `run` owns every piece of per-run state: the window and renderer, the
//! offscreen target the application draws into, the image store, the timer
//! bank and the input machine. One iteration is poll, update, draw to the
//! offscreen target, present, then tick timers with the frame's measured
//! elapsed time. Everything is single-threaded; hooks get a [`Context`]
//! scoped to the current phase.

use std::time::Instant;

use log::{info, warn};
use sdl2::mouse::MouseUtil;
use sdl2::AudioSubsystem;

use crate::audio::Sound;
use crate::config::Config;
use crate::gfx::Gfx;
use crate::image::{Image, ImageStore};
use crate::input::{self, Button, InputState, RawEvent};
use crate::pixels::RGBA32_FORMAT;
use crate::shape::ShapeBuilder;
use crate::timer::{TimerBank, TimerId};

/// Application hooks called by the frame loop. Every hook has a no-op
/// default, so an application implements only what it uses.
#[allow(unused_variables)]
pub trait Application {
    /// Called once before the first frame.
    fn on_create(&mut self, ctx: &mut Context) {}

    /// Called every frame after input dispatch, before drawing.
    fn on_update(&mut self, ctx: &mut Context, elapsed: f32) {}

    /// Called every frame with the offscreen drawing surface.
    fn on_draw(&mut self, gfx: &mut Gfx, elapsed: f32) {}

    /// A button went down this frame (one edge per physical press).
    fn on_key_press(&mut self, ctx: &mut Context, elapsed: f32, button: Button) {}

    /// Fired once per frame for every button currently held.
    fn on_key_held(&mut self, ctx: &mut Context, elapsed: f32, button: Button) {}

    /// A button came up this frame.
    fn on_key_release(&mut self, ctx: &mut Context, elapsed: f32, button: Button) {}

    /// Pointer moved; `x`/`y` are logical coordinates, `dx`/`dy` raw deltas.
    fn on_mouse_move(&mut self, ctx: &mut Context, elapsed: f32, x: i32, y: i32, dx: i32, dy: i32) {
    }

    /// A character of text input (includes '\n', '\t' and backspace).
    fn on_text_input(&mut self, ctx: &mut Context, elapsed: f32, ch: char) {}

    /// Timer slot `timer` expired this frame.
    fn on_timer_tick(&mut self, ctx: &mut Context, elapsed: f32, timer: TimerId) {}

    /// Called once after the loop exits, before platform teardown.
    fn on_destroy(&mut self) {}
}

/// Engine services available inside a hook. A fresh `Context` is built for
/// each loop phase; holding one across frames is impossible by construction.
pub struct Context<'a, 'c> {
    timers: &'a mut TimerBank,
    quit: &'a mut bool,
    images: Option<&'a mut ImageStore<'c>>,
    audio: Option<&'a AudioSubsystem>,
    mouse: Option<&'a MouseUtil>,
    width: u32,
    height: u32,
    scale: u32,
}

impl<'a, 'c> Context<'a, 'c> {
    /// A context with no platform services attached, for exercising input
    /// and timer logic without a window.
    #[cfg(test)]
    pub(crate) fn bare(
        timers: &'a mut TimerBank,
        quit: &'a mut bool,
        width: u32,
        height: u32,
        scale: u32,
    ) -> Self {
        Self {
            timers,
            quit,
            images: None,
            audio: None,
            mouse: None,
            width,
            height,
            scale,
        }
    }

    /// Ask the loop to exit after the current phase.
    pub fn quit(&mut self) {
        *self.quit = true;
    }

    /// Logical surface width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Logical surface height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Window scale factor.
    #[inline]
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Arm timer slot `id` to fire every `duration` seconds.
    pub fn start_timer(&mut self, id: TimerId, duration: f32) {
        self.timers.start(id, duration);
    }

    /// Disarm timer slot `id`.
    pub fn stop_timer(&mut self, id: TimerId) {
        self.timers.stop(id);
    }

    /// Whether timer slot `id` is armed.
    pub fn timer_active(&self, id: TimerId) -> bool {
        self.timers.is_active(id)
    }

    /// Seconds until timer slot `id` next fires.
    pub fn timer_remaining(&self, id: TimerId) -> Option<f32> {
        self.timers.remaining(id)
    }

    /// Hide the cursor and switch to relative mouse reporting. Motion events
    /// caused by the platform re-centering the pointer are filtered out.
    pub fn capture_mouse(&self) {
        if let Some(mouse) = self.mouse {
            mouse.set_relative_mouse_mode(true);
        }
    }

    /// Return to absolute mouse reporting.
    pub fn release_mouse(&self) {
        if let Some(mouse) = self.mouse {
            mouse.set_relative_mouse_mode(false);
        }
    }

    /// Load an image into the run's image store.
    pub fn load_image(&mut self, path: impl AsRef<std::path::Path>) -> Result<Image, String> {
        match self.images.as_deref_mut() {
            Some(store) => store.load(path),
            None => Err("image store not available in this context".into()),
        }
    }

    /// The run's image store, when this context carries one.
    pub fn images(&mut self) -> Option<&mut ImageStore<'c>> {
        self.images.as_deref_mut()
    }

    /// Load a WAV file ready for playback.
    pub fn load_sound(&self, path: impl AsRef<std::path::Path>) -> Result<Sound, String> {
        let audio = self
            .audio
            .ok_or_else(|| String::from("audio subsystem not available"))?;
        Sound::load(audio, path)
    }
}

/// Open a window and drive `app` until it quits or the window is closed.
pub fn run(config: &Config, app: &mut dyn Application) -> Result<(), String> {
    let scale = config.scale.max(1);
    let (width, height) = (config.width, config.height);

    let sdl = sdl2::init()?;
    let video = sdl.video()?;
    let audio = match sdl.audio() {
        Ok(audio) => Some(audio),
        Err(e) => {
            warn!("audio subsystem unavailable, sounds disabled: {e}");
            None
        }
    };
    let _image_ctx = sdl2::image::init(sdl2::image::InitFlag::PNG | sdl2::image::InitFlag::JPG)?;

    let window = video
        .window(&config.title, width * scale, height * scale)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let mut builder = window.into_canvas().accelerated().target_texture();
    if config.vsync {
        builder = builder.present_vsync();
    }
    let mut canvas = builder.build().map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut target = texture_creator
        .create_texture_target(RGBA32_FORMAT, width, height)
        .map_err(|e| e.to_string())?;
    let mut event_pump = sdl.event_pump()?;
    let mouse = sdl.mouse();
    mouse.set_relative_mouse_mode(false);

    let mut images = ImageStore::new(&texture_creator);
    let mut timers = TimerBank::new();
    let mut input = InputState::new(width, height, scale);
    let mut shape = ShapeBuilder::new();
    let mut scratch: Vec<i32> = Vec::new();
    let mut events: Vec<RawEvent> = Vec::new();
    let mut fired: Vec<TimerId> = Vec::new();
    let mut quit = false;
    let mut elapsed = 0.0f32;

    info!(
        "{}: {}x{} logical at scale {}, vsync {}",
        config.title, width, height, scale, config.vsync
    );

    {
        let mut ctx = Context {
            timers: &mut timers,
            quit: &mut quit,
            images: Some(&mut images),
            audio: audio.as_ref(),
            mouse: Some(&mouse),
            width,
            height,
            scale,
        };
        app.on_create(&mut ctx);
    }

    while !quit {
        let frame_start = Instant::now();

        events.clear();
        for event in event_pump.poll_iter() {
            if let Some(raw) = input::translate(&event) {
                events.push(raw);
            }
        }
        let relative_capture = mouse.relative_mouse_mode();

        {
            let mut ctx = Context {
                timers: &mut timers,
                quit: &mut quit,
                images: Some(&mut images),
                audio: audio.as_ref(),
                mouse: Some(&mouse),
                width,
                height,
                scale,
            };
            input.dispatch(&events, elapsed, relative_capture, &mut ctx, app);
            app.on_update(&mut ctx, elapsed);
        }
        if quit {
            break;
        }

        canvas
            .with_texture_canvas(&mut target, |target_canvas| {
                let mut gfx =
                    Gfx::new(target_canvas, &images, &mut shape, &mut scratch, width, height);
                // The target starts each frame black.
                let _ = gfx.clear(0, 0, 0, 255);
                app.on_draw(&mut gfx, elapsed);
            })
            .map_err(|e| e.to_string())?;

        canvas.copy(&target, None, None)?;
        canvas.present();

        elapsed = frame_start.elapsed().as_secs_f32();

        fired.clear();
        timers.tick(elapsed, &mut fired);
        if !fired.is_empty() {
            let mut ctx = Context {
                timers: &mut timers,
                quit: &mut quit,
                images: Some(&mut images),
                audio: audio.as_ref(),
                mouse: Some(&mouse),
                width,
                height,
                scale,
            };
            for &id in &fired {
                app.on_timer_tick(&mut ctx, elapsed, id);
            }
        }
    }

    info!("{}: shutting down", config.title);
    app.on_destroy();
    Ok(())
}
