//! Parallax logo demo.
//!
//! Three background layers scroll at different speeds behind a logo, and the
//! band of screen behind the logo is read back, flipped, dimmed and wobbled
//! into a watery reflection below it. Expects bgfar.png, bgnear.png,
//! bgnearest.png and logo.png next to the working directory's demos/ folder.

use log::error;

use fresco::{engine, Application, Config, Context, DrawError, Gfx, Image, PixelBlock};

struct Logo {
    background: Option<Image>,
    city: Option<Image>,
    neighbourhood: Option<Image>,
    logo: Option<Image>,
    reflection_in: PixelBlock,
    reflection_out: PixelBlock,
    x1: f32,
    x2: f32,
    time: f32,
    rng: u32,
}

impl Logo {
    fn new() -> Self {
        Self {
            background: None,
            city: None,
            neighbourhood: None,
            logo: None,
            reflection_in: PixelBlock::new(320, 100),
            reflection_out: PixelBlock::new(320, 100),
            x1: 0.0,
            x2: 0.0,
            time: 0.0,
            rng: 0x2545_f491,
        }
    }

    fn load_assets(&mut self, ctx: &mut Context) -> Result<(), String> {
        self.background = Some(ctx.load_image("demos/bgfar.png")?);
        self.city = Some(ctx.load_image("demos/bgnear.png")?);
        self.neighbourhood = Some(ctx.load_image("demos/bgnearest.png")?);
        self.logo = Some(ctx.load_image("demos/logo.png")?);
        Ok(())
    }

    fn next_rand(&mut self) -> u32 {
        let mut s = self.rng;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.rng = s;
        s
    }

    fn draw_scene(&mut self, gfx: &mut Gfx, elapsed: f32) -> Result<(), DrawError> {
        self.time += elapsed;
        let (Some(background), Some(city), Some(neighbourhood), Some(logo)) =
            (self.background, self.city, self.neighbourhood, self.logo)
        else {
            return Ok(());
        };

        gfx.draw_image(background, 0, 0)?;
        gfx.draw_image(city, self.x1 as i32, 0)?;
        gfx.draw_image(city, background.width() as i32 + self.x1 as i32, 0)?;
        gfx.draw_image(neighbourhood, self.x2 as i32, 0)?;
        gfx.draw_image(neighbourhood, neighbourhood.width() as i32 + self.x2 as i32, 0)?;
        gfx.draw_image(logo, 80, 160)?;

        // Reflect the band behind the logo: vertical flip, half brightness,
        // a sine wobble on the source column and a pixel of horizontal
        // jitter on the destination.
        self.reflection_in.read_from(gfx, 0, 100)?;
        let width = self.reflection_in.width();
        let height = self.reflection_in.height();
        for x in 0..width {
            let wobble = ((0.2 * x as f32 + self.time).sin() * 2.0) as i32;
            let src_x = x as i32 + wobble;
            if src_x < 0 || src_x >= width as i32 {
                continue;
            }
            for y in 0..height {
                if let Some((r, g, b, a)) = self.reflection_in.pixel(src_x as u32, y) {
                    let out_x = x as i32 + (self.next_rand() % 2) as i32 - 2;
                    let out_y = height - 1 - y;
                    if out_x >= 0 {
                        self.reflection_out
                            .set_pixel(out_x as u32, out_y, r / 2, g / 2, b / 2, a);
                    }
                }
            }
        }
        self.reflection_out.write_to(gfx, 0, 200, 1.0)
    }
}

impl Application for Logo {
    fn on_create(&mut self, ctx: &mut Context) {
        if let Err(e) = self.load_assets(ctx) {
            error!("could not load demo assets: {e}");
            ctx.quit();
        }
    }

    fn on_update(&mut self, _ctx: &mut Context, elapsed: f32) {
        self.x1 -= elapsed * 30.0;
        self.x2 -= elapsed * 40.0;
        if self.x1 < -320.0 {
            self.x1 = 0.0;
        }
        if self.x2 < -320.0 {
            self.x2 = 0.0;
        }
    }

    fn on_draw(&mut self, gfx: &mut Gfx, elapsed: f32) {
        if let Err(e) = self.draw_scene(gfx, elapsed) {
            error!("logo draw failed: {e}");
        }
    }
}

fn main() -> Result<(), String> {
    env_logger::init();
    let config = Config::new("fresco logo", 320, 300, 2);
    let mut app = Logo::new();
    engine::run(&config, &mut app)
}
