use crate::app::App;
use crate::config;
use crate::preset::Preset;
use crate::GlGraphics;
use graphics::character::CharacterCache;
use graphics::types::Matrix2d;
use piston::input::RenderArgs;
use texture::{CreateTexture, Filter, Format, TextureSettings, UpdateTexture};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

const FONT_SIZE: u32 = 12;
/// distance between panel lines and from the panel edges
const PADDING: f64 = 20.;

pub struct Renderer {
    pub gl: GlGraphics,
    /// the trail field, re-uploaded every frame
    canvas: opengl_graphics::Texture,
    size: [u32; 2],
}

impl Renderer {
    pub fn new(gl: GlGraphics, app: &App) -> Result<Self, String> {
        let size = [app.config().width as u32, app.config().height as u32];
        // one texel per field cell, no smoothing
        let settings = TextureSettings::new().filter(Filter::Nearest);
        let canvas: opengl_graphics::Texture = CreateTexture::create(
            &mut (),
            Format::Rgba8,
            sat_rgb::as_bytes(app.frame()),
            size,
            &settings,
        )?;
        Ok(Self { gl, canvas, size })
    }

    pub fn render<C>(
        &mut self,
        app: &App,
        args: &RenderArgs,
        glyph_cache: &mut C,
    ) -> Result<(), String>
    where
        C: CharacterCache<Texture = opengl_graphics::Texture>,
        <C as CharacterCache>::Error: std::fmt::Debug,
    {
        use graphics::*;

        // the inherent Texture::update takes an image, not raw bytes
        UpdateTexture::update(
            &mut self.canvas,
            &mut (),
            Format::Rgba8,
            sat_rgb::as_bytes(app.frame()),
            [0, 0],
            self.size,
        )?;

        let c = self.gl.draw_begin(args.viewport());
        let gl = &mut self.gl;
        clear(BLACK, gl);
        image(&self.canvas, c.transform, gl);

        // the panel sits right below the canvas
        let top = self.size[1] as f64;
        let width = self.size[0] as f64;
        rectangle(
            BLACK,
            [0., top, width, config::PANEL_HEIGHT as f64],
            c.transform,
            gl,
        );
        let (left, right) = panel_lines(app.preset());
        let drawn = display_text(
            &left.join("\n"),
            glyph_cache,
            c.transform.trans(PADDING, top),
            WHITE,
            FONT_SIZE,
            gl,
        )
        .and_then(|()| {
            right.iter().enumerate().try_for_each(|(idx, line)| {
                let w = glyph_cache.width(FONT_SIZE, line)?;
                let t = c
                    .transform
                    .trans(width - PADDING - w, top + PADDING * (idx + 1) as f64);
                graphics::text(WHITE, FONT_SIZE, line, glyph_cache, t, gl)
            })
        });
        self.gl.draw_end();
        drawn.map_err(|e| format!("failed to draw panel: {:?}", e))
    }
}

/// the left and the right (right aligned) column of the info panel
pub fn panel_lines(p: &Preset) -> ([String; 3], [String; 3]) {
    let [r, g, b] = p.color.channels();
    (
        [
            "MICROBIOME".to_owned(),
            p.name.clone(),
            "Left & Right - Switch Species | Enter - Random Species".to_owned(),
        ],
        [
            format!(
                "Move Speed: {} Nm/s | Turn Speed: {} Nm/s",
                p.move_speed as i64, p.turn_speed as i64
            ),
            format!(
                "Sensor Distance: {} Nm | Sensor Offset Angle: {} Rad",
                p.sensor_distance as i64,
                (p.sensor_offset_angle * 100.).trunc() / 100.
            ),
            format!("Red: {} | Green: {} | Blue: {}", r, g, b),
        ],
    )
}

/// displays multiline text, one line every [`PADDING`] pixels
fn display_text<C, G>(
    text: &str,
    glyph_cache: &mut C,
    // the left upper corner
    basetrans: Matrix2d,
    colour: [f32; 4],
    size: u32,
    graphics: &mut G,
) -> Result<(), <C as CharacterCache>::Error>
where
    G: graphics::Graphics,
    C: CharacterCache<Texture = G::Texture>,
    <C as CharacterCache>::Error: std::fmt::Debug,
{
    use graphics::Transformed;
    let basetrans = basetrans.trans(0., PADDING);
    text.split('\n').enumerate().try_for_each(|(idx, txt)| {
        graphics::text(
            colour,
            size,
            txt,
            glyph_cache,
            basetrans.trans(0., PADDING * idx as f64),
            graphics,
        )
    })
}

#[test]
fn panel_text() {
    let p = Preset {
        name: "Vein".to_owned(),
        move_speed: 200.7,
        turn_speed: 300.,
        sensor_size: 1,
        sensor_distance: 30.9,
        sensor_offset_angle: std::f64::consts::PI / 8.,
        color: sat_rgb::Rgb::new(80, 5, 5),
    };
    let (left, right) = panel_lines(&p);
    assert_eq!(left[0], "MICROBIOME");
    assert_eq!(left[1], "Vein");
    assert!(left[2].starts_with("Left & Right"));
    assert_eq!(right[0], "Move Speed: 200 Nm/s | Turn Speed: 300 Nm/s");
    assert_eq!(
        right[1],
        "Sensor Distance: 30 Nm | Sensor Offset Angle: 0.39 Rad"
    );
    assert_eq!(right[2], "Red: 80 | Green: 5 | Blue: 5");
}
