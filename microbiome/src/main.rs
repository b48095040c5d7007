//! Microbiome is a trail following swarm simulation in the style of slime molds
//!
//! ## The Field
//! Everything happens on a grid of coloured pixels, the trail field.
//! Each frame the whole field is blurred a little and gets a bit darker,
//! so trails spread out and fade away unless something keeps renewing them.
//!
//! ## The Agents
//! Tens of thousands of tiny agents walk across the field.
//! Each one has three sensors, one straight ahead and two at an angle to the sides.
//! It turns towards whichever sensor sees the brightest trail, takes a step
//! and leaves its own colour behind on the pixel it lands on.
//!
//! Nothing more than that is needed for networks of veins, spirals and cells to appear.
//!
//! ## Species
//! How fast agents walk and turn, how far ahead they look and at which angle,
//! and what colour they leave behind is called a species or preset here.
//! There is a catalog of hand picked ones and any number of random ones.
//! Switching species wipes the field and spawns a fresh population.
//!
//! ## Determinism
//! All the per-agent work runs in parallel, but every agent rolls its dice from its own
//! generator, and deposits are saturating additions which do not care about order.
//! Given the same seed and configuration two runs produce exactly the same frames.

// The interesting bit is App::update() in the app module, it runs the phases of one tick.
// Agents live in the agent module, the field and its atomic cells in field,
// blur and decay in diffusion.
// main() only parses the command line, opens a window and forwards key presses as commands.
// If you just want to change some numbers have a look at the config module.

use clap::Parser;
use opengl_graphics::{GlGraphics, OpenGL};
use piston::event_loop::{EventLoop, EventSettings, Events};
use piston::input;
use piston::input::{ButtonEvent, RenderEvent, UpdateEvent};
use piston::window::{AdvancedWindow, WindowSettings};
use sdl2_window::Sdl2Window as Window;
use std::error::Error;
use std::time::Instant;

mod config;
use config::{Config, DepositMode, PhaseOrder};

mod vecmath;

mod field;

mod diffusion;

mod agent;

mod population;

mod preset;

mod app;
use app::{App, Command};

mod renderer;
use renderer::Renderer;

// coordinates:
// [width, height] <=> [x, y]
//
//  0 -- +x ->
//  |
// +y
//  v
//
// headings are in radians, 0 points right, positive turns towards +y

#[derive(Parser, Debug)]
#[command(version, about = "trail following swarm simulation")]
struct Args {
    /// canvas width in pixels
    #[arg(long, default_value_t = config::CANVAS_WIDTH)]
    width: usize,
    /// canvas height in pixels, the info panel is added below
    #[arg(long, default_value_t = config::CANVAS_HEIGHT)]
    height: usize,
    /// simulation steps and frames per second, a whole number
    #[arg(long, default_value_t = config::FRAME_RATE)]
    fps: f64,
    /// number of agents
    #[arg(long, default_value_t = config::TOTAL_AGENTS)]
    agents: usize,
    #[arg(long, default_value_t = config::SEED)]
    seed: u64,
    /// smallest radius of the spawn disc
    #[arg(long, default_value_t = config::MIN_SPAWN_RADIUS)]
    min_radius: f64,
    /// largest radius of the spawn disc
    #[arg(long, default_value_t = config::MAX_SPAWN_RADIUS)]
    max_radius: f64,
    #[arg(long, value_enum, default_value_t = DepositMode::Add)]
    deposit: DepositMode,
    /// deposit before diffusing instead of after
    #[arg(long)]
    deposit_first: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            width: self.width,
            height: self.height,
            frame_rate: self.fps,
            population: self.agents,
            seed: self.seed,
            min_spawn_radius: self.min_radius,
            max_spawn_radius: self.max_radius,
            deposit: self.deposit,
            order: if self.deposit_first {
                PhaseOrder::DepositThenDiffuse
            } else {
                PhaseOrder::DiffuseThenDeposit
            },
            ..Config::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    // config errors surface here, before any window shows up
    let mut app = App::new(args.config())?;
    let config = app.config().clone();

    // a textured quad and some text, nothing newer needed
    let opengl = OpenGL::V3_2;

    let mut window: Window = WindowSettings::new(
        "microbiome",
        [
            config.width as u32,
            (config.height + config::PANEL_HEIGHT) as u32,
        ],
    )
    .graphics_api(opengl)
    .resizable(false)
    .exit_on_esc(true)
    .build()?;

    // graphics stuff
    let mut render = Renderer::new(GlGraphics::new(opengl), &app)?;

    let ts = opengl_graphics::TextureSettings::new();

    // font_kit only finds the font file, rusttype inside the glyph cache does the rest
    use font_kit::family_name::FamilyName;
    use font_kit::handle::Handle;
    use font_kit::properties::Properties;
    use font_kit::source::SystemSource;

    let fontprops = Properties::new();
    let fontfam = [
        FamilyName::Title("FiraCode".to_owned()),
        FamilyName::SansSerif,
    ];
    let handle = SystemSource::new().select_best_match(&fontfam, &fontprops)?;
    // todo: font collections need the index, this always takes the first face
    let fontdata: Result<std::path::PathBuf, Vec<u8>> = match handle {
        Handle::Path { path, .. } => Ok(path),
        Handle::Memory { bytes, .. } => Err((*bytes).clone()),
    };
    let mut cache = match fontdata.as_ref() {
        Ok(path) => {
            log::info!("using font: {:?}", path);
            opengl_graphics::GlyphCache::new(path, (), ts)?
        }
        Err(bytes) => opengl_graphics::GlyphCache::from_bytes(bytes, (), ts)
            .map_err(|()| "could not load font from memory")?,
    };
    // end of graphics stuff

    let mut pause = false;
    let mut fps = FpsCounter::new();

    // validated to be a positive whole number
    let rate = config.frame_rate as u64;
    let settings = EventSettings::new().max_fps(rate).ups(rate);
    let mut events = Events::new(settings);
    while let Some(e) = events.next(&mut window) {
        if let Some(args) = e.button_args() {
            if args.state == input::ButtonState::Release {
                if let input::Button::Keyboard(key) = args.button {
                    match key {
                        input::keyboard::Key::Left => app.apply(Command::PreviousPreset),
                        input::keyboard::Key::Right => app.apply(Command::NextPreset),
                        input::keyboard::Key::Return => {
                            app.apply(Command::RandomPreset(rand::random()))
                        }
                        input::keyboard::Key::Space => {
                            pause = !pause;
                            log::info!("pausing {}", pause);
                        }
                        k => log::debug!("unhandled keypress: {:?}", k),
                    }
                }
            }
        }
        if let Some(args) = e.render_args() {
            render.render(&app, &args, &mut cache)?;
            if let Some(rate) = fps.tick() {
                log::debug!("{:.1} fps at tick {}", rate, app.tick());
                window.set_title(format!("microbiome - {:.0} FPS - {}", rate, app.preset().name));
            }
        }

        // always a fixed step of 1 / fps, no matter how late the update is
        if e.update_args().is_some() && !pause {
            app.update();
        }
    }
    log::info!("goodbye!");
    Ok(())
}

/// counts rendered frames, reports once a second
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();
        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}

#[test]
fn cli() {
    use clap::CommandFactory;
    Args::command().debug_assert();

    let args = Args::try_parse_from(["microbiome"]).unwrap();
    assert_eq!(args.config(), Config::default());

    let args = Args::try_parse_from([
        "microbiome",
        "--width",
        "320",
        "--agents",
        "1000",
        "--deposit",
        "overwrite",
        "--deposit-first",
    ])
    .unwrap();
    let c = args.config();
    assert_eq!(c.width, 320);
    assert_eq!(c.height, config::CANVAS_HEIGHT);
    assert_eq!(c.population, 1000);
    assert_eq!(c.deposit, DepositMode::Overwrite);
    assert_eq!(c.order, PhaseOrder::DepositThenDiffuse);

    assert!(Args::try_parse_from(["microbiome", "--deposit", "smear"]).is_err());
}

#[test]
fn fps_counter_waits_a_second() {
    let mut f = FpsCounter::new();
    assert_eq!(f.tick(), None);
    f.last_update -= std::time::Duration::from_secs(2);
    let rate = f.tick().unwrap();
    assert!(rate > 0. && rate < 2.);
}
