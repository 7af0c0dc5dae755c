// What you SEE:
// • A save-the-date page: title on top, a gold heart in the middle, names below.
// • Hold Left Mouse and drag over the heart: the gold scratches off, glitter flies.
// • Once more than half the gold is gone, it fades away and a banner appears.
// • ESC quits.

use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use minifb::Scale;
use scratch_heart::draw::{draw_text_5x7, draw_text_centered, Drawer};
use scratch_heart::{CardConfig, FrameBuffer, ScratchCard, SurfaceGeometry};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Page chrome around the card.
const MARGIN_X: usize = 60;
const HEADER: usize = 80;
const FOOTER: usize = 120;
const TITLE_COLOR: u32 = 0x00_2E_2E_2E;
const BANNER_COLOR: u32 = 0x00_B8_A6_7D;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Preset {
    /// 280x260 card with a shadow under the coating
    Classic,
    /// 320x300 card, as hosted on the save-the-date page
    SaveTheDate,
}

/// Window pixel scale factors accepted by `--scale`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum WindowScale {
    #[value(name = "1")]
    X1,
    #[value(name = "2")]
    X2,
    #[value(name = "4")]
    X4,
}

impl From<WindowScale> for Scale {
    fn from(s: WindowScale) -> Self {
        match s {
            WindowScale::X1 => Scale::X1,
            WindowScale::X2 => Scale::X2,
            WindowScale::X4 => Scale::X4,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "scratch-heart", version, about = "Scratch-off save-the-date card")]
struct Cli {
    /// JSON card config (overrides the preset).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Preset::SaveTheDate)]
    preset: Preset,

    /// Decorative coating image (PNG/JPEG). Default: built-in gold glitter.
    #[arg(long)]
    image: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Seed for glitter randomness.
    #[arg(long)]
    seed: Option<u64>,

    /// Window pixel scale.
    #[arg(long, value_enum, default_value = "2")]
    scale: WindowScale,

    /// Line under the card.
    #[arg(long, default_value = "Nishtha & Abhishek")]
    names: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    /* --- Card + page setup ---
       Visual: window opens with the covered heart centered on the page. */
    let (cw, ch) = (config.width as usize, config.height as usize);
    let (page_w, page_h) = (cw + 2 * MARGIN_X, HEADER + ch + FOOTER);
    let page_color = config.style.page_color;

    let mut card = match cli.seed {
        Some(seed) => ScratchCard::with_seed(config, seed),
        None => ScratchCard::new(config),
    }
    .context("create scratch card")?;
    card.set_geometry(SurfaceGeometry::unscaled(MARGIN_X as f32, HEADER as f32, cw as u32, ch as u32));

    // The host's only signal from the card.
    let revealed = Rc::new(Cell::new(false));
    let flag = revealed.clone();
    card.on_complete(move || flag.set(true));

    let mut drawer = Drawer::new("Save the Date", page_w, page_h, cli.scale.into()).context("open window")?;
    let mut screen = FrameBuffer::new(page_w, page_h);

    /* --- HUD / FPS --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Input: every pointer edge goes to the card. */
        for event in drawer.poll_pointer() {
            card.handle_event(&event);
        }

        /* 2) One frame of time: image delivery, glitter, fade. */
        card.on_frame();

        /* 3) Page: background, title, card, names, banner. */
        screen.fill(page_color);
        draw_text_centered(&mut screen, (page_w / 2) as i32, 30, "SAVE THE DATE", TITLE_COLOR, 3);
        card.render(&mut screen);
        let names_y = (HEADER + ch + 50) as i32;
        draw_text_centered(&mut screen, (page_w / 2) as i32, names_y, &cli.names, TITLE_COLOR, 2);
        if revealed.get() {
            draw_text_centered(&mut screen, (page_w / 2) as i32, names_y + 30, "SEE YOU THERE!", BANNER_COLOR, 1);
        }
        let hud = format!("{:.0}% | {}", card.scratch_percent(), hud_fps_text);
        draw_text_5x7(&mut screen, 4, (page_h - 10) as i32, &hud, 0x00_C0_C0_C0, 1);

        /* 4) Present. */
        drawer.present(&screen).context("present frame")?;

        /* 5) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            tracing::debug!(fps, "frame rate");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    card.unmount();
    Ok(())
}

/// Preset, then config file, then individual CLI overrides.
fn build_config(cli: &Cli) -> anyhow::Result<CardConfig> {
    let mut config = match &cli.config {
        Some(path) => CardConfig::from_path(path).with_context(|| format!("load {}", path.display()))?,
        None => match cli.preset {
            Preset::Classic => CardConfig::classic(),
            Preset::SaveTheDate => CardConfig::save_the_date(),
        },
    };
    if let Some(image) = &cli.image {
        config.image = Some(image.clone());
    }
    if let Some(w) = cli.width {
        config.width = w;
    }
    if let Some(h) = cli.height {
        config.height = h;
    }
    config.validate().context("invalid card config")?;
    Ok(config)
}
