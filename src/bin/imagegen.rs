use std::error::Error;
use std::path::PathBuf;

use log::info;
use structopt::StructOpt;

use lanebrot::bench::time_n;
use lanebrot::coord::{Frame, RenderConfig};
use lanebrot::painter::{ColorScheme, Greyscale, Palette, Rainbow};
use lanebrot::render::Renderer;
use lanebrot::solver::Strategy;
use lanebrot::surface::Canvas;
use lanebrot::threads::{Dispatcher, Schedule};

#[derive(Debug, StructOpt)]
#[structopt(name = "lanebrot-imagegen", about = "Render the Mandelbrot set to an image")]
struct Opt {
    #[structopt(default_value = "640")]
    width: u32,
    #[structopt(default_value = "480")]
    height: u32,
    /// Iteration budget per pixel
    #[structopt(default_value = "128")]
    max_iters: u32,
    /// Frames to render, for timing
    #[structopt(default_value = "1")]
    runs: usize,

    #[structopt(long, default_value = "-2.5", allow_hyphen_values = true)]
    xl: f32,
    #[structopt(long, default_value = "1", allow_hyphen_values = true)]
    xh: f32,
    #[structopt(long, default_value = "-1", allow_hyphen_values = true)]
    yl: f32,
    #[structopt(long, default_value = "1", allow_hyphen_values = true)]
    yh: f32,

    /// Worker threads, defaults to one per hardware thread
    #[structopt(short, long)]
    threads: Option<usize>,
    /// dynamic | static
    #[structopt(long, default_value = "dynamic")]
    schedule: Schedule,
    /// scalar | lanes | paired
    #[structopt(long, default_value = "paired")]
    strategy: Strategy,
    /// palette | rainbow | greyscale
    #[structopt(long, default_value = "palette")]
    colors: String,
    #[structopt(short, long, parse(from_os_str), default_value = "render.bmp")]
    output: PathBuf,
}

fn run<C>(
    opt: &Opt,
    renderer: &Renderer,
    dispatcher: &Dispatcher,
    scheme: &C,
) -> Result<(), Box<dyn Error>>
where
    C: ColorScheme<Pixel = image::Rgb<u8>>,
{
    let viewport = renderer.viewport();
    let mut canvas = Canvas::black(viewport.width(), viewport.height());
    let runs = opt.runs.max(1);

    let mut result = Ok(());
    let total = time_n(runs, || {
        if result.is_ok() {
            result = dispatcher.render(renderer, scheme, &mut canvas).map(|_| ());
        }
    });
    result?;

    info!("rendering done");
    println!(
        "Avg time per frame: {:.3} (ms)\nTotal time taken:   {:.3} (ms)",
        total.as_secs_f64() * 1e3 / runs as f64,
        total.as_secs_f64() * 1e3,
    );
    canvas.save(&opt.output)?;
    info!("wrote {}", opt.output.display());
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let opt = Opt::from_args();

    let config = RenderConfig::new(
        Frame::from_nums(opt.xl, opt.xh, opt.yl, opt.yh),
        opt.width,
        opt.height,
        opt.max_iters,
    );
    let renderer = Renderer::new(config.viewport()?).with_strategy(opt.strategy);
    let mut dispatcher = Dispatcher::new().with_schedule(opt.schedule);
    if let Some(threads) = opt.threads {
        dispatcher = dispatcher.with_threads(threads);
    }
    println!("Using {} threads", dispatcher.threads());

    match opt.colors.as_str() {
        "palette" => run(&opt, &renderer, &dispatcher, &Palette::new()),
        "rainbow" => run(&opt, &renderer, &dispatcher, &Rainbow::new(opt.max_iters)),
        "greyscale" => run(&opt, &renderer, &dispatcher, &Greyscale::new(opt.max_iters)),
        other => Err(format!("unknown color scheme {:?}", other).into()),
    }
}
