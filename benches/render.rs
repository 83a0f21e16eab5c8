use std::collections::HashSet;

use lanebrot::bench::{Benchmark, BenchmarkReport};
use lanebrot::coord::{Frame, RenderConfig};
use lanebrot::painter::Palette;
use lanebrot::render::Renderer;
use lanebrot::solver::Strategy;
use lanebrot::surface::Canvas;
use lanebrot::threads::{Dispatcher, Schedule};

const REPEATS: usize = 5;
const MAX_ITERS: u32 = 256;

fn thread_counts() -> Vec<usize> {
    let mut tcounts: HashSet<usize> = HashSet::new();
    tcounts.insert(1);
    tcounts.insert(2);
    tcounts.insert(4);
    tcounts.insert(num_cpus::get_physical());
    tcounts.insert(num_cpus::get());

    let mut tcounts: Vec<usize> = tcounts.into_iter().collect();
    tcounts.sort();
    tcounts
}

fn benchmark_render(
    threads: usize,
    schedule: Schedule,
    strategy: Strategy,
    height: u32,
) -> Benchmark {
    let width = (3 * height) / 2;
    let config = RenderConfig::new(Frame::default(), width, height, MAX_ITERS);
    let renderer = Renderer::new(config.viewport().unwrap()).with_strategy(strategy);
    let dispatcher = Dispatcher::new()
        .with_threads(threads)
        .with_schedule(schedule);
    let palette = Palette::new();
    let name = format!("{}-{}-t{}-{}x{}", strategy, schedule, threads, width, height);
    Benchmark::iter(&name, REPEATS, move || {
        let mut canvas = Canvas::black(width, height);
        dispatcher.render(&renderer, &palette, &mut canvas).unwrap();
    })
}

fn main() {
    let mut report = BenchmarkReport::new();
    for strategy in [Strategy::Scalar, Strategy::Lanes, Strategy::PairedLanes] {
        report.add_bench(benchmark_render(1, Schedule::Dynamic, strategy, 600));
    }
    for threads in thread_counts() {
        for schedule in [Schedule::Static, Schedule::Dynamic] {
            report.add_bench(benchmark_render(threads, schedule, Strategy::PairedLanes, 1000));
        }
    }
    report.report("render").unwrap();
}
