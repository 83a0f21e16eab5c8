use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::error::{ConfigError, RenderError};
use crate::painter::ColorScheme;
use crate::render::Renderer;
use crate::surface::Surface;

pub trait Split: Sized {
    /// Splits into `n` contiguous parts whose lengths differ by at most one.
    fn split_parts(self, n: usize) -> Vec<Self>;
}

impl<T> Split for Vec<T> {
    fn split_parts(self, n: usize) -> Vec<Self> {
        assert!(n > 0, "cannot split into 0 parts");
        let size = self.len() / n;
        let size_xtra = self.len() % n;

        let mut rest = self;
        let mut parts: Vec<Vec<T>> = Vec::with_capacity(n);
        for i in 0..n {
            let len = if i < size_xtra { size + 1 } else { size };
            let tail = rest.split_off(len);
            parts.push(rest);
            rest = tail;
        }
        parts
    }
}

/// How rows are handed to workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Schedule {
    /// Idle workers pull the next row from a shared queue. Rows near the boundary of the set
    /// cost orders of magnitude more than rows outside it, so this keeps every worker busy.
    #[default]
    Dynamic,
    /// Each worker gets one contiguous block of rows up front. Simpler, but the worker that
    /// owns the expensive rows finishes long after the others.
    Static,
}

impl FromStr for Schedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dynamic" => Ok(Self::Dynamic),
            "static" => Ok(Self::Static),
            _ => Err(format!("unknown schedule {:?}, expected dynamic|static", s)),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dynamic => f.write_str("dynamic"),
            Self::Static => f.write_str("static"),
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct RenderStats {
    pub rows: usize,
    pub workers: usize,
    pub elapsed: Duration,
}

/// Renders whole surfaces on a pool of scoped worker threads.
///
/// Rows are the unit of work: each row slice is moved to exactly one worker, so pixel writes
/// never overlap and need no locking. `render` returns only after every worker has been joined.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    threads: usize,
    schedule: Schedule,
    stop: Option<Arc<AtomicBool>>,
}

type Row<'a, P> = (u32, &'a mut [P]);

impl Dispatcher {
    /// One worker per hardware thread, dynamic schedule.
    pub fn new() -> Self {
        Self {
            threads: num_cpus::get(),
            schedule: Schedule::default(),
            stop: None,
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Workers check `stop` before taking each row; a row already started is finished.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    fn stopped(&self) -> bool {
        match self.stop {
            Some(ref stop) => stop.load(Ordering::SeqCst),
            None => false,
        }
    }

    pub fn render<S, C>(
        &self,
        renderer: &Renderer,
        scheme: &C,
        surface: &mut S,
    ) -> Result<RenderStats, RenderError>
    where
        S: Surface,
        C: ColorScheme<Pixel = S::Pixel>,
    {
        let viewport = renderer.viewport();
        if surface.width() != viewport.width() || surface.height() != viewport.height() {
            return Err(ConfigError::SurfaceSize {
                width: viewport.width(),
                height: viewport.height(),
                got_width: surface.width(),
                got_height: surface.height(),
            }
            .into());
        }

        let start = Instant::now();
        let rows: Vec<Row<S::Pixel>> = surface
            .scanlines_mut()
            .into_iter()
            .enumerate()
            .map(|(y, row)| (y as u32, row))
            .collect();
        let total = rows.len();
        let workers = self.threads.min(total).max(1);
        debug!(
            "rendering {}x{} ({} iterations) on {} workers, {} schedule, {} kernel",
            viewport.width(),
            viewport.height(),
            viewport.max_iters(),
            workers,
            self.schedule,
            renderer.strategy(),
        );

        let rendered = match self.schedule {
            Schedule::Dynamic => self.render_dynamic(renderer, scheme, rows, workers),
            Schedule::Static => self.render_static(renderer, scheme, rows, workers),
        }?;
        if rendered < total {
            return Err(RenderError::Cancelled { rendered, total });
        }

        let stats = RenderStats {
            rows: total,
            workers,
            elapsed: start.elapsed(),
        };
        debug!("rendered {} rows in {:?}", stats.rows, stats.elapsed);
        Ok(stats)
    }

    fn render_dynamic<P, C>(
        &self,
        renderer: &Renderer,
        scheme: &C,
        rows: Vec<Row<P>>,
        workers: usize,
    ) -> Result<usize, RenderError>
    where
        P: Copy + Send,
        C: ColorScheme<Pixel = P>,
    {
        let queue = Mutex::new(rows.into_iter());
        let queue = &queue;
        thread::scope(|s| {
            let handles = (0..workers)
                .map(|n| {
                    s.spawn(move || {
                        let mut done = 0;
                        while !self.stopped() {
                            let next = match queue.lock() {
                                Ok(mut q) => q.next(),
                                Err(_) => None,
                            };
                            match next {
                                Some((y, row)) => renderer.render_line(y, scheme, row),
                                None => break,
                            }
                            done += 1;
                        }
                        trace!("worker {} rendered {} rows", n, done);
                        done
                    })
                })
                .collect();
            join_workers(handles)
        })
    }

    fn render_static<P, C>(
        &self,
        renderer: &Renderer,
        scheme: &C,
        rows: Vec<Row<P>>,
        workers: usize,
    ) -> Result<usize, RenderError>
    where
        P: Copy + Send,
        C: ColorScheme<Pixel = P>,
    {
        thread::scope(|s| {
            let handles = rows
                .split_parts(workers)
                .into_iter()
                .enumerate()
                .map(|(n, part)| {
                    s.spawn(move || {
                        let mut done = 0;
                        for (y, row) in part {
                            if self.stopped() {
                                break;
                            }
                            renderer.render_line(y, scheme, row);
                            done += 1;
                        }
                        trace!("worker {} rendered {} rows", n, done);
                        done
                    })
                })
                .collect();
            join_workers(handles)
        })
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn join_workers(handles: Vec<ScopedJoinHandle<'_, usize>>) -> Result<usize, RenderError> {
    let mut rendered = 0;
    let mut panicked = false;
    for handle in handles {
        match handle.join() {
            Ok(n) => rendered += n,
            Err(_) => panicked = true,
        }
    }
    if panicked {
        return Err(RenderError::WorkerPanicked);
    }
    Ok(rendered)
}
