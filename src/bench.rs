//! Minimal wall-clock benchmark harness for `benches/` and the image generator.
use std::fs;
use std::io::{self, stdout, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct Benchmark {
    f: Rc<dyn Fn()>,
    name: String,
    iterations: usize,
}

impl Benchmark {
    pub fn iter<F: Fn() + 'static>(name: &str, n: usize, f: F) -> Self {
        Self {
            f: Rc::new(f),
            name: name.to_string(),
            iterations: n.max(1),
        }
    }

    pub fn once<F: Fn() + 'static>(name: &str, f: F) -> Self {
        Self::iter(name, 1, f)
    }

    pub fn run(&self) -> Measurement {
        Measurement {
            name: self.name.clone(),
            iterations: self.iterations,
            total: time_n(self.iterations, || (self.f)()),
        }
    }
}

/// Runs `f` `n` times and returns the total wall time.
pub fn time_n<F: FnMut()>(n: usize, mut f: F) -> Duration {
    let start = Instant::now();
    for _ in 0..n {
        f();
    }
    start.elapsed()
}

#[derive(Clone, Debug)]
pub struct Measurement {
    pub name: String,
    pub iterations: usize,
    pub total: Duration,
}

impl Measurement {
    pub fn per_call(&self) -> Duration {
        self.total.div_f64(self.iterations as f64)
    }
}

pub enum Unit {
    Microsecond,
    Millisecond,
    Second,
}

impl Unit {
    pub fn scaled(d: &Duration) -> Self {
        if d.as_micros() < 10_000 {
            Self::Microsecond
        } else if d.as_millis() < 10_000 {
            Self::Millisecond
        } else {
            Self::Second
        }
    }

    pub fn format(&self, d: &Duration, width: usize) -> String {
        let (symbol, value) = match self {
            Self::Microsecond => ("us", d.as_micros()),
            Self::Millisecond => ("ms", d.as_millis()),
            Self::Second => ("s", d.as_secs() as u128),
        };
        format!("{:>width$}{:<2}", value, symbol)
    }
}

fn fmt_duration(d: &Duration) -> String {
    Unit::scaled(d).format(d, 6)
}

#[derive(Default)]
pub struct BenchmarkReport {
    benches: Vec<Benchmark>,
    results: Vec<Measurement>,
}

impl BenchmarkReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bench(&mut self, bench: Benchmark) {
        self.benches.push(bench);
    }

    pub fn with_benches(benches: Vec<Benchmark>) -> Self {
        Self {
            benches,
            results: vec![],
        }
    }

    pub fn results(&self) -> &[Measurement] {
        &self.results
    }

    pub fn run(&mut self) {
        for bench in &self.benches {
            self.results.push(bench.run());
            print!(".");
            let _ = stdout().flush();
        }
        println!();
    }

    pub fn show(&self) {
        println!("  {: <40} {: >8}   {: >8}", "benchmark", "total", "per_call");
        for m in &self.results {
            println!(
                "  {: <40} {}   {}",
                m.name,
                fmt_duration(&m.total),
                fmt_duration(&m.per_call()),
            )
        }
    }

    pub fn to_csv(&self) -> String {
        let mut lines = vec!["benchmark,total_us,iterations,per_call_us".to_string()];
        for m in &self.results {
            lines.push(format!(
                "{},{},{},{}",
                m.name,
                m.total.as_micros(),
                m.iterations,
                m.per_call().as_micros(),
            ));
        }
        lines.push(String::new());
        lines.join("\n")
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        fs::write(path, self.to_csv())
    }

    pub fn report(&mut self, name: &str) -> io::Result<()> {
        print!("benchmark: {}", name);
        self.run();
        self.show();
        self.write_csv(format!("benchmark_{}.csv", name))
    }
}
