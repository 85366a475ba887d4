//! Release-mode throughput runner over random double-deck deals.
//!
//! Modes:
//!   gen   N            : generate N random deals only, measure generation rate
//!   solve N [wilds]    : generate then solve N deals (single-thread)
//!   solvepar N [wilds] : same, solved in parallel (needs --features parallel)
//!
//! `wilds` (0..=2, default 0) replaces that many leading cards with wild slots.
//!
//! Examples:
//!   cargo run --release --example perf -- solve 2000
//!   cargo run --release --example perf -- solve 200 1
//!   RAYON_NUM_THREADS=8 cargo run --release --features parallel --example perf -- solvepar 20000

use std::hint::black_box;
use std::sync::Arc;
use std::time::Instant;

use pyramid_arrange::batch;
use pyramid_arrange::{Card, Dealt, Solver, SolverConfig, WinProbabilityModel};

#[derive(Clone)]
struct XorShift64 {
    state: u64,
}
impl XorShift64 {
    #[inline(always)]
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// 17 cards from a freshly shuffled double deck, first `wilds` slots wild.
fn gen_deal(rng: &mut XorShift64, shoe: &mut [u8; 104], wilds: usize) -> Vec<Dealt> {
    // partial Fisher-Yates: only the first 17 positions are needed
    for i in 0..17 {
        let j = i + (rng.next_u64() % (104 - i) as u64) as usize;
        shoe.swap(i, j);
    }
    shoe[..17]
        .iter()
        .enumerate()
        .map(|(i, &face)| {
            let id = i as u16;
            if i < wilds {
                Dealt::Wild { id }
            } else {
                Dealt::Card(Card::from_face(id, face))
            }
        })
        .collect()
}

fn gen_deals(n: u64, wilds: usize, seed: u64) -> Vec<Vec<Dealt>> {
    let mut rng = XorShift64::new(seed);
    let mut shoe: [u8; 104] = std::array::from_fn(|i| (i % 52) as u8);
    (0..n).map(|_| gen_deal(&mut rng, &mut shoe, wilds)).collect()
}

fn report_rate(label: &str, n: u64, dt_secs: f64) {
    let n_f = n as f64;
    let us_op = (dt_secs * 1e6) / n_f;
    println!("{label:20}: {:9.1} us/deal  ({:>10} deals)", us_op, n);
    println!("{label:20}: {:>10.3} ms      {:>10.0} /s", dt_secs * 1e3, n_f / dt_secs);
}

fn solver() -> Solver {
    let config = SolverConfig::default();
    let model = match config.load_model() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    match Solver::new(Arc::new(model), config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn bench_gen(n: u64) {
    let start = Instant::now();
    let deals = gen_deals(n, 0, 0x1234_5678_9ABC_DEF0);
    let dt = start.elapsed().as_secs_f64();
    black_box(&deals);
    report_rate("GenerateDeals", n, dt);
}

fn bench_solve_seq(n: u64, wilds: usize) {
    let deals = gen_deals(n, wilds, 0xDEAD_BEEF_F00D_CAFE);
    let s = solver();

    let start = Instant::now();
    let sum = batch::score_sum(&s, &deals);
    let dt = start.elapsed().as_secs_f64();

    black_box(sum);
    println!("mean score          : {:.4}", sum / n as f64);
    report_rate(&format!("Solve{wilds}W"), n, dt);
}

#[cfg(feature = "parallel")]
fn bench_solve_par(n: u64, wilds: usize) {
    let deals = gen_deals(n, wilds, 0xDEAD_BEEF_F00D_CAFE);
    let s = solver();

    let start = Instant::now();
    let sum = batch::score_sum_par(&s, &deals);
    let dt = start.elapsed().as_secs_f64();

    black_box(sum);
    println!("mean score          : {:.4}", sum / n as f64);
    report_rate(&format!("Solve{wilds}WPar"), n, dt);
    println!("threads             : {}", rayon::current_num_threads());
}

fn usage() -> ! {
    eprintln!("usage: perf MODE N [wilds]");
    eprintln!();
    eprintln!("MODE examples:");
    eprintln!("  gen      1000000");
    eprintln!("  solve    2000");
    eprintln!("  solve    200 1");
    eprintln!("  solvepar 20000   (needs --features parallel)");
    std::process::exit(2);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        usage();
    }
    let mode = args[1].as_str();
    let n: u64 = args[2].parse().ok().filter(|&n| n > 0).unwrap_or_else(|| usage());
    let wilds: usize = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(0);
    if wilds > 2 {
        usage();
    }

    match mode {
        "gen" => bench_gen(n),
        "solve" => bench_solve_seq(n, wilds),

        #[cfg(feature = "parallel")]
        "solvepar" => bench_solve_par(n, wilds),

        #[cfg(not(feature = "parallel"))]
        "solvepar" => {
            eprintln!("Parallel mode requires: --features parallel");
            std::process::exit(2);
        }

        _ => usage(),
    }
}
