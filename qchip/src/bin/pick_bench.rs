use qchip::algorithms::picking::{PickFilter, PickTolerance};
use qchip::{Chip, ChipConfig};
use std::time::Instant;

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() { return 0.0; }
    let idx = ((sorted.len() as f64 - 1.0) * p).round() as usize;
    sorted[idx.min(sorted.len()-1)]
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut width = 64u32;
    let mut height = 64u32;
    let mut picks = 10000usize;
    let mut assert_ms: Option<f64> = None;
    for a in &args[1..] {
        if let Some(val)=a.strip_prefix("--width=") { if let Ok(v)=val.parse() { width=v; } }
        else if let Some(val)=a.strip_prefix("--height=") { if let Ok(v)=val.parse() { height=v; } }
        else if let Some(val)=a.strip_prefix("--picks=") { if let Ok(v)=val.parse() { picks=v; } }
        else if let Some(val)=a.strip_prefix("--assert-ms=") { if let Ok(v)=val.parse() { assert_ms=Some(v); } }
    }

    let chip = Chip::generate(&ChipConfig::new(width, height, true, 0, 4));
    let tol = PickTolerance::default();

    // Sweep points across the lattice so roughly half land on a qubit or coupler
    let mut times_ms: Vec<f64> = Vec::with_capacity(picks);
    let start_all = Instant::now();
    let mut hits = 0usize;
    for k in 0..picks {
        let x = (k % (2 * width as usize)) as f32 * 0.5 + 0.05;
        let y = ((k / (2 * width as usize)) % height as usize) as f32 + 0.05;
        let t0 = Instant::now();
        if chip.pick(x, y, PickFilter::ALL, tol).is_some() { hits += 1; }
        times_ms.push(t0.elapsed().as_secs_f64() * 1000.0);
    }
    let dur_all = start_all.elapsed().as_secs_f64() * 1000.0;
    times_ms.sort_by(|a,b| a.total_cmp(b));
    let med = percentile(&times_ms, 0.5);
    let p90 = percentile(&times_ms, 0.9);
    let p99 = percentile(&times_ms, 0.99);
    println!("qubits={} couplers={} picks={} hits={} total_ms={:.3} median_ms={:.4} p90_ms={:.4} p99_ms={:.4}", chip.num_qubits(), chip.num_couplers(), picks, hits, dur_all, med, p90, p99);
    if let Some(th) = assert_ms { if med > th { eprintln!("FAIL: median {:.4} ms > threshold {:.3} ms", med, th); std::process::exit(1); } }
}
