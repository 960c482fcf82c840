// scripts/benchmark.rs
use anyhow::Context;
use barrier_mc::analytics::bs_analytic;
use barrier_mc::contract::{BarrierKind, ContractSpec, OptionKind};
use barrier_mc::math_utils::Timer;
use barrier_mc::mc::mc_engine::{mc_price_barrier_option, McConfig};
use std::env;
use std::fs::File;
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            cpu_cores: num_cpus::get(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn get_cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(not(target_os = "linux"))]
        {
            "Unknown CPU".to_string()
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    steps: usize,
    time_ms: f64,
    throughput_paths_per_sec: f64,
    value: f64,
    std_error: f64,
    continuous_value: f64,
}

fn benchmark_contracts() -> anyhow::Result<Vec<ContractSpec>> {
    let up_and_out_call = ContractSpec::new(
        OptionKind::Call,
        BarrierKind::UpAndOut,
        100.0,
        100.0,
        120.0,
        1.0,
        0.2,
        0.05,
    )?;
    let down_and_in_put = ContractSpec::new(
        OptionKind::Put,
        BarrierKind::DownAndIn,
        100.0,
        100.0,
        90.0,
        1.0,
        0.2,
        0.05,
    )?;
    Ok(vec![up_and_out_call, down_and_in_put])
}

fn run_barrier_benchmarks() -> anyhow::Result<Vec<BenchmarkResult>> {
    let mut results = Vec::new();

    for contract in benchmark_contracts()? {
        for &(paths, steps) in &[(10_000, 50), (100_000, 50), (100_000, 252), (1_000_000, 50)] {
            println!(
                "Running {} with {} paths x {} steps...",
                contract.title(),
                paths,
                steps
            );

            let cfg = McConfig {
                paths,
                steps,
                seed: Some(42),
                ..Default::default()
            };

            let mut timer = Timer::new();
            timer.start();
            let result = mc_price_barrier_option(&contract, &cfg)?;
            let time_ms = timer.elapsed_ms();

            results.push(BenchmarkResult {
                name: contract.title(),
                paths,
                steps,
                time_ms,
                throughput_paths_per_sec: paths as f64 / (time_ms / 1000.0),
                value: result.price(),
                std_error: result.std_error(),
                continuous_value: bs_analytic::barrier_price_continuous(&contract),
            });
        }
    }

    Ok(results)
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> std::io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(
        file,
        "Benchmark,Paths,Steps,Time_ms,Throughput_paths_per_sec,Value,Std_Error,Continuous_Value"
    )?;
    for result in results {
        writeln!(
            file,
            "\"{}\",{},{},{:.2},{:.0},{:.6},{:.6},{:.6}",
            result.name,
            result.paths,
            result.steps,
            result.time_ms,
            result.throughput_paths_per_sec,
            result.value,
            result.std_error,
            result.continuous_value
        )?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    println!("barrier-mc Benchmark Suite");
    println!("==========================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let results = run_barrier_benchmarks()?;

    println!("\n{:=<100}", "");
    println!(
        "{:<40} {:>9} {:>6} {:>10} {:>12} {:>9} {:>9} {:>11}",
        "Benchmark", "Paths", "Steps", "Time (ms)", "Throughput", "Value", "Std Err", "Continuous"
    );
    println!("{:-<100}", "");
    for result in &results {
        println!(
            "{:<40} {:>9} {:>6} {:>10.2} {:>12.0} {:>9.4} {:>9.4} {:>11.4}",
            result.name,
            result.paths,
            result.steps,
            result.time_ms,
            result.throughput_paths_per_sec,
            result.value,
            result.std_error,
            result.continuous_value
        );
    }
    println!("{:=<100}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    write_results_to_csv(&results, &system_info, &filename)
        .with_context(|| format!("failed to write {}", filename))?;

    println!("\nResults saved to: {}", filename);
    println!("Run with: cargo run --bin benchmark --release");
    Ok(())
}
