use std::env;
use std::process;

use contracts::{SchedulerKind, SimParams, Topology};

fn print_usage() {
    println!("sim-cli <command>");
    println!("commands:");
    println!("  run --agents <n> --ticks <n> [options]");
    println!("  sweep --from <min> --to <max> --ticks <n> [options]");
    println!("options:");
    println!("  --seed <i64>        RNG seed (default 42)");
    println!("  --chunk-size <n>    pairs per worker batch (default 256)");
    println!("  --match <k>         random k-matching instead of all pairs");
    println!("  --workers <n>       worker threads for the batched scheduler");
    println!("  --actor             use the actor scheduler (run only)");
}

struct CliOptions {
    params: SimParams,
    scheduler: SchedulerKind,
    agents: Option<u32>,
    sweep_from: Option<u32>,
    sweep_to: Option<u32>,
    ticks: Option<u32>,
}

fn parse_u64(value: Option<&String>, label: &str) -> Result<u64, String> {
    let raw = value.ok_or_else(|| format!("missing value for {label}"))?;
    raw.parse::<u64>()
        .map_err(|_| format!("invalid {label}: {raw}"))
}

fn parse_u32(value: Option<&String>, label: &str) -> Result<u32, String> {
    let parsed = parse_u64(value, label)?;
    u32::try_from(parsed).map_err(|_| format!("{label} out of range: {parsed}"))
}

fn parse_i64(value: Option<&String>, label: &str) -> Result<i64, String> {
    let raw = value.ok_or_else(|| format!("missing value for {label}"))?;
    raw.parse::<i64>()
        .map_err(|_| format!("invalid {label}: {raw}"))
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        params: SimParams::default(),
        scheduler: SchedulerKind::Batched,
        agents: None,
        sweep_from: None,
        sweep_to: None,
        ticks: None,
    };

    let mut index = 0;
    while index < args.len() {
        let flag = args[index].as_str();
        match flag {
            "--agents" => {
                options.agents = Some(parse_u32(args.get(index + 1), "--agents")?);
                index += 2;
            }
            "--ticks" => {
                options.ticks = Some(parse_u32(args.get(index + 1), "--ticks")?);
                index += 2;
            }
            "--seed" => {
                options.params.seed = parse_i64(args.get(index + 1), "--seed")?;
                index += 2;
            }
            "--chunk-size" => {
                options.params.chunk_size = parse_u32(args.get(index + 1), "--chunk-size")?;
                index += 2;
            }
            "--match" => {
                let k = parse_u32(args.get(index + 1), "--match")?;
                options.params.topology = Topology::RandomMatch { k };
                index += 2;
            }
            "--workers" => {
                let workers = parse_u32(args.get(index + 1), "--workers")?;
                options.params.worker_threads =
                    u16::try_from(workers).map_err(|_| format!("--workers out of range: {workers}"))?;
                index += 2;
            }
            "--actor" => {
                options.scheduler = SchedulerKind::Actor;
                index += 1;
            }
            "--from" => {
                options.sweep_from = Some(parse_u32(args.get(index + 1), "--from")?);
                index += 2;
            }
            "--to" => {
                options.sweep_to = Some(parse_u32(args.get(index + 1), "--to")?);
                index += 2;
            }
            other => return Err(format!("unknown flag: {other}")),
        }
    }
    Ok(options)
}

fn run_command(mut options: CliOptions) {
    let Some(agents) = options.agents else {
        usage_error("run requires --agents".to_string());
    };
    let Some(ticks) = options.ticks else {
        usage_error("run requires --ticks".to_string());
    };
    options.params.agents = agents;
    options.params.ticks = ticks;

    match sim_core::run_with_scheduler(&options.params, options.scheduler) {
        Ok(stats) => match serde_json::to_string(&stats) {
            Ok(line) => println!("{line}"),
            Err(err) => {
                eprintln!("error: {err}");
                process::exit(1);
            }
        },
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}

fn sweep_command(mut options: CliOptions) {
    let Some(from) = options.sweep_from else {
        usage_error("sweep requires --from".to_string());
    };
    let Some(to) = options.sweep_to else {
        usage_error("sweep requires --to".to_string());
    };
    let Some(ticks) = options.ticks else {
        usage_error("sweep requires --ticks".to_string());
    };
    options.params.ticks = ticks;

    if let Err(err) = sim_core::sweep(from, to, &options.params) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn usage_error(message: String) -> ! {
    eprintln!("error: {message}");
    print_usage();
    process::exit(2)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str);

    match command {
        Some("run") => match parse_options(&args[2..]) {
            Ok(options) => run_command(options),
            Err(err) => usage_error(err),
        },
        Some("sweep") => match parse_options(&args[2..]) {
            Ok(options) => sweep_command(options),
            Err(err) => usage_error(err),
        },
        _ => print_usage(),
    }
}
