// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SENSE SEARCH CLI
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Benchmark de similaridade sobre uma store sintética.
//
// Uso:
//   sense-search-cli
//   sense-search-cli --vocab 500000 --dim 128 --seed 7
//   sense-search-cli --fused --json
//   SENSE_THREADS=4 sense-search-cli --parallel
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use anyhow::{bail, Context};
use sense_search::benchmark::{self, BenchmarkConfig, BenchmarkMode};
use sense_search::synthetic::random_store;
use sense_search::{load_runtime_config, load_search_config, timed};

/// Argumentos de linha de comando
#[derive(Debug)]
struct CliArgs {
    vocab: usize,
    dim: usize,
    seed: u64,
    k: usize,
    mode: BenchmarkMode,
    json: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            vocab: 100_000,
            dim: 128,
            seed: 42,
            k: 50,
            mode: BenchmarkMode::Sequential,
            json: false,
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Sense Search CLI v{}", sense_search::VERSION);
    eprintln!();
    eprintln!("Uso: {} [opções]", program);
    eprintln!();
    eprintln!("Opções:");
    eprintln!("  --vocab <n>   Sentidos na store sintética (padrão: 100000)");
    eprintln!("  --dim <n>     Dimensão dos vetores (padrão: 128)");
    eprintln!("  --seed <n>    Seed do gerador (padrão: 42)");
    eprintln!("  --k <n>       Resultados por consulta (padrão: 50)");
    eprintln!("  --fused       Scan fundido (uma passada por tamanho)");
    eprintln!("  --parallel    Uma task Rayon por consulta");
    eprintln!("  --json        Relatório em JSON");
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<CliArgs>> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--fused" => parsed.mode = BenchmarkMode::Fused,
            "--parallel" => parsed.mode = BenchmarkMode::Parallel,
            "--json" => parsed.json = true,
            flag @ ("--vocab" | "--dim" | "--seed" | "--k") => {
                let value = iter
                    .next()
                    .with_context(|| format!("{} exige um valor", flag))?;
                let number: u64 = value
                    .parse()
                    .with_context(|| format!("valor inválido para {}: {}", flag, value))?;
                match flag {
                    "--vocab" => parsed.vocab = number as usize,
                    "--dim" => parsed.dim = number as usize,
                    "--seed" => parsed.seed = number,
                    _ => parsed.k = number as usize,
                }
            }
            other => bail!("opção desconhecida: {}", other),
        }
    }

    Ok(Some(parsed))
}

fn main() -> anyhow::Result<()> {
    // .env é opcional
    let _ = dotenvy::dotenv();

    // Inicializar logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("sense-search-cli");
    let Some(cli) = parse_args(&args)? else {
        print_usage(program);
        return Ok(());
    };

    let search_config = load_search_config();
    let runtime_config = load_runtime_config();
    let pool = sense_search::build_thread_pool(&runtime_config)?;

    let store = timed!("Construção da store", random_store(cli.vocab, cli.dim, cli.seed))?;

    let bench_config = BenchmarkConfig {
        num_most_similar: cli.k,
        mode: cli.mode,
        ..BenchmarkConfig::default()
    };

    let report = pool.install(|| benchmark::run(&store, &bench_config, search_config))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!(" SENSE SEARCH v{}", sense_search::VERSION);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!();
        print!("{}", report.render_text());
    }

    Ok(())
}
