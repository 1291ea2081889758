// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK DE SIMILARIDADE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Mede quanto custa responder "mais similares" para os termos mais
// frequentes da store:
//
// 1. ranking por frequência extrai os max(sizes) termos mais frequentes
// 2. para cada tamanho n, consulta os n primeiros termos com k resultados
// 3. reporta n · k cálculos de similaridade e o tempo total
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::fmt::Write as _;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{SenseError, SenseResult};
use crate::ranking::FrequencyRanker;
use crate::search::{BatchQuery, SearchConfig, SimilaritySearcher};
use crate::store::VectorStore;
use crate::utils::{ActionTimer, TimingStats};

/// Como as consultas de cada tamanho são executadas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkMode {
    /// Uma consulta por vez, latência individual medida
    #[default]
    Sequential,
    /// `most_similar_keys`: um único scan alimenta todas as consultas
    Fused,
    /// `most_similar_par`: uma task Rayon por consulta
    Parallel,
}

/// Parâmetros do benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Quantidades de termos consultados
    pub sizes: Vec<usize>,
    /// Resultados por consulta (k)
    pub num_most_similar: usize,
    /// Modo de execução das consultas
    pub mode: BenchmarkMode,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            sizes: vec![50, 100, 500, 1000],
            num_most_similar: 50,
            mode: BenchmarkMode::Sequential,
        }
    }
}

/// Resultado de um tamanho de consulta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeTiming {
    /// Termos consultados (pode ser menor que o pedido em stores pequenas)
    pub terms: usize,
    /// n · k
    pub similarity_calculations: usize,
    /// Tempo total em segundos
    pub elapsed_secs: f64,
    /// Latência média por consulta (ms); zero fora do modo sequencial
    pub mean_query_ms: f64,
    /// p95 por consulta (ms); zero fora do modo sequencial
    pub p95_query_ms: f64,
}

/// Relatório completo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Tamanho da store
    pub vocab_size: usize,
    /// Dimensão dos vetores
    pub dimension: usize,
    /// Resultados por consulta
    pub num_most_similar: usize,
    /// Modo usado
    pub mode: BenchmarkMode,
    /// Tempo do ranking por frequência
    pub rank_elapsed_secs: f64,
    /// Um item por tamanho, na ordem de `sizes`
    pub timings: Vec<SizeTiming>,
}

impl BenchmarkReport {
    /// Relatório legível, um bloco por tamanho
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Store: {} sentidos, dim {} (ranking em {:.3}s)\n",
            self.vocab_size, self.dimension, self.rank_elapsed_secs
        );
        for timing in &self.timings {
            let _ = writeln!(out, "Similarity timing for top {} model terms.", timing.terms);
            let _ = writeln!(
                out,
                "Finding top {} most similar terms for each model term.",
                self.num_most_similar
            );
            let _ = writeln!(out, "{} similarity calculations.", timing.similarity_calculations);
            let _ = writeln!(out, "Completed in {:.6} seconds.", timing.elapsed_secs);
            let _ = writeln!(out, "{}\n", "-".repeat(58));
        }
        out
    }
}

/// Executa o benchmark sobre `store`.
///
/// No modo `Parallel` as tasks rodam no pool Rayon corrente (use
/// `ThreadPool::install` para escolher o pool).
pub fn run<S: VectorStore + Sync>(
    store: &S,
    config: &BenchmarkConfig,
    search: SearchConfig,
) -> SenseResult<BenchmarkReport> {
    let n_max = config
        .sizes
        .iter()
        .copied()
        .max()
        .ok_or_else(|| SenseError::InvalidConfig("benchmark sizes vazio".into()))?;

    let ranker = FrequencyRanker::new()
        .with_strategy(search.strategy)
        .with_tie_break(search.tie_break);
    let rank_timer = ActionTimer::start("Ranking por frequência");
    let top_keys = ranker.top_keys(store, n_max)?;
    let rank_elapsed = rank_timer.stop_and_log();

    let searcher = SimilaritySearcher::with_config(store, search);
    let k = config.num_most_similar;
    let mut timings = Vec::with_capacity(config.sizes.len());

    for &size in &config.sizes {
        let subset: Vec<&str> = top_keys
            .iter()
            .take(size)
            .map(|key| key.as_str())
            .collect();

        let mut stats = TimingStats::new();
        let started = Instant::now();

        match config.mode {
            BenchmarkMode::Sequential => {
                for key in &subset {
                    let query_started = Instant::now();
                    // só o custo importa; o resultado é descartado
                    searcher.most_similar_to_key(key, k)?;
                    stats.record(query_started.elapsed());
                }
            }
            BenchmarkMode::Fused => {
                searcher.most_similar_keys(&subset, k)?;
            }
            BenchmarkMode::Parallel => {
                let queries = subset_queries(store, &subset, search.exclude_self);
                searcher.most_similar_par(&queries, k)?;
            }
        }

        let elapsed = started.elapsed();
        log::info!(
            "📈 top {} termos: {:.3}s ({})",
            subset.len(),
            elapsed.as_secs_f64(),
            stats.summary()
        );

        timings.push(SizeTiming {
            terms: subset.len(),
            similarity_calculations: subset.len() * k,
            elapsed_secs: elapsed.as_secs_f64(),
            mean_query_ms: stats.mean().as_secs_f64() * 1e3,
            p95_query_ms: stats.percentile(95.0).as_secs_f64() * 1e3,
        });
    }

    Ok(BenchmarkReport {
        vocab_size: store.len(),
        dimension: store.dimension(),
        num_most_similar: k,
        mode: config.mode,
        rank_elapsed_secs: rank_elapsed.as_secs_f64(),
        timings,
    })
}

/// Consultas de batch para as chaves do subconjunto (todas existem na store).
fn subset_queries<'a, S: VectorStore>(
    store: &'a S,
    subset: &[&'a str],
    exclude_self: bool,
) -> Vec<BatchQuery<'a>> {
    subset
        .iter()
        .filter_map(|&key| {
            let record = store.get(key)?;
            let query = BatchQuery::new(record.vector);
            Some(if exclude_self { query.excluding(key) } else { query })
        })
        .collect()
}
