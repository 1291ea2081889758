// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CONFIGURAÇÃO DA BUSCA E DO POOL RAYON
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Configurações do searcher e do pool de threads para consultas paralelas.
// Todas as configurações podem ser definidas via .env
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::error::{SenseError, SenseResult};
use crate::metric::Metric;
use crate::search::SearchConfig;
use crate::selection::{SelectionStrategy, TieBreak};

/// Configuração do pool Rayon usado por `most_similar_par`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Número de worker threads.
    /// Se None, usa cálculo dinâmico: min(cpu_cores, max_threads).
    pub worker_threads: Option<usize>,

    /// Número máximo de threads (limite superior para cálculo dinâmico).
    /// Padrão: 16
    pub max_threads: usize,

    /// Prefixo do nome das threads.
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: None, // Dinâmico
            max_threads: 16,
            thread_name: "sense-search".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Cria configuração padrão.
    pub fn new() -> Self {
        Self::default()
    }

    /// Calcula número efetivo de worker threads.
    ///
    /// Se `worker_threads` está definido, usa esse valor.
    /// Senão, calcula: min(cpu_cores, max_threads)
    pub fn effective_worker_threads(&self) -> usize {
        if let Some(threads) = self.worker_threads {
            threads
        } else {
            let cpu_cores = num_cpus::get();
            std::cmp::min(cpu_cores, self.max_threads)
        }
    }
}

/// Interpreta booleanos de variáveis de ambiente.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().trim() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Carrega a configuração da busca a partir de uma função de lookup.
///
/// Variáveis suportadas:
/// - `SENSE_METRIC`: "cosine" (padrão) ou "dot"
/// - `SENSE_TOPK_STRATEGY`: "linear", "heap" ou "auto" (padrão)
/// - `SENSE_TIE_BREAK`: "first_seen" (padrão) ou "key"
/// - `SENSE_EXCLUDE_SELF`: bool (padrão: true)
pub fn load_search_config_from<F>(lookup: F) -> SearchConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = SearchConfig::default();

    if let Some(metric) = lookup("SENSE_METRIC") {
        config.metric = Metric::from_env(&metric);
        log::info!("📦 SENSE_METRIC={}", config.metric);
    }

    if let Some(strategy) = lookup("SENSE_TOPK_STRATEGY") {
        config.strategy = SelectionStrategy::from_env(&strategy);
        log::info!("📦 SENSE_TOPK_STRATEGY={}", config.strategy);
    }

    if let Some(tie_break) = lookup("SENSE_TIE_BREAK") {
        config.tie_break = TieBreak::from_env(&tie_break);
        log::info!("📦 SENSE_TIE_BREAK={}", config.tie_break);
    }

    if let Some(exclude) = lookup("SENSE_EXCLUDE_SELF") {
        match parse_bool(&exclude) {
            Some(value) => {
                config.exclude_self = value;
                log::info!("📦 SENSE_EXCLUDE_SELF={}", value);
            }
            None => log::warn!("⚠ SENSE_EXCLUDE_SELF inválido: {:?} (mantendo padrão)", exclude),
        }
    }

    config
}

/// Carrega a configuração da busca das variáveis de ambiente.
pub fn load_search_config() -> SearchConfig {
    load_search_config_from(|name| std::env::var(name).ok())
}

/// Carrega configuração do pool a partir de uma função de lookup.
///
/// Variáveis suportadas:
/// - `SENSE_THREADS`: Número fixo de threads (opcional)
/// - `SENSE_MAX_THREADS`: Máximo de threads para cálculo dinâmico (padrão: 16)
pub fn load_runtime_config_from<F>(lookup: F) -> RuntimeConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = RuntimeConfig::default();

    // SENSE_THREADS: número fixo de threads
    if let Some(threads_str) = lookup("SENSE_THREADS") {
        if let Ok(threads) = threads_str.trim().parse::<usize>() {
            if threads > 0 {
                config.worker_threads = Some(threads);
                log::info!("📦 SENSE_THREADS={} (fixo)", threads);
            }
        }
    }

    // SENSE_MAX_THREADS: limite superior para cálculo dinâmico
    if let Some(max_str) = lookup("SENSE_MAX_THREADS") {
        if let Ok(max) = max_str.trim().parse::<usize>() {
            if max > 0 {
                config.max_threads = max;
                log::info!("📦 SENSE_MAX_THREADS={}", max);
            }
        }
    }

    if config.worker_threads.is_none() {
        log::info!(
            "🔧 Rayon: {} threads (dinâmico: min({} cores, {} max))",
            config.effective_worker_threads(),
            num_cpus::get(),
            config.max_threads
        );
    }

    config
}

/// Carrega configuração do pool das variáveis de ambiente.
pub fn load_runtime_config() -> RuntimeConfig {
    load_runtime_config_from(|name| std::env::var(name).ok())
}

/// Cria o pool Rayon dedicado às consultas paralelas.
///
/// # Exemplo
///
/// ```rust,ignore
/// let pool = build_thread_pool(&load_runtime_config())?;
/// let results = pool.install(|| searcher.most_similar_par(&queries, 50))?;
/// ```
pub fn build_thread_pool(config: &RuntimeConfig) -> SenseResult<rayon::ThreadPool> {
    let worker_threads = config.effective_worker_threads();
    let prefix = config.thread_name.clone();

    log::info!("🚀 Criando pool Rayon: {} workers", worker_threads);

    rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .thread_name(move |idx| format!("{}-{}", prefix, idx))
        .build()
        .map_err(|e| SenseError::InvalidConfig(format!("thread pool: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_search_config_defaults() {
        let config = load_search_config_from(|_| None);
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.metric, Metric::Cosine);
        assert!(config.exclude_self);
    }

    #[test]
    fn test_search_config_overrides() {
        let config = load_search_config_from(lookup_from(&[
            ("SENSE_METRIC", "dot"),
            ("SENSE_TOPK_STRATEGY", "heap"),
            ("SENSE_TIE_BREAK", "key"),
            ("SENSE_EXCLUDE_SELF", "false"),
        ]));
        assert_eq!(config.metric, Metric::DotProduct);
        assert_eq!(config.strategy, SelectionStrategy::Heap);
        assert_eq!(config.tie_break, TieBreak::ByKey);
        assert!(!config.exclude_self);
    }

    #[test]
    fn test_invalid_bool_keeps_default() {
        let config = load_search_config_from(lookup_from(&[("SENSE_EXCLUDE_SELF", "maybe")]));
        assert!(config.exclude_self);
    }

    #[test]
    fn test_runtime_config_default() {
        let config = RuntimeConfig::default();
        assert!(config.worker_threads.is_none());
        assert_eq!(config.max_threads, 16);
    }

    #[test]
    fn test_runtime_config_overrides() {
        let config = load_runtime_config_from(lookup_from(&[
            ("SENSE_THREADS", "3"),
            ("SENSE_MAX_THREADS", "8"),
        ]));
        assert_eq!(config.worker_threads, Some(3));
        assert_eq!(config.max_threads, 8);
        assert_eq!(config.effective_worker_threads(), 3);
    }

    #[test]
    fn test_runtime_config_ignores_zero_and_garbage() {
        let config = load_runtime_config_from(lookup_from(&[
            ("SENSE_THREADS", "0"),
            ("SENSE_MAX_THREADS", "lots"),
        ]));
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_effective_worker_threads_dynamic() {
        let config = RuntimeConfig::default();
        let cpu_cores = num_cpus::get();
        assert_eq!(config.effective_worker_threads(), std::cmp::min(cpu_cores, 16));
    }

    #[test]
    fn test_build_thread_pool() {
        let config = RuntimeConfig {
            worker_threads: Some(2),
            ..RuntimeConfig::default()
        };
        let pool = build_thread_pool(&config).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }
}
