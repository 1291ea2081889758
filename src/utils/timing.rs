// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIMING UTILITIES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Medição de tempo das passadas de ranking e das consultas de similaridade.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::{Duration, Instant};

/// Timer para medir duração de operações
pub struct ActionTimer {
    start: Instant,
    action_name: String,
}

impl ActionTimer {
    /// Inicia um novo timer para uma ação
    pub fn start(action_name: &str) -> Self {
        Self {
            start: Instant::now(),
            action_name: action_name.to_string(),
        }
    }

    /// Tempo decorrido como Duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Para o timer e loga o tempo decorrido
    pub fn stop_and_log(self) -> Duration {
        let elapsed = self.elapsed();
        log::info!(
            "⏱️  {} completado em {:.3}s",
            self.action_name,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    /// Para o timer e retorna o tempo sem logar
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

/// Macro para medir tempo de execução de um bloco
#[macro_export]
macro_rules! timed {
    ($name:expr, $block:expr) => {{
        let timer = $crate::utils::ActionTimer::start($name);
        let result = $block;
        timer.stop_and_log();
        result
    }};
}

/// Latências agregadas de consultas individuais
#[derive(Debug, Clone, Default)]
pub struct TimingStats {
    samples: Vec<Duration>,
}

impl TimingStats {
    /// Cria estatísticas vazias
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra uma latência
    pub fn record(&mut self, elapsed: Duration) {
        self.samples.push(elapsed);
    }

    /// Número de amostras
    pub fn count(&self) -> usize {
        self.samples.len()
    }

    /// Soma de todas as amostras
    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }

    /// Latência média (zero sem amostras)
    pub fn mean(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.total() / self.samples.len() as u32
    }

    /// Percentil `p` em [0, 100] pelo método nearest-rank
    pub fn percentile(&self, p: f64) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted = self.samples.clone();
        sorted.sort_unstable();
        let rank = ((p.clamp(0.0, 100.0) / 100.0) * sorted.len() as f64).ceil() as usize;
        sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
    }

    /// Maior latência registrada
    pub fn max(&self) -> Duration {
        self.samples.iter().max().copied().unwrap_or(Duration::ZERO)
    }

    /// Resumo de uma linha para logs
    pub fn summary(&self) -> String {
        format!(
            "{} consultas, média {:.3}ms, p50 {:.3}ms, p95 {:.3}ms, máx {:.3}ms",
            self.count(),
            self.mean().as_secs_f64() * 1e3,
            self.percentile(50.0).as_secs_f64() * 1e3,
            self.percentile(95.0).as_secs_f64() * 1e3,
            self.max().as_secs_f64() * 1e3
        )
    }
}
