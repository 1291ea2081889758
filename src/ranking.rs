// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// RANKING POR FREQUÊNCIA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Uma passada sobre a store inteira, memória auxiliar O(n). Registros sem
// frequência são filtrados AQUI, antes do seletor, que não sabe nada sobre
// frequências nulas.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::error::SenseResult;
use crate::selection::{SelectionStrategy, TieBreak, TopKSelector};
use crate::store::VectorStore;
use crate::types::{RankedSense, SenseKey};

/// Extrai os N sentidos mais frequentes de uma store.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyRanker {
    /// Estratégia do seletor
    pub strategy: SelectionStrategy,
    /// Política de desempate
    pub tie_break: TieBreak,
}

impl FrequencyRanker {
    /// Ranker com estratégia `Auto` e desempate por ordem de chegada
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a estratégia do seletor
    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Define a política de desempate
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Os `n` registros de maior frequência, em ordem decrescente.
    ///
    /// Retorna menos de `n` itens se a store tiver menos registros com
    /// frequência conhecida. `n == 0` é `InvalidCapacity`.
    pub fn rank_top_n<S: VectorStore>(&self, store: &S, n: usize) -> SenseResult<Vec<RankedSense>> {
        let mut selector: TopKSelector<SenseKey, u64> =
            TopKSelector::with_tie_break(n, self.strategy, self.tie_break)?;

        let mut skipped = 0usize;
        for record in store.iter() {
            match record.frequency {
                Some(frequency) => {
                    // Descarta antes de clonar a chave quando não supera o mínimo
                    if selector.min_score().map_or(true, |min| frequency >= min) {
                        selector.offer(record.key.clone(), frequency);
                    }
                }
                None => skipped += 1,
            }
        }

        let ranked = selector.extract_sorted();
        log::debug!(
            "📊 rank_top_n({}): {} retidos de {} registros ({} sem frequência)",
            n,
            ranked.len(),
            store.len(),
            skipped
        );
        Ok(ranked)
    }

    /// Apenas as chaves dos `n` mais frequentes (subconjunto de consulta).
    pub fn top_keys<S: VectorStore>(&self, store: &S, n: usize) -> SenseResult<Vec<SenseKey>> {
        Ok(self
            .rank_top_n(store, n)?
            .into_iter()
            .map(|ranked| ranked.item)
            .collect())
    }
}

/// Atalho para [`FrequencyRanker::rank_top_n`] com a configuração padrão.
pub fn rank_top_n<S: VectorStore>(store: &S, n: usize) -> SenseResult<Vec<RankedSense>> {
    FrequencyRanker::new().rank_top_n(store, n)
}
