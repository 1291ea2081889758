// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BUSCA POR SIMILARIDADE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// "Quais são os K sentidos mais parecidos com este vetor?"
//
// Scan completo da store: cada registro passa pela métrica e pelo seletor
// top-K. Custo O(V · D) por consulta, memória auxiliar O(K).
//
// Três formas de processar várias consultas:
// - uma a uma (`most_similar`), o baseline
// - fundidas (`most_similar_batch`): UM scan da store alimenta todos os
//   seletores, cada registro é lido da memória uma vez só
// - paralelas (`most_similar_par`): uma task Rayon por consulta sobre a store
//   compartilhada e imutável; nenhum lock, cada task tem seu seletor
//
// As três retornam exatamente o mesmo resultado.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::time::Instant;

use rayon::prelude::*;

use crate::error::{SenseError, SenseResult};
use crate::metric::{Metric, PreparedQuery};
use crate::selection::{SelectionStrategy, TieBreak, TopKSelector};
use crate::store::VectorStore;
use crate::types::{ScoredSense, SenseKey};

/// A cada quantos registros o scan com deadline consulta o relógio.
pub const DEADLINE_CHECK_INTERVAL: usize = 4096;

/// Configuração do searcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Métrica de similaridade
    pub metric: Metric,
    /// Exclui a própria chave nas consultas por chave
    pub exclude_self: bool,
    /// Estratégia do seletor top-K
    pub strategy: SelectionStrategy,
    /// Política de desempate
    pub tie_break: TieBreak,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::Cosine,
            exclude_self: true,
            strategy: SelectionStrategy::Auto,
            tie_break: TieBreak::FirstSeen,
        }
    }
}

/// Consulta por chave da store ou por vetor arbitrário.
#[derive(Debug, Clone, Copy)]
pub enum Query<'a> {
    /// Usa o vetor da chave (e a exclui, se `exclude_self`)
    Key(&'a str),
    /// Vetor externo de dimensão D
    Vector(&'a [f32]),
}

/// Uma consulta de um batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchQuery<'a> {
    /// Vetor de consulta
    pub vector: &'a [f32],
    /// Chave a ignorar no scan
    pub exclude_key: Option<&'a str>,
}

impl<'a> BatchQuery<'a> {
    /// Consulta sem exclusão
    pub fn new(vector: &'a [f32]) -> Self {
        Self {
            vector,
            exclude_key: None,
        }
    }

    /// Ignora `key` no scan
    pub fn excluding(mut self, key: &'a str) -> Self {
        self.exclude_key = Some(key);
        self
    }
}

/// Searcher sobre uma store imutável.
///
/// # Exemplo
///
/// ```rust
/// use sense_search::search::SimilaritySearcher;
/// use sense_search::store::SenseStore;
/// use sense_search::types::Record;
///
/// let store = SenseStore::from_records(2, vec![
///     Record::new("A", Some(10), vec![1.0, 0.0]),
///     Record::new("B", Some(5), vec![0.0, 1.0]),
/// ]).unwrap();
///
/// let searcher = SimilaritySearcher::new(&store);
/// let top = searcher.most_similar(&[1.0, 0.0], 1, None).unwrap();
/// assert_eq!(top[0].item.as_str(), "A");
/// ```
#[derive(Debug)]
pub struct SimilaritySearcher<'s, S> {
    store: &'s S,
    config: SearchConfig,
}

impl<'s, S: VectorStore> SimilaritySearcher<'s, S> {
    /// Searcher com configuração padrão (cosseno, exclui a própria chave)
    pub fn new(store: &'s S) -> Self {
        Self::with_config(store, SearchConfig::default())
    }

    /// Searcher com configuração explícita
    pub fn with_config(store: &'s S, config: SearchConfig) -> Self {
        Self { store, config }
    }

    /// Store consultada
    pub fn store(&self) -> &'s S {
        self.store
    }

    /// Configuração em uso
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Os `k` sentidos mais similares a `query`, em ordem decrescente.
    ///
    /// Falha com `DimensionMismatch` antes de qualquer scan se
    /// `query.len() != D`, e com `InvalidCapacity` se `k == 0`.
    pub fn most_similar(
        &self,
        query: &[f32],
        k: usize,
        exclude_key: Option<&str>,
    ) -> SenseResult<Vec<ScoredSense>> {
        self.scan(query, k, exclude_key, None)
    }

    /// Como [`most_similar`](Self::most_similar), mas aborta com
    /// `DeadlineExceeded` se o scan passar de `deadline`. Sem resultados
    /// parciais.
    pub fn most_similar_with_deadline(
        &self,
        query: &[f32],
        k: usize,
        exclude_key: Option<&str>,
        deadline: Instant,
    ) -> SenseResult<Vec<ScoredSense>> {
        self.scan(query, k, exclude_key, Some(deadline))
    }

    /// Similares ao vetor de uma chave da store.
    ///
    /// `Ok(None)` se a chave não existe: ausência não é erro.
    pub fn most_similar_to_key(&self, key: &str, k: usize) -> SenseResult<Option<Vec<ScoredSense>>> {
        let Some(record) = self.store.get(key) else {
            return Ok(None);
        };
        let exclude = self.config.exclude_self.then_some(key);
        self.most_similar(record.vector, k, exclude).map(Some)
    }

    /// Consulta por chave ou vetor.
    pub fn query(&self, query: Query<'_>, k: usize) -> SenseResult<Option<Vec<ScoredSense>>> {
        match query {
            Query::Key(key) => self.most_similar_to_key(key, k),
            Query::Vector(vector) => self.most_similar(vector, k, None).map(Some),
        }
    }

    /// Várias consultas com UM scan compartilhado da store.
    ///
    /// Todas as dimensões são validadas antes do scan; uma consulta inválida
    /// falha o batch inteiro sem resultados parciais.
    pub fn most_similar_batch(
        &self,
        queries: &[BatchQuery<'_>],
        k: usize,
    ) -> SenseResult<Vec<Vec<ScoredSense>>> {
        for query in queries {
            self.check_dimension(query.vector)?;
        }

        let prepared: Vec<PreparedQuery<'_>> = queries
            .iter()
            .map(|q| PreparedQuery::new(q.vector))
            .collect();
        let mut selectors = queries
            .iter()
            .map(|_| self.selector(k))
            .collect::<SenseResult<Vec<_>>>()?;

        for record in self.store.iter() {
            for ((query, prepared), selector) in
                queries.iter().zip(&prepared).zip(selectors.iter_mut())
            {
                if query.exclude_key == Some(record.key.as_str()) {
                    continue;
                }
                let score = self.config.metric.score(prepared, &record);
                offer_candidate(selector, record.key, score);
            }
        }

        log::debug!(
            "🔎 batch fundido: {} consultas, k={}, {} registros",
            queries.len(),
            k,
            self.store.len()
        );

        Ok(selectors.iter_mut().map(|s| s.extract_sorted()).collect())
    }

    /// Batch por chaves. Chaves ausentes viram `None` sem abortar o batch.
    pub fn most_similar_keys(
        &self,
        keys: &[&str],
        k: usize,
    ) -> SenseResult<Vec<Option<Vec<ScoredSense>>>> {
        let mut found = Vec::with_capacity(keys.len());
        let mut slots = Vec::with_capacity(keys.len());

        for key in keys {
            match self.store.get(key) {
                Some(record) => {
                    let mut query = BatchQuery::new(record.vector);
                    if self.config.exclude_self {
                        query = query.excluding(key);
                    }
                    slots.push(Some(found.len()));
                    found.push(query);
                }
                None => {
                    log::warn!("⚠ Chave ausente ignorada no batch: {}", key);
                    slots.push(None);
                }
            }
        }

        let mut results: Vec<Option<Vec<ScoredSense>>> = self
            .most_similar_batch(&found, k)?
            .into_iter()
            .map(Some)
            .collect();

        Ok(slots
            .into_iter()
            .map(|slot| slot.and_then(|idx| results[idx].take()))
            .collect())
    }

    fn scan(
        &self,
        query: &[f32],
        k: usize,
        exclude_key: Option<&str>,
        deadline: Option<Instant>,
    ) -> SenseResult<Vec<ScoredSense>> {
        self.check_dimension(query)?;
        let mut selector = self.selector(k)?;
        let prepared = PreparedQuery::new(query);

        for (scanned, record) in self.store.iter().enumerate() {
            if let Some(deadline) = deadline {
                if scanned % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                    log::warn!("⏱️  Deadline estourado após {} registros", scanned);
                    return Err(SenseError::DeadlineExceeded { scanned });
                }
            }
            if exclude_key == Some(record.key.as_str()) {
                continue;
            }
            let score = self.config.metric.score(&prepared, &record);
            offer_candidate(&mut selector, record.key, score);
        }

        Ok(selector.extract_sorted())
    }

    fn check_dimension(&self, query: &[f32]) -> SenseResult<()> {
        let expected = self.store.dimension();
        if query.len() != expected {
            return Err(SenseError::DimensionMismatch {
                expected,
                actual: query.len(),
            });
        }
        Ok(())
    }

    fn selector(&self, k: usize) -> SenseResult<TopKSelector<SenseKey, f32>> {
        TopKSelector::with_tie_break(k, self.config.strategy, self.config.tie_break)
    }
}

impl<'s, S: VectorStore + Sync> SimilaritySearcher<'s, S> {
    /// Consultas independentes em paralelo (Rayon) sobre a store
    /// compartilhada. Resultado idêntico a chamar `most_similar` para cada
    /// consulta em sequência.
    pub fn most_similar_par(
        &self,
        queries: &[BatchQuery<'_>],
        k: usize,
    ) -> SenseResult<Vec<Vec<ScoredSense>>> {
        queries
            .par_iter()
            .map(|query| self.most_similar(query.vector, k, query.exclude_key))
            .collect()
    }
}

/// Oferece um candidato clonando a chave só se ele pode entrar.
#[inline]
fn offer_candidate(selector: &mut TopKSelector<SenseKey, f32>, key: &SenseKey, score: f32) {
    if let Some(min) = selector.min_score() {
        if score < min {
            return;
        }
    }
    selector.offer(key.clone(), score);
}

/// Atalho para [`SimilaritySearcher::most_similar`] com a configuração padrão.
pub fn most_similar<S: VectorStore>(
    store: &S,
    query: &[f32],
    k: usize,
    exclude_key: Option<&str>,
) -> SenseResult<Vec<ScoredSense>> {
    SimilaritySearcher::new(store).most_similar(query, k, exclude_key)
}
