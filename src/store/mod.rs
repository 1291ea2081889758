// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// STORE DE VETORES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// O núcleo só precisa de quatro operações da store: lookup por chave, scan
// sequencial, dimensão e tamanho. A trait `VectorStore` expõe exatamente isso;
// `SenseStore` é a implementação em memória.
//
// Layout da SenseStore:
// - vetores contíguos em row-major (um único Vec<f32>), scan sequencial
// - normas L2 calculadas uma vez no build
// - índice HashMap para get O(1)
//
// Uma store é imutável depois do build. Atualizações publicam uma store nova
// via `StoreSnapshot` (build-then-swap).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

mod snapshot;

pub use snapshot::StoreSnapshot;

use std::collections::HashMap;

use crate::error::{SenseError, SenseResult};
use crate::performance::simd::{l2_norm, normalize};
use crate::types::{Record, RecordRef, SenseKey};

/// Interface mínima que o ranker e o searcher exigem de uma store.
pub trait VectorStore {
    /// Iterador sequencial sobre todos os registros
    type Iter<'a>: Iterator<Item = RecordRef<'a>>
    where
        Self: 'a;

    /// Lookup por chave, O(1) amortizado. `None` se a chave não existe.
    fn get(&self, key: &str) -> Option<RecordRef<'_>>;

    /// Scan completo, finito e reiniciável (cada chamada começa do início).
    fn iter(&self) -> Self::Iter<'_>;

    /// Dimensão D compartilhada por todos os vetores
    fn dimension(&self) -> usize;

    /// Número de registros V
    fn len(&self) -> usize;

    /// Se a store não tem registros
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lookup que transforma ausência em [`SenseError::NotFound`].
    fn try_get(&self, key: &str) -> SenseResult<RecordRef<'_>> {
        self.get(key)
            .ok_or_else(|| SenseError::NotFound(key.to_string()))
    }

    /// Se a chave existe
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Store em memória, imutável após o build.
#[derive(Debug, Clone)]
pub struct SenseStore {
    dimension: usize,
    keys: Vec<SenseKey>,
    frequencies: Vec<Option<u64>>,
    vectors: Vec<f32>,
    norms: Vec<f32>,
    index: HashMap<SenseKey, usize>,
    normalized: bool,
}

impl SenseStore {
    /// Constrói a store a partir de registros (atalho para [`StoreBuilder`]).
    pub fn from_records<I>(dimension: usize, records: I) -> SenseResult<Self>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut builder = StoreBuilder::new(dimension)?;
        builder.extend(records)?;
        Ok(builder.build())
    }

    /// Registro na posição `idx` da ordem de iteração
    pub fn record_at(&self, idx: usize) -> Option<RecordRef<'_>> {
        if idx >= self.keys.len() {
            return None;
        }
        let start = idx * self.dimension;
        Some(RecordRef {
            key: &self.keys[idx],
            frequency: self.frequencies[idx],
            vector: &self.vectors[start..start + self.dimension],
            norm: self.norms[idx],
        })
    }

    /// Se os vetores foram normalizados no build
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Chaves na ordem de iteração
    pub fn keys(&self) -> &[SenseKey] {
        &self.keys
    }

    /// Quantos registros têm frequência conhecida
    pub fn ranked_count(&self) -> usize {
        self.frequencies.iter().filter(|f| f.is_some()).count()
    }
}

impl VectorStore for SenseStore {
    type Iter<'a> = SenseIter<'a>;

    fn get(&self, key: &str) -> Option<RecordRef<'_>> {
        self.index.get(key).and_then(|&idx| self.record_at(idx))
    }

    fn iter(&self) -> SenseIter<'_> {
        SenseIter {
            store: self,
            position: 0,
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Iterador sequencial sobre uma [`SenseStore`].
#[derive(Debug, Clone)]
pub struct SenseIter<'a> {
    store: &'a SenseStore,
    position: usize,
}

impl<'a> Iterator for SenseIter<'a> {
    type Item = RecordRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.store.record_at(self.position)?;
        self.position += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.store.keys.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SenseIter<'_> {}

impl<'a> IntoIterator for &'a SenseStore {
    type Item = RecordRef<'a>;
    type IntoIter = SenseIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder da [`SenseStore`].
///
/// Valida a dimensão de cada vetor e a unicidade das chaves; as normas são
/// calculadas aqui, uma única vez.
///
/// # Exemplo
///
/// ```rust
/// use sense_search::store::{StoreBuilder, VectorStore};
///
/// let mut builder = StoreBuilder::new(2).unwrap();
/// builder.push("duck|NOUN", Some(10), vec![1.0, 0.0]).unwrap();
/// builder.push("duck|VERB", None, vec![0.0, 1.0]).unwrap();
/// let store = builder.build();
///
/// assert_eq!(store.len(), 2);
/// assert!(store.get("duck|VERB").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct StoreBuilder {
    store: SenseStore,
}

impl StoreBuilder {
    /// Cria builder para vetores de dimensão `dimension` (>= 1).
    pub fn new(dimension: usize) -> SenseResult<Self> {
        if dimension == 0 {
            return Err(SenseError::InvalidDimension);
        }
        Ok(Self {
            store: SenseStore {
                dimension,
                keys: Vec::new(),
                frequencies: Vec::new(),
                vectors: Vec::new(),
                norms: Vec::new(),
                index: HashMap::new(),
                normalized: false,
            },
        })
    }

    /// Reserva espaço para `additional` registros
    pub fn with_capacity(mut self, additional: usize) -> Self {
        let store = &mut self.store;
        store.keys.reserve(additional);
        store.frequencies.reserve(additional);
        store.norms.reserve(additional);
        store.vectors.reserve(additional * store.dimension);
        store.index.reserve(additional);
        self
    }

    /// Normaliza cada vetor no build (norma em cache vira 1, ou 0 se zerado).
    pub fn normalized(mut self, normalized: bool) -> Self {
        self.store.normalized = normalized;
        self
    }

    /// Adiciona um registro.
    pub fn push(
        &mut self,
        key: impl Into<SenseKey>,
        frequency: Option<u64>,
        mut vector: Vec<f32>,
    ) -> SenseResult<()> {
        let key = key.into();
        let store = &mut self.store;

        if vector.len() != store.dimension {
            return Err(SenseError::DimensionMismatch {
                expected: store.dimension,
                actual: vector.len(),
            });
        }
        if store.index.contains_key(&key) {
            return Err(SenseError::DuplicateKey(key.into_string()));
        }

        let norm = if store.normalized {
            if normalize(&mut vector) > 0.0 {
                1.0
            } else {
                0.0
            }
        } else {
            l2_norm(&vector)
        };

        let idx = store.keys.len();
        store.index.insert(key.clone(), idx);
        store.keys.push(key);
        store.frequencies.push(frequency);
        store.vectors.extend_from_slice(&vector);
        store.norms.push(norm);
        Ok(())
    }

    /// Adiciona um [`Record`]
    pub fn add(&mut self, record: Record) -> SenseResult<()> {
        self.push(record.key, record.frequency, record.vector)
    }

    /// Adiciona todos os registros; para no primeiro erro.
    pub fn extend<I>(&mut self, records: I) -> SenseResult<()>
    where
        I: IntoIterator<Item = Record>,
    {
        for record in records {
            self.add(record)?;
        }
        Ok(())
    }

    /// Registros adicionados até agora
    pub fn len(&self) -> usize {
        self.store.keys.len()
    }

    /// Se nenhum registro foi adicionado
    pub fn is_empty(&self) -> bool {
        self.store.keys.is_empty()
    }

    /// Finaliza a store imutável.
    pub fn build(self) -> SenseStore {
        let store = self.store;
        let zero_vectors = store.norms.iter().filter(|n| **n == 0.0).count();

        log::info!(
            "📦 Store construída: {} sentidos, dim {}, {} com frequência{}",
            store.keys.len(),
            store.dimension,
            store.ranked_count(),
            if store.normalized { ", normalizada" } else { "" }
        );
        if zero_vectors > 0 {
            log::warn!("⚠ {} vetores zerados (score -inf no cosseno)", zero_vectors);
        }

        store
    }
}
