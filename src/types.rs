// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// TIPOS FUNDAMENTAIS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Chaves de sentido, registros e candidatos pontuados compartilhados pela
// store, pelo seletor top-K, pelo ranker e pelo searcher.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Separador entre palavra e tag de sentido (`duck|NOUN`).
pub const SENSE_SEPARATOR: char = '|';

/// Identificador opaco de um sentido (palavra + tag).
///
/// Por convenção o formato é `palavra|TAG`, mas a chave é comparada como
/// string pura. `word()` e `sense()` dividem no ÚLTIMO separador.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenseKey(String);

impl SenseKey {
    /// Cria chave a partir de palavra e tag (`"duck"`, `"NOUN"` → `duck|NOUN`)
    pub fn new(word: &str, sense: &str) -> Self {
        Self(format!("{}{}{}", word, SENSE_SEPARATOR, sense))
    }

    /// Texto completo da chave
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parte da palavra (tudo antes do último `|`)
    pub fn word(&self) -> &str {
        match self.0.rfind(SENSE_SEPARATOR) {
            Some(idx) => &self.0[..idx],
            None => &self.0,
        }
    }

    /// Tag de sentido, se houver
    pub fn sense(&self) -> Option<&str> {
        self.0.rfind(SENSE_SEPARATOR).map(|idx| &self.0[idx + 1..])
    }

    /// Consome a chave e devolve a `String` interna
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SenseKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SenseKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for SenseKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SenseKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Registro de entrada para construção da store.
///
/// `frequency = None` significa "frequência desconhecida": o registro
/// continua pesquisável por similaridade mas fica fora do ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Chave única
    pub key: SenseKey,
    /// Frequência no corpus (opcional)
    pub frequency: Option<u64>,
    /// Vetor de dimensão fixa
    pub vector: Vec<f32>,
}

impl Record {
    /// Cria novo registro
    pub fn new(key: impl Into<SenseKey>, frequency: Option<u64>, vector: Vec<f32>) -> Self {
        Self {
            key: key.into(),
            frequency,
            vector,
        }
    }
}

/// Visão emprestada de um registro armazenado.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordRef<'a> {
    /// Chave única
    pub key: &'a SenseKey,
    /// Frequência (None = fora do ranking)
    pub frequency: Option<u64>,
    /// Vetor armazenado
    pub vector: &'a [f32],
    /// Norma L2 calculada na construção da store
    pub norm: f32,
}

impl RecordRef<'_> {
    /// Converte para registro owned
    pub fn to_record(&self) -> Record {
        Record {
            key: self.key.clone(),
            frequency: self.frequency,
            vector: self.vector.to_vec(),
        }
    }
}

/// Candidato pontuado produzido durante uma passada de seleção.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem<T, S = f32> {
    /// Item retido
    pub item: T,
    /// Score usado na seleção
    pub score: S,
}

impl<T, S> ScoredItem<T, S> {
    /// Cria novo candidato
    pub fn new(item: T, score: S) -> Self {
        Self { item, score }
    }

    /// Converte para tupla `(item, score)`
    pub fn into_pair(self) -> (T, S) {
        (self.item, self.score)
    }
}

/// Resultado de busca por similaridade: (chave, score).
pub type ScoredSense = ScoredItem<SenseKey, f32>;

/// Resultado do ranking por frequência: (chave, frequência).
pub type RankedSense = ScoredItem<SenseKey, u64>;
