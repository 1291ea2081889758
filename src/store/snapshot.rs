// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SNAPSHOT DE STORE (BUILD-THEN-SWAP)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//
// Consultas pegam um `Arc` da store corrente e varrem esse snapshot até o
// fim, mesmo que outra thread publique uma store nova no meio do scan. O lock
// só protege a troca do ponteiro, nunca o scan.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Handle compartilhado para a store publicada mais recente.
#[derive(Debug)]
pub struct StoreSnapshot<S> {
    current: RwLock<Arc<S>>,
    generation: AtomicU64,
}

impl<S> StoreSnapshot<S> {
    /// Publica a store inicial (geração 0)
    pub fn new(store: S) -> Self {
        Self {
            current: RwLock::new(Arc::new(store)),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot corrente
    pub fn load(&self) -> Arc<S> {
        // Lock envenenado ainda guarda um Arc válido: a troca é uma atribuição
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Publica uma store nova já construída; retorna a anterior.
    pub fn publish(&self, store: S) -> Arc<S> {
        let next = Arc::new(store);
        let previous = match self.current.write() {
            Ok(mut guard) => std::mem::replace(&mut *guard, next),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), next),
        };
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::info!("🔄 Nova store publicada (geração {})", generation);
        previous
    }

    /// Quantas publicações ocorreram desde a criação
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
