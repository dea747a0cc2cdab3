//! Cache LRU de artefatos.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use lru::LruCache;

use crate::types::errors::CacheError;

/// Entrada guardada no cache.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,

    /// Número de sequência do último acesso (monotônico).
    recency: u64,

    /// Momento da inserção ou da última sobrescrita.
    cached_at: DateTime<Utc>,
}

/// Estatísticas do cache.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Número atual de entradas.
    pub size: usize,

    /// Capacidade máxima.
    pub capacity: usize,

    /// Número de acertos (cache hits).
    pub hits: u64,

    /// Número de erros (cache misses).
    pub misses: u64,

    /// Entradas removidas por falta de espaço.
    pub evictions: u64,

    /// Inserção mais antiga ainda presente.
    pub oldest_cached_at: Option<DateTime<Utc>>,
}

impl CacheStats {
    /// Calcula a taxa de acerto.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct Inner<K: Hash + Eq, V> {
    entries: LruCache<K, CacheEntry<V>>,
    clock: u64,
}

impl<K: Hash + Eq, V> Inner<K, V> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Cache LRU de capacidade fixa, sincronizado internamente.
///
/// Todas as operações tomam o mesmo mutex durante toda a chamada, então a
/// atualização da ordem de uso e a remoção por capacidade são atômicas
/// entre si. Valores saem do cache apenas como clones; para artefatos
/// grandes use `Arc<T>` como `V`.
pub struct ArtifactCache<K: Hash + Eq, V> {
    inner: Mutex<Inner<K, V>>,
    capacity: NonZeroUsize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<K, V> ArtifactCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Cria um novo cache.
    ///
    /// Falha com [`CacheError::InvalidCapacity`] se `capacity` for zero.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        let cap = NonZeroUsize::new(capacity).ok_or(CacheError::InvalidCapacity(capacity))?;

        Ok(Self {
            inner: Mutex::new(Inner {
                entries: LruCache::new(cap),
                clock: 0,
            }),
            capacity: cap,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        })
    }

    // Nenhuma operação deixa o mapa inconsistente no meio do caminho,
    // então um lock envenenado ainda pode ser usado.
    fn lock(&self) -> MutexGuard<'_, Inner<K, V>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Busca no cache.
    ///
    /// Em caso de acerto a entrada passa a ser a mais recente. Em caso de
    /// erro a ordem de uso não muda.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut inner = self.lock();
        let recency = inner.tick();

        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.recency = recency;
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insere no cache.
    ///
    /// Se a chave já existe, o valor é substituído e a entrada passa a ser a
    /// mais recente. Caso contrário, com o cache cheio, a entrada menos
    /// recente é removida antes da inserção e devolvida.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        let mut inner = self.lock();
        self.insert_locked(&mut inner, key, value)
    }

    fn insert_locked(&self, inner: &mut Inner<K, V>, key: K, value: V) -> Option<(K, V)> {
        let recency = inner.tick();
        let entry = CacheEntry {
            value,
            recency,
            cached_at: Utc::now(),
        };

        if inner.entries.contains(&key) {
            inner.entries.put(key, entry);
            return None;
        }

        let evicted = if inner.entries.len() >= self.capacity.get() {
            inner.entries.pop_lru()
        } else {
            None
        };

        inner.entries.put(key, entry);

        evicted.map(|(k, e)| {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(recency = e.recency, "Evicted least recently used entry");
            (k, e.value)
        })
    }

    /// Verifica se a chave está presente, sem alterar a ordem de uso.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().entries.contains(key)
    }

    /// Busca a chave ou calcula e insere o valor numa única seção crítica.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        match self.get_or_try_insert_with(key, || Ok::<V, std::convert::Infallible>(compute())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Versão falível de [`get_or_insert_with`](Self::get_or_insert_with).
    ///
    /// O cálculo roda com o lock tomado. Se ele falhar nada é inserido e o
    /// erro é devolvido sem alteração.
    pub fn get_or_try_insert_with<F, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let mut inner = self.lock();
        let recency = inner.tick();

        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.recency = recency;
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(entry.value.clone());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        let value = compute()?;
        self.insert_locked(&mut inner, key, value.clone());
        Ok(value)
    }

    /// Remove uma entrada específica.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lock().entries.pop(key).map(|e| e.value)
    }

    /// Limpa todo o cache.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Número atual de entradas.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Verifica se o cache está vazio.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Capacidade fixada na construção.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Chaves da mais recente para a menos recente.
    pub fn keys_by_recency(&self) -> Vec<K> {
        let inner = self.lock();
        let mut keys: Vec<(u64, K)> = inner
            .entries
            .iter()
            .map(|(k, e)| (e.recency, k.clone()))
            .collect();
        keys.sort_by(|a, b| b.0.cmp(&a.0));
        keys.into_iter().map(|(_, k)| k).collect()
    }

    /// Retorna estatísticas do cache.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            size: inner.entries.len(),
            capacity: self.capacity.get(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            oldest_cached_at: inner.entries.iter().map(|(_, e)| e.cached_at).min(),
        }
    }
}
