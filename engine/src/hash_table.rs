//! String-keyed hash table with separate chaining.
//!
//! Buckets are a power-of-two vector of owned entry lists indexed by the low
//! bits of an FNV-1a hash. Entries are never removed one by one; the only way
//! to drop them is [`HashTable::clear`].

const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

const MAX_LOAD_FACTOR: f32 = 0.75;
const LAZY_CAPACITY: usize = 1024;

pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME))
}

#[derive(Debug, Clone)]
struct Entry<V> {
    key: String,
    value: V,
}

#[derive(Debug, Clone)]
pub struct HashTable<V> {
    buckets: Vec<Vec<Entry<V>>>,
    len: usize,
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self { buckets: Vec::new(), len: 0 }
    }
}

impl<V> HashTable<V> {
    /// An empty table allocates its buckets on first insert.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the bucket array, rounded up to a power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = capacity.max(1).next_power_of_two();
        let mut buckets = Vec::with_capacity(cap);
        buckets.resize_with(cap, Vec::new);
        Self { buckets, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f32 {
        if self.buckets.is_empty() {
            return 0.0;
        }
        self.len as f32 / self.buckets.len() as f32
    }

    /// Drop every entry but keep the bucket array.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    pub fn find(&self, key: &str) -> Option<&V> {
        if self.buckets.is_empty() {
            return None;
        }
        self.buckets[self.bucket_index(key)]
            .iter()
            .find(|e| e.key == key)
            .map(|e| &e.value)
    }

    pub fn find_mut(&mut self, key: &str) -> Option<&mut V> {
        if self.buckets.is_empty() {
            return None;
        }
        let idx = self.bucket_index(key);
        self.buckets[idx]
            .iter_mut()
            .find(|e| e.key == key)
            .map(|e| &mut e.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Insert or overwrite.
    pub fn put(&mut self, key: &str, value: V) {
        let idx = self.slot_for_insert(key);
        let bucket = &mut self.buckets[idx];
        match bucket.iter_mut().find(|e| e.key == key) {
            Some(entry) => entry.value = value,
            None => {
                bucket.push(Entry { key: key.to_string(), value });
                self.len += 1;
            }
        }
    }

    /// Every `(key, value)` pair in bucket order. Callers must not rely on
    /// the order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|e| (e.key.as_str(), &e.value)))
    }

    fn bucket_index(&self, key: &str) -> usize {
        Self::index_for(key, self.buckets.len())
    }

    fn index_for(key: &str, cap: usize) -> usize {
        (fnv1a(key.as_bytes()) as usize) & (cap - 1)
    }

    /// Grow if needed, then return the bucket `key` belongs to.
    fn slot_for_insert(&mut self, key: &str) -> usize {
        if self.buckets.is_empty() {
            self.buckets.resize_with(LAZY_CAPACITY, Vec::new);
        } else if self.load_factor() > MAX_LOAD_FACTOR {
            self.rehash(self.buckets.len() * 2);
        }
        self.bucket_index(key)
    }

    fn rehash(&mut self, new_cap: usize) {
        let cap = new_cap.next_power_of_two();
        let mut buckets: Vec<Vec<Entry<V>>> = Vec::with_capacity(cap);
        buckets.resize_with(cap, Vec::new);
        for entry in std::mem::take(&mut self.buckets).into_iter().flatten() {
            buckets[Self::index_for(&entry.key, cap)].push(entry);
        }
        self.buckets = buckets;
    }
}

impl<V: Default> HashTable<V> {
    /// Return the value for `key`, inserting `V::default()` first if absent.
    pub fn get_or_create(&mut self, key: &str) -> &mut V {
        let idx = self.slot_for_insert(key);
        let bucket = &mut self.buckets[idx];
        let pos = match bucket.iter().position(|e| e.key == key) {
            Some(pos) => pos,
            None => {
                bucket.push(Entry { key: key.to_string(), value: V::default() });
                self.len += 1;
                bucket.len() - 1
            }
        };
        &mut bucket[pos].value
    }
}
