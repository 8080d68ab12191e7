use std::collections::{HashSet, VecDeque};

/// 近期转发缓存的默认容量
pub const DEFAULT_CACHE_CAPACITY: usize = 200;

/// 近期转发链接缓存
///
/// 有界的插入序字符串集合，只用于重复抑制，不是正确性关键存储。
/// 超出容量时按 FIFO 淘汰最早插入的条目，membership 查询不会刷新位置。
/// 本身不做并发保护，由调用方串行化访问。
pub struct RecencyCache {
    capacity: usize,
    order: VecDeque<String>,
    seen: HashSet<String>,
}

impl RecencyCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity + 1),
            seen: HashSet::with_capacity(capacity + 1),
        }
    }

    /// 精确字符串匹配的成员查询
    pub fn contains(&self, link: &str) -> bool {
        self.seen.contains(link)
    }

    /// 记录一个链接
    ///
    /// 已存在的链接不会重复插入，也不会触发淘汰；
    /// 新链接导致超出容量时，恰好淘汰一个最早插入的条目。
    pub fn insert(&mut self, link: String) {
        if self.seen.contains(&link) {
            return;
        }

        self.order.push_back(link.clone());
        self.seen.insert(link);

        if self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for RecencyCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_and_insert() {
        let mut cache = RecencyCache::new();
        assert!(cache.is_empty());
        assert!(!cache.contains("https://zoom.us/j/1"));

        cache.insert("https://zoom.us/j/1".to_string());
        assert!(cache.contains("https://zoom.us/j/1"));
        assert_eq!(cache.len(), 1);

        // 精确匹配，不做任何规范化
        assert!(!cache.contains("https://zoom.us/j/1/"));
        assert!(!cache.contains("HTTPS://ZOOM.US/j/1"));
    }

    #[test]
    fn test_fifo_eviction() {
        // 插入容量+1个不同链接后，恰好剩下容量个条目，
        // 最早插入的被淘汰，其余全部保留
        let mut cache = RecencyCache::new();
        for i in 0..=DEFAULT_CACHE_CAPACITY {
            cache.insert(format!("https://zoom.us/j/{}", i));
            assert!(cache.len() <= DEFAULT_CACHE_CAPACITY);
        }

        assert_eq!(cache.len(), DEFAULT_CACHE_CAPACITY);
        assert!(!cache.contains("https://zoom.us/j/0"));
        for i in 1..=DEFAULT_CACHE_CAPACITY {
            assert!(cache.contains(&format!("https://zoom.us/j/{}", i)));
        }
    }

    #[test]
    fn test_duplicate_insert_is_idempotent() {
        let mut cache = RecencyCache::with_capacity(3);
        cache.insert("a".to_string());
        cache.insert("b".to_string());
        cache.insert("c".to_string());

        // 重复插入不增长也不淘汰
        cache.insert("a".to_string());
        assert_eq!(cache.len(), 3);
        assert!(cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));

        // 重复插入也不刷新位置：a 仍然是最早的条目
        cache.insert("d".to_string());
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("a"));
        assert!(cache.contains("d"));
    }
}
