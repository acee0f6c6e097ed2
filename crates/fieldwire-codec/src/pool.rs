//! Pooled, reusable byte buffers.
//!
//! A [`BufferPool`] hands out [`BufferLease`]s: fixed-length views over
//! recycled storage. A lease returns its storage to the pool when dropped,
//! so release happens on every exit path; [`BufferLease::release`] makes
//! the return explicit where that reads better.

use std::sync::Mutex;

/// Default cap on buffers retained for reuse.
pub const DEFAULT_MAX_RETAINED: usize = 32;

/// A pool of reusable byte buffers.
pub struct BufferPool {
    shelf: Mutex<Vec<Vec<u8>>>,
    max_retained: usize,
}

impl BufferPool {
    /// Create a pool with the default retention cap.
    pub fn new() -> Self {
        Self::with_max_retained(DEFAULT_MAX_RETAINED)
    }

    /// Create a pool retaining at most `max_retained` idle buffers.
    pub fn with_max_retained(max_retained: usize) -> Self {
        Self {
            shelf: Mutex::new(Vec::new()),
            max_retained,
        }
    }

    /// Rent a buffer with at least `min_len` bytes, all zeroed.
    ///
    /// The lease's logical length is exactly `min_len` even when the
    /// recycled storage is larger.
    pub fn rent(&self, min_len: usize) -> BufferLease<'_> {
        let recycled = {
            let mut shelf = self.shelf.lock().unwrap_or_else(|e| e.into_inner());
            let found = shelf.iter().position(|buf| buf.capacity() >= min_len);
            found.map(|at| shelf.swap_remove(at))
        };

        let mut buf = recycled.unwrap_or_default();
        buf.clear();
        buf.resize(min_len, 0);

        BufferLease {
            pool: self,
            buf: Some(buf),
            len: min_len,
        }
    }

    /// Number of idle buffers currently retained.
    pub fn idle(&self) -> usize {
        self.shelf.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn give_back(&self, buf: Vec<u8>) {
        let mut shelf = self.shelf.lock().unwrap_or_else(|e| e.into_inner());
        if shelf.len() < self.max_retained {
            shelf.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A rented buffer, exclusively owned until released.
///
/// Dereferences to its logical `len` bytes. Exclusive access follows from
/// ownership: sharing a lease across threads requires moving it.
pub struct BufferLease<'a> {
    pool: &'a BufferPool,
    buf: Option<Vec<u8>>,
    len: usize,
}

impl BufferLease<'_> {
    /// Logical length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The leased bytes.
    pub fn as_slice(&self) -> &[u8] {
        match &self.buf {
            Some(buf) => &buf[..self.len],
            None => &[],
        }
    }

    /// The leased bytes, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.buf {
            Some(buf) => &mut buf[..self.len],
            None => &mut [],
        }
    }

    /// Return the storage to the pool now.
    pub fn release(mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.give_back(buf);
        }
    }
}

impl Drop for BufferLease<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.give_back(buf);
        }
    }
}

impl std::ops::Deref for BufferLease<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl std::fmt::Debug for BufferLease<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferLease").field("len", &self.len).finish()
    }
}
