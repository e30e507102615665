//! Chunked output accumulation.
//!
//! Escape output grows into fixed-capacity chunks. A chunk, once closed, is
//! never revisited or rewritten; resuming a suspended operation re-attaches
//! the closed prefix as-is, which is what makes suspension cheap. The open
//! chunk's capacity is tracked explicitly and a chunk is never grown in
//! place: overflow closes it and allocates a successor sized by an
//! overallocation heuristic biased toward how many bytes the caller still
//! expects to write.

use alloc::vec::Vec;

use crate::error::EscapeError;

/// Smallest chunk the writer allocates.
pub(crate) const MIN_CHUNK: usize = 64;

/// Ordered list of closed output chunks.
///
/// Chunk order is byte order of the escaped string: concatenating the chunks
/// (see [`ChunkSequence::into_vec`]) reconstructs the contiguous output, and
/// the order is never changed after a chunk is pushed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkSequence {
    chunks: Vec<Vec<u8>>,
}

impl ChunkSequence {
    /// Total byte length across all chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// `true` when the sequence holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(Vec::is_empty)
    }

    /// Number of chunks in the sequence.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates the chunks in output order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.chunks.iter().map(Vec::as_slice)
    }

    /// Concatenates the sequence into one contiguous buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }

    pub(crate) fn as_chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    fn push(&mut self, chunk: Vec<u8>) {
        self.chunks.push(chunk);
    }
}

/// A finished writer: either the single chunk ever needed, or the ordered
/// sequence the output spilled into.
#[derive(Debug)]
pub(crate) enum Finished {
    Single(Vec<u8>),
    Chunks(ChunkSequence),
}

/// Append-only writer that accumulates output into fixed-capacity chunks.
#[derive(Debug, Clone, Default)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct ChunkedWriter {
    closed: ChunkSequence,
    head: Vec<u8>,
    head_cap: usize,
}

impl ChunkedWriter {
    /// Appends `span`, closing the open chunk on overflow. `remaining_hint`
    /// biases the successor chunk's capacity toward the bytes the caller
    /// still expects to write, cutting down future allocations on
    /// escape-heavy runs.
    pub(crate) fn write(&mut self, span: &[u8], remaining_hint: usize) -> Result<(), EscapeError> {
        let free = self.head_cap.saturating_sub(self.head.len());
        if span.len() <= free {
            self.head.extend_from_slice(span);
            return Ok(());
        }
        let (fits, rest) = span.split_at(free);
        self.head.extend_from_slice(fits);
        self.close_head();
        let want = rest.len() + remaining_hint;
        let cap = (want + want / 10).max(MIN_CHUNK);
        let mut chunk = Vec::new();
        chunk.try_reserve_exact(cap)?;
        chunk.extend_from_slice(rest);
        self.head = chunk;
        self.head_cap = cap;
        Ok(())
    }

    /// Closes the open chunk at exactly the bytes written and returns the
    /// accumulated output, as a single contiguous chunk when one sufficed.
    pub(crate) fn finish(mut self) -> Finished {
        self.head.shrink_to_fit();
        if self.closed.chunks.is_empty() {
            Finished::Single(self.head)
        } else {
            self.close_head();
            Finished::Chunks(self.closed)
        }
    }

    #[cfg(test)]
    pub(crate) fn written(&self) -> usize {
        self.closed.len() + self.head.len()
    }

    fn close_head(&mut self) {
        if !self.head.is_empty() {
            self.closed.push(core::mem::take(&mut self.head));
        }
        self.head_cap = 0;
    }
}
