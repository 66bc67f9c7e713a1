use super::request::LookupRequest;
use std::slice::Chunks;

/// Lazy sequence of fixed-size batches over a normalized name set.
///
/// Batches are built on demand; the resolver pulls the next one only after the
/// previous batch has fully resolved.
#[derive(Debug)]
pub struct Batches<'a> {
    chunks: Chunks<'a, String>,
    next_index: usize,
}

impl<'a> Batches<'a> {
    /// A `batch_size` of zero is treated as one.
    pub(crate) fn new(names: &'a [String], batch_size: usize) -> Self {
        Self {
            chunks: names.chunks(batch_size.max(1)),
            next_index: 0,
        }
    }
}

impl Iterator for Batches<'_> {
    type Item = LookupRequest;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        let request = LookupRequest::new(self.next_index, chunk.to_vec());
        self.next_index += 1;
        Some(request)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Batches<'_> {}
