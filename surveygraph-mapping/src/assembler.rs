//! Chunked graph assembly
//!
//! The assembler pulls rows from a reader, maps each into an in-progress
//! sub-graph and hands the sub-graph out whenever the chunk policy says so.
//! The final row always closes a chunk. A yielded sub-graph is replaced by
//! a fresh one, so no row's triples appear in two chunks and memory stays
//! bounded by the chunk size.
//!
//! It is an ordinary `Iterator`: rows are read only as fast as the caller
//! consumes chunks. The first error is yielded and ends the iteration.

use std::io::Read;
use std::iter::Peekable;

use surveygraph_ir::Graph;
use surveygraph_tabular::TableReader;

use crate::chunk::ChunkPolicy;
use crate::error::Result;
use crate::extra_columns;
use crate::mapper::{MappingContext, RowMapper};

/// Iterator of mapped sub-graphs.
pub struct GraphAssembler<'a, R: Read> {
    rows: Peekable<TableReader<R>>,
    mapper: Box<dyn RowMapper>,
    ctx: MappingContext<'a>,
    policy: ChunkPolicy,
    graph: Graph,
    rows_in_chunk: usize,
    chunks: usize,
    started: bool,
    done: bool,
}

impl<'a, R: Read> GraphAssembler<'a, R> {
    /// `reader` must already carry the merged schema.
    pub fn new(
        reader: TableReader<R>,
        mapper: Box<dyn RowMapper>,
        ctx: MappingContext<'a>,
        policy: ChunkPolicy,
    ) -> Self {
        Self {
            rows: reader.peekable(),
            mapper,
            ctx,
            policy,
            graph: Graph::new(),
            rows_in_chunk: 0,
            chunks: 0,
            started: false,
            done: false,
        }
    }

    /// Number of sub-graphs yielded so far.
    pub fn chunks_yielded(&self) -> usize {
        self.chunks
    }

    fn take_chunk(&mut self) -> Graph {
        let graph = std::mem::take(&mut self.graph);
        tracing::debug!(
            template = self.ctx.template(),
            chunk = self.chunks,
            rows = self.rows_in_chunk,
            triples = graph.len(),
            "Yielding sub-graph"
        );
        self.chunks += 1;
        self.rows_in_chunk = 0;
        graph
    }

    fn fail<T>(&mut self, error: impl Into<crate::error::MappingError>) -> Option<Result<T>> {
        self.done = true;
        let error = error.into();
        tracing::error!(template = self.ctx.template(), error = %error, "Mapping stopped");
        Some(Err(error))
    }
}

impl<R: Read> Iterator for GraphAssembler<'_, R> {
    type Item = Result<Graph>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            if let Err(e) = self.mapper.begin(&self.ctx, &mut self.graph) {
                return self.fail(e);
            }
        }

        loop {
            let row = match self.rows.next() {
                Some(Ok(row)) => row,
                Some(Err(e)) => return self.fail(e),
                None => {
                    // Only reached without any data rows; the last row
                    // otherwise closes the final chunk itself.
                    self.done = true;
                    return (self.chunks == 0).then(|| Ok(self.take_chunk()));
                }
            };

            match self.mapper.map_row(&self.ctx, &row, &mut self.graph) {
                Ok(Some(subject)) => {
                    extra_columns::annotate(&mut self.graph, &subject, &row);
                }
                Ok(None) => {}
                Err(e) => return self.fail(e),
            }
            self.rows_in_chunk += 1;

            let last = self.rows.peek().is_none();
            if last || self.policy.should_yield(self.rows_in_chunk) {
                self.done = last;
                return Some(Ok(self.take_chunk()));
            }
        }
    }
}
