//! Composition of the extraction stages.
//!
//! classify → extract → scan each message → decode each block. The first
//! failure aborts the run and no records decoded before it are returned.

use tracing::debug;

use crate::classify::classify;
use crate::decode::decode;
use crate::extract::{extract, Extraction};
use crate::scan::BlockScanner;
use crate::{EventDescriptor, MessageRecord, MetadataRecord, PipelineError, RunOutcome};

/// Extracts metadata records from a single event.
#[derive(Debug, Clone, Default)]
pub struct MetadataPipeline {
    scanner: BlockScanner,
}

impl MetadataPipeline {
    /// Creates a pipeline that finds blocks with `scanner`.
    pub fn new(scanner: BlockScanner) -> Self {
        Self { scanner }
    }

    /// Runs the whole pipeline for one event.
    pub fn run(&self, descriptor: &EventDescriptor) -> Result<RunOutcome, PipelineError> {
        let route = classify(descriptor)?;
        debug!(%route, "classified event");

        let messages = match extract(route, descriptor.payload())? {
            Extraction::Messages(messages) => messages,
            Extraction::Inapplicable { reason } => return Ok(RunOutcome::Skipped { reason }),
        };
        debug!(%route, count = messages.len(), "extracted messages");

        let records = self.decode_messages(&messages)?;
        if records.is_empty() {
            Ok(RunOutcome::NoMetadata)
        } else {
            Ok(RunOutcome::Extracted(records))
        }
    }

    /// Scans and decodes every block of every message, preserving message
    /// order and block order within each message.
    ///
    /// A message without blocks contributes nothing, whatever its
    /// provenance. One with blocks must have complete provenance.
    pub fn decode_messages(
        &self,
        messages: &[MessageRecord],
    ) -> Result<Vec<MetadataRecord>, PipelineError> {
        let mut records = Vec::new();
        for message in messages {
            let mut blocks = self.scanner.blocks(message.text()).enumerate().peekable();
            if blocks.peek().is_none() {
                continue;
            }
            let provenance = message.provenance()?;
            for (block_index, block) in blocks {
                debug!(
                    id = %provenance.id,
                    block_index,
                    fence = %block.kind,
                    block = block.text,
                    "decoding metadata block"
                );
                let record = decode(block.text, message.text(), provenance).map_err(|source| {
                    PipelineError::MalformedMetadata {
                        message_id: provenance.id.clone(),
                        block_index,
                        source,
                    }
                })?;
                records.push(record);
            }
        }
        Ok(records)
    }
}

/// Runs the pipeline with the built-in fence table.
pub fn run(descriptor: &EventDescriptor) -> Result<RunOutcome, PipelineError> {
    MetadataPipeline::default().run(descriptor)
}
