use std::cmp::Ordering;
use std::io::BufRead;
use std::path::Path;

use fxhash::FxHashMap as HashMap;

use crate::errors::{GenomeError, Result};
use crate::models::Position;
use crate::utils::{get_dynamic_reader, is_header_line};

///
/// Ordered list of contigs and their lengths.
///
/// The order of the contigs defines the genomic total order used everywhere: positions are
/// compared first by the index of their contig in the dictionary, then by coordinate.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceDictionary {
    contigs: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl SequenceDictionary {
    pub fn new(contigs: Vec<(String, u32)>) -> Result<Self> {
        let mut index = HashMap::default();
        for (i, (name, _)) in contigs.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(GenomeError::DuplicateContig(name.clone()));
            }
        }
        Ok(SequenceDictionary { contigs, index })
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn index_of(&self, contig: &str) -> Result<usize> {
        self.index
            .get(contig)
            .copied()
            .ok_or_else(|| GenomeError::UnknownContig(contig.to_string()))
    }

    pub fn length_of(&self, contig: &str) -> Result<u32> {
        let idx = self.index_of(contig)?;
        Ok(self.contigs[idx].1)
    }

    ///
    /// Compare two positions in dictionary order.
    ///
    /// Fails if either contig is missing from the dictionary.
    ///
    #[inline]
    pub fn compare(&self, a: &Position, b: &Position) -> Result<Ordering> {
        if a.contig == b.contig {
            // still validate the contig so unknown names never compare silently
            self.index_of(&a.contig)?;
            return Ok(a.position.cmp(&b.position));
        }
        let ia = self.index_of(&a.contig)?;
        let ib = self.index_of(&b.contig)?;
        Ok(ia.cmp(&ib).then(a.position.cmp(&b.position)))
    }

    ///
    /// Check that a sequence of positions is non-decreasing in dictionary order.
    ///
    pub fn is_ordered<'a, I>(&self, positions: I) -> Result<bool>
    where
        I: IntoIterator<Item = &'a Position>,
    {
        let mut previous: Option<&Position> = None;
        for current in positions {
            if let Some(prev) = previous {
                if self.compare(prev, current)? == Ordering::Greater {
                    return Ok(false);
                }
            } else {
                self.index_of(&current.contig)?;
            }
            previous = Some(current);
        }
        Ok(true)
    }
}

impl TryFrom<&Path> for SequenceDictionary {
    type Error = GenomeError;

    ///
    /// Read a dictionary from disk.
    ///
    /// Accepts chrom.sizes and `.fai` files (name and length in the first two columns) and
    /// SAM-style `.dict` files (`@SQ` lines with `SN:` and `LN:` tags). Gzipped input is
    /// detected by extension.
    ///
    fn try_from(value: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(value)?;
        let mut contigs: Vec<(String, u32)> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            if line.starts_with("@SQ") {
                contigs.push(parse_sq_line(&line)?);
                continue;
            }
            if line.starts_with('@') || is_header_line(&line) {
                continue;
            }

            let mut fields = line.split('\t');
            let name = fields
                .next()
                .ok_or_else(|| GenomeError::DictionaryParseError(line.clone()))?;
            let length = fields
                .next()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .ok_or_else(|| GenomeError::DictionaryParseError(line.clone()))?;
            contigs.push((name.to_string(), length));
        }

        if contigs.is_empty() {
            return Err(GenomeError::EmptyDictionary(value.display().to_string()));
        }

        SequenceDictionary::new(contigs)
    }
}

fn parse_sq_line(line: &str) -> Result<(String, u32)> {
    let mut name = None;
    let mut length = None;
    for field in line.split('\t').skip(1) {
        if let Some(sn) = field.strip_prefix("SN:") {
            name = Some(sn.to_string());
        } else if let Some(ln) = field.strip_prefix("LN:") {
            length = ln.parse::<u32>().ok();
        }
    }
    match (name, length) {
        (Some(name), Some(length)) => Ok((name, length)),
        _ => Err(GenomeError::DictionaryParseError(line.to_string())),
    }
}
