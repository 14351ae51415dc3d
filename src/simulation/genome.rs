//! Byte-string genomes: parsing, interpretation and mutation.
//!
//! A genome is a flat byte sequence. Any byte at or above [`CONTROL_MIN`] is
//! a control byte that opens a gene; the bytes after it, up to the next
//! control byte, are that gene's body. Leading bytes before the first control
//! byte belong to no gene.
//!
//! Phenotypes are read from *bit censuses*: the number of set bits across the
//! bodies of every gene of a given type.

use super::color::rgb_to_hue;
use super::error::Result;
use super::params::Settings;
use super::prng::Prng;

/// Smallest control byte value.
pub const CONTROL_MIN: u8 = 0xF0;

/// Gene types understood by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneType {
    /// Adds area.
    Size,
    /// Grows one spike.
    Spike,
    /// Red hue channel.
    Red,
    /// Green hue channel.
    Green,
    /// Blue hue channel.
    Blue,
}

impl GeneType {
    /// Control byte that opens a gene of this type.
    pub fn control_byte(self) -> u8 {
        match self {
            GeneType::Size => 0xF0,
            GeneType::Spike => 0xF1,
            GeneType::Red => 0xF2,
            GeneType::Green => 0xF3,
            GeneType::Blue => 0xF4,
        }
    }

    /// Gene type for a control byte, if it is one the interpreter knows.
    pub fn from_control_byte(byte: u8) -> Option<Self> {
        match byte {
            0xF0 => Some(GeneType::Size),
            0xF1 => Some(GeneType::Spike),
            0xF2 => Some(GeneType::Red),
            0xF3 => Some(GeneType::Green),
            0xF4 => Some(GeneType::Blue),
            _ => None,
        }
    }
}

/// Returns `true` if the byte opens a gene.
pub fn is_control(byte: u8) -> bool {
    byte >= CONTROL_MIN
}

/// Read-only view of one gene inside a genome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gene<'a> {
    /// The control byte.
    pub control: u8,
    /// Index of the control byte divided by the genome length, in `[0, 1)`.
    pub location: f64,
    /// Bytes following the control byte.
    pub body: &'a [u8],
}

impl Gene<'_> {
    /// Interpreted type, `None` for unassigned control bytes.
    pub fn gene_type(&self) -> Option<GeneType> {
        GeneType::from_control_byte(self.control)
    }

    /// Number of set bits in the body.
    pub fn bit_census(&self) -> u32 {
        bit_census(self.body)
    }
}

/// One spike to grow, as read from a spike gene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeCommand {
    /// Direction in turns.
    pub angle: f64,
    /// Length in pixels.
    pub length: u32,
}

/// Build instructions read from a genome.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Commands {
    /// Pixels of area added on top of the minimum mass.
    pub size: u32,
    /// Spikes in genome order.
    pub spikes: Vec<SpikeCommand>,
    /// Hue in turns.
    pub hue: f64,
}

/// An immutable byte-string genome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Genome {
    bytes: Vec<u8>,
}

impl From<Vec<u8>> for Genome {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl Genome {
    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for the empty genome carried by motes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hex text for this genome.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parses hex text produced by [`Genome::to_hex`].
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        Ok(Self {
            bytes: hex::decode(hex_str)?,
        })
    }

    /// Splits the genome into genes. Leading non-control bytes are skipped.
    pub fn genes(&self) -> Vec<Gene<'_>> {
        let len = self.bytes.len() as f64;
        let starts = gene_starts(&self.bytes);
        let ends = starts.iter().skip(1).copied().chain([self.bytes.len()]);

        starts
            .iter()
            .zip(ends)
            .map(|(&start, end)| Gene {
                control: self.bytes[start],
                location: start as f64 / len,
                body: &self.bytes[start + 1..end],
            })
            .collect()
    }
}

/// Draws a fresh random genome.
pub fn create_genome(prng: &mut Prng, settings: &Settings) -> Genome {
    let gene_count = prng.rand_int(1, i64::from(settings.max_gene_count) + 1);
    let mut bytes = Vec::new();

    for _ in 0..gene_count {
        let gene = settings.pick_gene(prng.rand());
        bytes.push(gene.control_byte());

        let gene_size = prng.rand_int(1, i64::from(settings.max_gene_size) + 1);
        for _ in 0..gene_size {
            bytes.push(prng.rand_int(0, i64::from(CONTROL_MIN)) as u8);
        }
    }

    Genome::from(bytes)
}

/// Interprets a genome into build instructions.
///
/// A genome without control bytes reads as size zero, no spikes and hue zero.
pub fn read_genome(genome: &Genome, settings: &Settings) -> Commands {
    let params = &settings.params;
    let mut size_bits = 0;
    let (mut red, mut green, mut blue) = (0, 0, 0);
    let mut spikes = Vec::new();

    for gene in genome.genes() {
        let bits = gene.bit_census();
        match gene.gene_type() {
            Some(GeneType::Size) => size_bits += bits,
            Some(GeneType::Spike) => spikes.push(SpikeCommand {
                angle: gene.location,
                length: per_unit(bits, params.bits_per_spike_length),
            }),
            Some(GeneType::Red) => red += bits,
            Some(GeneType::Green) => green += bits,
            Some(GeneType::Blue) => blue += bits,
            None => {}
        }
    }

    Commands {
        size: per_unit(size_bits, params.bits_per_mass),
        spikes,
        hue: rgb_to_hue(red, green, blue),
    }
}

/// Produces a mutated descendant of a genome.
///
/// Byte-level operators run first (flip bits, drop, repeat, transpose), then
/// the result is re-segmented into genes and the gene-level operators run
/// (drop, repeat, transpose) before the genes are joined back together.
/// Each stage consumes the previous stage's output, so the order is fixed.
pub fn replicate_genome(genome: &Genome, prng: &mut Prng, settings: &Settings) -> Genome {
    let rates = settings.mutation;

    let bytes = genome.as_bytes().to_vec();
    let bytes = mutate_bits(bytes, rates.mutate_bit, prng);
    let bytes = drop_each(bytes, rates.drop_byte, prng);
    let bytes = repeat_each(bytes, rates.repeat_byte, prng);
    let bytes = transpose_each(bytes, rates.transpose_byte, prng);

    let (preamble, genes) = segment(bytes);
    let genes = drop_each(genes, rates.drop_gene, prng);
    let genes = repeat_each(genes, rates.repeat_gene, prng);
    let genes = transpose_each(genes, rates.transpose_gene, prng);

    let mut bytes = preamble;
    bytes.extend(genes.into_iter().flatten());
    Genome::from(bytes)
}

/// Count of set bits across a byte slice.
pub fn bit_census(bytes: &[u8]) -> u32 {
    bytes.iter().map(|byte| byte.count_ones()).sum()
}

fn per_unit(bits: u32, bits_per_unit: f64) -> u32 {
    if bits_per_unit > 0.0 {
        (f64::from(bits) / bits_per_unit).floor() as u32
    } else {
        0
    }
}

fn gene_starts(bytes: &[u8]) -> Vec<usize> {
    bytes
        .iter()
        .enumerate()
        .filter(|&(_, &byte)| is_control(byte))
        .map(|(i, _)| i)
        .collect()
}

/// Splits bytes into the gene-less preamble and a list of whole genes.
fn segment(bytes: Vec<u8>) -> (Vec<u8>, Vec<Vec<u8>>) {
    let first = bytes.iter().position(|&byte| is_control(byte));
    let Some(first) = first else {
        return (bytes, Vec::new());
    };

    let mut genes: Vec<Vec<u8>> = Vec::new();
    for &byte in &bytes[first..] {
        match genes.last_mut() {
            Some(gene) if !is_control(byte) => gene.push(byte),
            _ => genes.push(vec![byte]),
        }
    }

    let mut preamble = bytes;
    preamble.truncate(first);
    (preamble, genes)
}

fn mutate_bits(mut bytes: Vec<u8>, chance: f64, prng: &mut Prng) -> Vec<u8> {
    for byte in &mut bytes {
        for bit in 0..8 {
            if prng.chance(chance) {
                *byte ^= 1 << bit;
            }
        }
    }
    bytes
}

fn drop_each<T>(items: Vec<T>, chance: f64, prng: &mut Prng) -> Vec<T> {
    items
        .into_iter()
        .filter(|_| !prng.chance(chance))
        .collect()
}

/// Repeats each item in place; every copy re-rolls for another copy.
fn repeat_each<T: Clone>(items: Vec<T>, chance: f64, prng: &mut Prng) -> Vec<T> {
    let mut repeated = Vec::with_capacity(items.len());
    for item in items {
        while prng.chance(chance) {
            repeated.push(item.clone());
        }
        repeated.push(item);
    }
    repeated
}

/// Moves each selected item to a uniformly random position.
fn transpose_each<T>(items: Vec<T>, chance: f64, prng: &mut Prng) -> Vec<T> {
    let mut kept = Vec::with_capacity(items.len());
    let mut moved = Vec::new();
    for item in items {
        if prng.chance(chance) {
            moved.push(item);
        } else {
            kept.push(item);
        }
    }

    for item in moved {
        let index = prng.rand_int(0, kept.len() as i64 + 1) as usize;
        kept.insert(index, item);
    }
    kept
}
