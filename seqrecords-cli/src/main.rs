//! Command-line access to a length-sorted sequence collection.
//!
//! ```shell
//! seqrecords genes.fasta summary
//! seqrecords genes.fasta longest
//! seqrecords reads.fq orfs --id read7 --start ATG GTG
//! seqrecords table.csv --seq-column dna repeats 12 --min-count 2
//! ```
//!
//! Results are written to stdout as CSV. Positions are one-based and
//! inclusive on both ends.

use std::io;
use std::io::Write;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::Verbosity;
use seqrecords_core::io::ColumnSel;
use seqrecords_core::io::CsvColumns;
use seqrecords_core::io::OnError;
use seqrecords_core::orf::CodonSet;
use seqrecords_core::FileSource;
use seqrecords_core::OrfConfig;
use seqrecords_core::SeqFormat;
use seqrecords_core::SeqRecord;
use seqrecords_core::Sequence;
use seqrecords_core::SequenceCollection;
use tracing::info;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

type Collection = SequenceCollection<Sequence>;

#[derive(Debug, Parser)]
#[command(name = "seqrecords", version, about)]
struct Args {
    /// The FASTA, FASTQ, or CSV file to load.
    input: PathBuf,

    /// The input format. Detected from the extension or content when omitted.
    #[arg(short, long)]
    format: Option<SeqFormat>,

    /// The CSV column holding record identifiers.
    #[arg(long, default_value = "id")]
    id_column: String,

    /// The CSV column holding sequences.
    #[arg(long, default_value = "seq")]
    seq_column: String,

    /// Skip CSV rows with invalid sequences instead of failing.
    #[arg(long, default_value_t = false)]
    skip_invalid: bool,

    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Record count and the shortest and longest sequence lengths.
    Summary,

    /// Every record of exactly the given length.
    Length { length: usize },

    /// Every record tied for the longest sequence.
    Longest,

    /// Every record tied for the shortest sequence.
    Shortest,

    /// A single record by identifier.
    Get { id: String },

    /// Forward open reading frames of one record, or of every record.
    Orfs {
        /// Only scan the record with this identifier.
        #[arg(long)]
        id: Option<String>,

        /// Start codons.
        #[arg(long, num_args = 1.., default_values = ["ATG"])]
        start: Vec<String>,

        /// Stop codons.
        #[arg(long, num_args = 1.., default_values = ["TAA", "TAG", "TGA"])]
        stop: Vec<String>,
    },

    /// Subsequences of the given length and every place they occur.
    Repeats {
        length: usize,

        /// Only report subsequences occurring at least this many times.
        #[arg(long, default_value_t = 1)]
        min_count: usize,
    },
}

impl Args {
    fn source(&self) -> Result<FileSource> {
        let source = match self.format {
            Some(format) => FileSource::new(&self.input, format),
            None => FileSource::detect(&self.input)
                .with_context(|| format!("detecting format of {}", self.input.display()))?,
        };

        let on_error = if self.skip_invalid {
            OnError::Skip
        } else {
            OnError::Raise
        };

        Ok(source
            .with_csv_columns(CsvColumns::new(
                ColumnSel::Name(self.id_column.clone()),
                ColumnSel::Name(self.seq_column.clone()),
            ))
            .with_on_error(on_error))
    }
}

fn write_lengths<W: Write>(out: &mut csv::Writer<W>, records: &[SeqRecord<Sequence>]) -> Result<()> {
    out.write_record(["id", "length"])?;
    for record in records {
        out.write_record([record.id(), record.len().to_string().as_str()])?;
    }
    Ok(())
}

fn run<W: Write>(command: &Command, collection: &Collection, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    match command {
        Command::Summary => {
            out.write_record(["records", "shortest", "longest"])?;
            let bound = |records: Option<&SeqRecord<Sequence>>| {
                records.map(|r| r.len().to_string()).unwrap_or_default()
            };
            out.write_record([
                collection.len().to_string(),
                bound(collection.records().first()),
                bound(collection.records().last()),
            ])?;
        }
        Command::Length { length } => {
            write_lengths(&mut out, collection.records_of_length(*length))?;
        }
        Command::Longest => {
            write_lengths(&mut out, collection.longest().context("finding longest records")?)?;
        }
        Command::Shortest => {
            write_lengths(&mut out, collection.shortest().context("finding shortest records")?)?;
        }
        Command::Get { id } => {
            let Some(record) = collection.get_by_id(id) else {
                bail!("no record with identifier `{id}`");
            };
            out.write_record(["id", "description", "length", "sequence"])?;
            out.write_record([
                record.id(),
                record.desc().unwrap_or_default(),
                record.len().to_string().as_str(),
                record.seq().as_str(),
            ])?;
        }
        Command::Orfs { id, start, stop } => {
            let config = OrfConfig::new(
                CodonSet::new(start).context("parsing start codons")?,
                CodonSet::new(stop).context("parsing stop codons")?,
            );
            let found = match id {
                Some(id) => match collection.forward_orfs_by_id(id, &config) {
                    Some(orfs) => vec![(id.as_str(), orfs)],
                    None => bail!("no record with identifier `{id}`"),
                },
                None => collection.forward_orfs(&config),
            };

            out.write_record(["id", "frame", "start", "end", "length"])?;
            for (id, by_frame) in &found {
                for (frame, orfs) in by_frame.iter() {
                    for orf in orfs {
                        let (start, end) = orf.to_one_based_inclusive();
                        out.write_record([
                            id.to_string(),
                            frame.to_string(),
                            start.to_string(),
                            end.to_string(),
                            orf.len().to_string(),
                        ])?;
                    }
                }
            }
        }
        Command::Repeats { length, min_count } => {
            let report = collection.repeating_subsequences(*length);
            info!(
                length,
                subsequences = report.len(),
                "found candidate subsequences"
            );

            out.write_record(["subsequence", "count", "id", "start", "end"])?;
            for (subseq, entry) in report.with_min_count(*min_count) {
                let subseq = String::from_utf8_lossy(subseq);
                let count = entry.count().to_string();
                for (id, pair) in entry.occurrences() {
                    let (start, end) = pair.to_one_based_inclusive();
                    out.write_record([
                        &*subseq,
                        count.as_str(),
                        id,
                        start.to_string().as_str(),
                        end.to_string().as_str(),
                    ])?;
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .with_writer(io::stderr)
            .init(),
    };

    let source = args.source()?;
    info!(
        path = %source.path().display(),
        format = %source.format(),
        "loading records"
    );
    let collection = Collection::from_source(&source)
        .with_context(|| format!("loading records from {}", args.input.display()))?;

    run(&args.command, &collection, io::stdout().lock())
}
