//! Writes one `<id> <length>` line per Fasta record.

use crate::error::Result;
use crate::FastA::{FastARecord, Reader};
use log::debug;
use std::io::{BufRead, Write};
use std::path::Path;

/// Reports every record of the Fasta file at `path` to `out`.
///
/// The file is closed when this returns, whether it succeeded or not.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// let mut out = Vec::new();
/// let n = fastalen::report::report_path(Path::new("input.fa"), &mut out).unwrap();
/// println!("{} records", n);
/// ```
pub fn report_path<W: Write>(path: &Path, out: &mut W) -> Result<u64>
{
    let reader = Reader::from_path(path)?;
    write_lengths(reader, out)
}

/// Same as [`report_path`] over an already opened source.
pub fn report<R: BufRead, W: Write>(reader: R, out: &mut W) -> Result<u64>
{
    write_lengths(Reader::new(reader), out)
}

// Lines of records read before an error are flushed before the error is returned.
fn write_lengths<R: BufRead, W: Write>(mut reader: Reader<R>, out: &mut W) -> Result<u64>
{
    let mut record = FastARecord::default();
    let mut count = 0;
    let result = loop
    {
        match reader.read(&mut record)
        {
            Ok(true) =>
            {
                if let Err(e) = writeln!(out, "{} {}", record.id(), record.seq_len())
                {
                    break Err(e.into());
                }
                count += 1;
            }
            Ok(false) => break Ok(count),
            Err(e) => break Err(e),
        }
    };
    let flushed = out.flush();
    let count = result?;
    flushed?;
    debug!("{} records, {} lines", count, reader.line());
    Ok(count)
}
