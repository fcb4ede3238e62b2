//! fastalen reads Fasta files and reports the identifier and sequence length
//! of every record.
//!
//! The reader in [`FastA`] is forward-only and counts sequence bytes in place,
//! so memory use is bounded by the longest header line, not by the longest
//! sequence.
//!
//! ```
//! use fastalen::FastA;
//! use std::io::Cursor;
//!
//! let input = Cursor::new(">seq1 description\nACGT\nACG\n>seq2\nAC\n");
//! let lengths: Vec<_> = FastA::Reader::new(input)
//!     .map(|r| r.map(|rec| (rec.id, rec.seq_len)))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(vec![("seq1".to_string(), 7), ("seq2".to_string(), 2)], lengths);
//! ```

pub mod error;
pub mod report;

#[allow(non_snake_case)]
pub mod FastA
{
    use crate::error::{Error, FormatErrorKind, Result};
    use log::info;
    use std::fs::File;
    use std::io::{self, BufRead, BufReader};
    use std::path::Path;

    /// Identifier and sequence length of one record, owned.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SeqLength
    {
        pub id: String,
        pub seq_len: u64,
    }

    /// Reusable record buffer filled by [`Reader::read`].
    ///
    /// Only the header line is stored. Sequence lines are counted, never copied.
    #[derive(Default, Debug, Clone)]
    pub struct FastARecord
    {
        header: String,
        id_end: usize,
        line: u64,
        seq_len: u64,
        seq_lines: u64,
    }

    impl FastARecord
    {
        /// The token following `>` up to the first whitespace.
        pub fn id(&self) -> &str
        {
            &self.header[..self.id_end]
        }

        /// Everything after the identifier, if anything besides whitespace.
        pub fn desc(&self) -> Option<&str>
        {
            let desc = self.header[self.id_end..].trim();
            if desc.is_empty()
            {
                None
            }
            else
            {
                Some(desc)
            }
        }

        /// Header line without the `>` marker and line terminator.
        pub fn header(&self) -> &str
        {
            &self.header
        }

        /// Number of sequence bytes, line terminators excluded.
        pub fn seq_len(&self) -> u64
        {
            self.seq_len
        }

        /// Number of sequence lines, blank ones included.
        pub fn seq_lines(&self) -> u64
        {
            self.seq_lines
        }

        /// 1-based line number of the header.
        pub fn line(&self) -> u64
        {
            self.line
        }

        pub fn into_seq_length(mut self) -> SeqLength
        {
            self.header.truncate(self.id_end);
            SeqLength { id: self.header, seq_len: self.seq_len }
        }

        fn set_header(&mut self, raw: &[u8], line: u64) -> Result<()>
        {
            // raw[0] is the '>' marker
            let content = rstrip_newline(&raw[1..]);
            let header = std::str::from_utf8(content)
                .map_err(|_| Error::format(line, FormatErrorKind::InvalidUtf8))?;
            let id_end = content
                .iter()
                .position(|c| c.is_ascii_whitespace())
                .unwrap_or(content.len());
            if id_end == 0
            {
                return Err(Error::format(line, FormatErrorKind::MissingId));
            }
            self.header.clear();
            self.header.push_str(header);
            self.id_end = id_end;
            self.line = line;
            self.seq_len = 0;
            self.seq_lines = 0;
            Ok(())
        }
    }

    /// Forward-only Fasta reader over any [`BufRead`].
    pub struct Reader<R>
    {
        inner: R,
        // lines consumed so far
        line: u64,
        // header line read ahead while finishing the previous record
        header: Vec<u8>,
        header_line: u64,
        pending: bool,
        done: bool,
    }

    impl Reader<BufReader<File>>
    {
        /// Opens `path` for reading. Missing, unreadable and directory paths
        /// are reported as file access errors.
        pub fn from_path(path: &Path) -> Result<Self>
        {
            let file = File::open(path).map_err(|e| Error::file_access(path, e))?;
            let metadata = file.metadata().map_err(|e| Error::file_access(path, e))?;
            if metadata.is_dir()
            {
                return Err(Error::file_access(
                    path,
                    io::Error::new(io::ErrorKind::Other, "Is a directory"),
                ));
            }
            info!("reading {}", path.display());
            Ok(Reader::new(BufReader::new(file)))
        }
    }

    impl<R: BufRead> Reader<R>
    {
        pub fn new(inner: R) -> Self
        {
            Reader {
                inner,
                line: 0,
                header: Vec::new(),
                header_line: 0,
                pending: false,
                done: false,
            }
        }

        /// Fills `record` with the next record. Returns `Ok(false)` at end of input.
        pub fn read(&mut self, record: &mut FastARecord) -> Result<bool>
        {
            if !self.pending && !self.seek_header()?
            {
                return Ok(false);
            }
            self.pending = false;
            record.set_header(&self.header, self.header_line)?;
            self.count_seq(record)?;
            Ok(true)
        }

        /// Number of lines consumed so far.
        pub fn line(&self) -> u64
        {
            self.line
        }

        // Skips blank lines until the first header. Anything else before it is an error.
        fn seek_header(&mut self) -> Result<bool>
        {
            loop
            {
                self.header.clear();
                if self.inner.read_until(b'\n', &mut self.header)? == 0
                {
                    return Ok(false);
                }
                self.line += 1;
                if self.header[0] == b'>'
                {
                    self.header_line = self.line;
                    return Ok(true);
                }
                if !self.header.iter().all(|c| c.is_ascii_whitespace())
                {
                    return Err(Error::format(self.line, FormatErrorKind::MissingHeader));
                }
            }
        }

        // Counts sequence lines up to the next header, which is read into
        // `self.header`, or to end of input.
        fn count_seq(&mut self, record: &mut FastARecord) -> Result<()>
        {
            let mut line_len: u64 = 0;
            let mut last = 0u8;
            let mut at_line_start = true;
            loop
            {
                let buf = self.inner.fill_buf()?;
                if buf.is_empty()
                {
                    if !at_line_start
                    {
                        // last line without terminator
                        record.seq_len += line_len - (last == b'\r') as u64;
                        record.seq_lines += 1;
                        self.line += 1;
                    }
                    return Ok(());
                }
                if at_line_start && buf[0] == b'>'
                {
                    self.header.clear();
                    self.inner.read_until(b'\n', &mut self.header)?;
                    self.line += 1;
                    self.header_line = self.line;
                    self.pending = true;
                    return Ok(());
                }
                match memchr::memchr(b'\n', buf)
                {
                    Some(line_end) =>
                    {
                        if line_end > 0
                        {
                            last = buf[line_end - 1];
                        }
                        line_len += line_end as u64;
                        if line_len > 0 && last == b'\r'
                        {
                            line_len -= 1;
                        }
                        record.seq_len += line_len;
                        record.seq_lines += 1;
                        self.line += 1;
                        line_len = 0;
                        last = 0;
                        at_line_start = true;
                        self.inner.consume(line_end + 1); // skip '\n'
                    }
                    None =>
                    {
                        let n = buf.len();
                        last = buf[n - 1];
                        line_len += n as u64;
                        at_line_start = false;
                        self.inner.consume(n);
                    }
                }
            }
        }
    }

    impl<R: BufRead> Iterator for Reader<R>
    {
        type Item = Result<SeqLength>;

        fn next(&mut self) -> Option<Self::Item>
        {
            if self.done
            {
                return None;
            }
            let mut record = FastARecord::default();
            match self.read(&mut record)
            {
                Ok(true) => Some(Ok(record.into_seq_length())),
                Ok(false) =>
                {
                    self.done = true;
                    None
                }
                Err(e) =>
                {
                    self.done = true;
                    Some(Err(e))
                }
            }
        }
    }

    /// Calls `f` for every record, reusing one record buffer.
    /// Returns the number of records read.
    pub fn fasta_for_each<R, F>(reader: R, mut f: F) -> Result<u64>
    where
        R: BufRead,
        F: FnMut(&FastARecord),
    {
        let mut reader = Reader::new(reader);
        let mut record = FastARecord::default();
        let mut count = 0;
        while reader.read(&mut record)?
        {
            f(&record);
            count += 1;
        }
        Ok(count)
    }

    fn rstrip_newline(s: &[u8]) -> &[u8]
    {
        let s = s.strip_suffix(b"\n").unwrap_or(s);
        s.strip_suffix(b"\r").unwrap_or(s)
    }
}

#[cfg(test)]
mod tests
{
    use super::error::{ErrorKind, FormatErrorKind};
    use super::FastA::{fasta_for_each, FastARecord, Reader, SeqLength};
    use std::io::BufReader;
    use std::io::Cursor;

    fn lengths(input: &[u8]) -> Vec<(String, u64)>
    {
        Reader::new(Cursor::new(input.to_vec()))
            .map(|r| r.map(|SeqLength { id, seq_len }| (id, seq_len)))
            .collect::<Result<_, _>>()
            .expect("valid fasta")
    }

    fn format_error(input: &[u8]) -> (u64, FormatErrorKind)
    {
        let err = Reader::new(Cursor::new(input.to_vec()))
            .find_map(|r| r.err())
            .expect("format error");
        match err.into_kind()
        {
            ErrorKind::Format { line, kind } => (line, kind),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn fasta()
    {
        let mut reader = Reader::new(Cursor::new(">seq1 description\nACGT\nACG\n>seq2\nAC\n"));
        let mut record = FastARecord::default();
        assert!(reader.read(&mut record).unwrap());
        assert_eq!("seq1", record.id());
        assert_eq!(Some("description"), record.desc());
        assert_eq!("seq1 description", record.header());
        assert_eq!(7, record.seq_len());
        assert_eq!(2, record.seq_lines());
        assert_eq!(1, record.line());
        assert!(reader.read(&mut record).unwrap());
        assert_eq!("seq2", record.id());
        assert_eq!(None, record.desc());
        assert_eq!(2, record.seq_len());
        assert_eq!(4, record.line());
        assert!(!reader.read(&mut record).unwrap());
        assert_eq!(5, reader.line());
    }

    #[test]
    fn empty_input()
    {
        assert!(lengths(b"").is_empty());
        assert!(lengths(b"\n  \n\t\n").is_empty());
    }

    #[test]
    fn header_without_sequence()
    {
        assert_eq!(vec![("a".to_string(), 0)], lengths(b">a"));
        assert_eq!(vec![("a".to_string(), 0)], lengths(b">a\n"));
        assert_eq!(
            vec![("a".to_string(), 0), ("b".to_string(), 3)],
            lengths(b">a\n>b\nAAA")
        );
    }

    #[test]
    fn crlf()
    {
        assert_eq!(
            lengths(b">seq1 x\nACGT\nACG\n>seq2\nAC\n"),
            lengths(b">seq1 x\r\nACGT\r\nACG\r\n>seq2\r\nAC\r\n")
        );
        assert_eq!(vec![("s".to_string(), 2)], lengths(b">s\r\nAC\r"));
    }

    #[test]
    fn no_trailing_newline()
    {
        assert_eq!(vec![("s".to_string(), 6)], lengths(b">s\nACG\nTTT"));
    }

    #[test]
    fn blank_lines()
    {
        assert_eq!(
            vec![("a".to_string(), 4), ("b".to_string(), 1)],
            lengths(b"\n\n>a\nAC\n\nGT\n\n>b\nA\n")
        );
    }

    #[test]
    fn marker_inside_sequence_line()
    {
        // only a '>' at line start opens a record
        assert_eq!(vec![("a".to_string(), 5)], lengths(b">a\nAC>GT\n"));
    }

    #[test]
    fn identifier_split()
    {
        let ids: Vec<String> = lengths(b">a\tb\n>c  d e\n>f\r\n").into_iter().map(|(id, _)| id).collect();
        assert_eq!(vec!["a", "c", "f"], ids);
    }

    #[test]
    fn small_buffer()
    {
        // lines and CRLF terminators split across buffer refills
        let input = b">seq1 description\r\nACGTACGTAC\r\nACG\r\n\r\n>seq2\nACGTTGCA\n>seq3\nA";
        let reader = BufReader::with_capacity(3, Cursor::new(input.to_vec()));
        let got: Vec<SeqLength> = Reader::new(reader).collect::<Result<_, _>>().unwrap();
        let expected = vec![
            SeqLength { id: "seq1".to_string(), seq_len: 13 },
            SeqLength { id: "seq2".to_string(), seq_len: 8 },
            SeqLength { id: "seq3".to_string(), seq_len: 1 },
        ];
        assert_eq!(expected, got);
    }

    #[test]
    fn missing_header()
    {
        assert_eq!((1, FormatErrorKind::MissingHeader), format_error(b"ACGT\n>a\nA\n"));
        assert_eq!((3, FormatErrorKind::MissingHeader), format_error(b"\n \nACGT\n"));
    }

    #[test]
    fn missing_id()
    {
        assert_eq!((3, FormatErrorKind::MissingId), format_error(b">a\nAC\n>\nA\n"));
        assert_eq!((1, FormatErrorKind::MissingId), format_error(b"> a\nA\n"));
    }

    #[test]
    fn invalid_utf8()
    {
        assert_eq!((1, FormatErrorKind::InvalidUtf8), format_error(b">a\xff\nA\n"));
    }

    #[test]
    fn iterator_stops_after_error()
    {
        let mut reader = Reader::new(Cursor::new(">a\nAC\n>\nA\n>b\nA\n"));
        assert_eq!("a", reader.next().unwrap().unwrap().id);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn for_each()
    {
        let mut seen = Vec::new();
        let count = fasta_for_each(Cursor::new(">a\nAAAA\n>b x\nCC\nC\n"), |record| {
            seen.push(format!("{}\t{}", record.id(), record.seq_len()));
        })
        .unwrap();
        assert_eq!(2, count);
        assert_eq!(vec!["a\t4", "b\t3"], seen);
    }
}
