use std::io::{self, Write};

/// Prints `.` per record, or the running count on every tenth, flushing each time.
pub struct ProgressReporter<W: Write> {
    out: W,
    count: usize,
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out, count: 0 }
    }

    pub fn tick(&mut self) -> io::Result<()> {
        self.count += 1;
        if self.count % 10 == 0 {
            write!(self.out, "{}", self.count)?;
        } else {
            write!(self.out, ".")?;
        }
        self.out.flush()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Summary lines. The first follows the progress marks on the same line.
    pub fn finish(&mut self) -> io::Result<()> {
        writeln!(self.out, "Done")?;
        writeln!(self.out, "Processed {} records", self.count)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(records: usize) -> String {
        let mut progress = ProgressReporter::new(Vec::new());
        for _ in 0..records {
            progress.tick().unwrap();
        }
        progress.finish().unwrap();
        String::from_utf8(progress.into_inner()).unwrap()
    }

    #[test]
    fn test_twenty_five_records() {
        assert_eq!(
            render(25),
            format!(
                "{}10{}20{}Done\nProcessed 25 records\n",
                ".".repeat(9),
                ".".repeat(9),
                ".".repeat(5)
            )
        );
    }

    #[test]
    fn test_zero_records() {
        assert_eq!(render(0), "Done\nProcessed 0 records\n");
    }

    #[test]
    fn test_count_tracks_ticks() {
        let mut progress = ProgressReporter::new(io::sink());
        for _ in 0..3 {
            progress.tick().unwrap();
        }
        assert_eq!(progress.count(), 3);
    }
}
