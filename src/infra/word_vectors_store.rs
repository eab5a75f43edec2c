// ============================================================
// Layer 6 — Word Vector Store
// ============================================================
// Reads and writes word vectors in the plain-text word2vec
// format understood by most embedding tools:
//
//   <n_words> <dim>
//   word v1 v2 ... v_dim
//   ...

use anyhow::{anyhow, bail, Context, Result};
use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::word_vectors::WordVectors;

pub struct WordVectorsStore {
    path: PathBuf,
}

impl WordVectorsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, vectors: &WordVectors) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Cannot create '{}'", self.path.display()))?;
        let mut out = BufWriter::new(file);

        writeln!(out, "{} {}", vectors.len(), vectors.dim())?;
        for (word, v) in vectors.iter() {
            write!(out, "{word}")?;
            for x in v {
                write!(out, " {x}")?;
            }
            writeln!(out)?;
        }
        out.flush()?;

        tracing::info!(
            "Saved {} word vectors to '{}'",
            vectors.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn load(&self) -> Result<WordVectors> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open word vectors '{}'", self.path.display()))?;
        let mut lines = BufReader::new(file).lines();

        let header = lines
            .next()
            .ok_or_else(|| anyhow!("'{}' is empty", self.path.display()))??;
        let (count, dim) = parse_header(&header)
            .with_context(|| format!("Bad header in '{}'", self.path.display()))?;

        let mut words   = Vec::with_capacity(count);
        let mut vectors = Vec::with_capacity(count * dim);
        for (n, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let word = fields.next().unwrap_or_default().to_string();
            let row: Vec<f32> = fields
                .map(str::parse)
                .collect::<Result<_, _>>()
                .with_context(|| format!("line {}: bad number", n + 2))?;
            if row.len() != dim {
                bail!("line {}: expected {} values, found {}", n + 2, dim, row.len());
            }
            words.push(word);
            vectors.extend(row);
        }

        if words.len() != count {
            bail!(
                "'{}' declares {} words but holds {}",
                self.path.display(),
                count,
                words.len()
            );
        }
        Ok(WordVectors::new(dim, words, vectors))
    }
}

fn parse_header(header: &str) -> Result<(usize, usize)> {
    let mut parts = header.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(count)), Some(Ok(dim)), None) => Ok((count, dim)),
        _ => bail!("expected '<n_words> <dim>', got '{header}'"),
    }
}
