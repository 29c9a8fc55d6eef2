use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

pub fn file_writer<W>(w: W) -> BufWriter<W>
where
    W: Write,
{
    BufWriter::with_capacity(131_072, w)
}

pub fn path_exists(file_path: &Path) -> bool {
    file_path.exists() && file_path.is_file()
}

pub fn read_text_file(file_path: &Path) -> Result<String, std::io::Error> {
    let content = std::fs::read(file_path)?;
    debug!("Read {} bytes from {}", content.len(), file_path.display());
    Ok(String::from_utf8_lossy(&content).into_owned())
}

/// Writes every line followed by a newline, truncating an existing file.
pub fn write_lines<I, S>(file_path: &Path, lines: I) -> Result<(), std::io::Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = file_writer(File::create(file_path)?);
    for line in lines {
        writer.write_all(line.as_ref().as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
