use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
};

pub fn open_create_file<P>(path: P) -> Result<File, std::io::Error>
where
    P: AsRef<Path>,
{
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

pub fn write_file<P>(path: P, bytes: &[u8]) -> Result<(), std::io::Error>
where
    P: AsRef<Path>,
{
    let mut file = open_create_file(path)?;
    file.write_all(bytes)?;
    file.flush()
}
