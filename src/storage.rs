//! Saving and loading persisted values.
//!
//! Text saves are pretty-printed RON. Binary saves are bincode wrapped in a
//! zlib stream, the same layout the game uses for map files.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bevy::log::debug;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistFormat {
    Ron,
    Bincode,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("bincode failure: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("RON encoding failure: {0}")]
    RonEncode(#[from] ron::Error),

    #[error("RON decoding failure: {0}")]
    RonDecode(#[from] ron::error::SpannedError),
}

pub fn to_ron_string<T: Serialize + ?Sized>(value: &T) -> Result<String, PersistError> {
    Ok(ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())?)
}

pub fn from_ron_str<T: DeserializeOwned>(text: &str) -> Result<T, PersistError> {
    Ok(ron::from_str(text)?)
}

pub fn save_to_writer<W, T>(
    mut writer: W,
    value: &T,
    format: PersistFormat,
) -> Result<(), PersistError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    match format {
        PersistFormat::Ron => {
            let text = to_ron_string(value)?;
            writer.write_all(text.as_bytes())?;
        }
        PersistFormat::Bincode => {
            let mut encoder = ZlibEncoder::new(&mut writer, Compression::default());
            bincode::serialize_into(&mut encoder, value)?;
            encoder.finish()?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn load_from_reader<R, T>(mut reader: R, format: PersistFormat) -> Result<T, PersistError>
where
    R: Read,
    T: DeserializeOwned,
{
    match format {
        PersistFormat::Ron => {
            let mut text = String::new();
            reader.read_to_string(&mut text)?;
            from_ron_str(&text)
        }
        PersistFormat::Bincode => {
            let mut decoder = ZlibDecoder::new(reader);
            Ok(bincode::deserialize_from(&mut decoder)?)
        }
    }
}

pub fn save<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
    format: PersistFormat,
) -> Result<(), PersistError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    save_to_writer(BufWriter::new(file), value, format)?;
    debug!("Saved {:?} data to {}", format, path.display());
    Ok(())
}

pub fn load<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    format: PersistFormat,
) -> Result<T, PersistError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let value = load_from_reader(BufReader::new(file), format)?;
    debug!("Loaded {:?} data from {}", format, path.display());
    Ok(value)
}
