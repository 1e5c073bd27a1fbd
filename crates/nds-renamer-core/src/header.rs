/// NDS ROM header access.
///
/// The cartridge header stores a 12-byte internal title at offset `0x00`
/// followed by the 4-byte game code at offset `0x0C`. Both come from a single
/// 16-byte read. Only the game code identifies a dump; the title is kept for
/// log context.
use crate::error::HeaderError;
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Byte offset of the game code in the cartridge header.
pub const GAME_CODE_OFFSET: u64 = 0x0C;

/// Length of the game code in bytes.
pub const GAME_CODE_LEN: usize = 4;

/// Smallest file that can carry a game code.
pub const MIN_HEADER_LEN: u64 = GAME_CODE_OFFSET + GAME_CODE_LEN as u64;

const TITLE_LEN: usize = 12;

/// A 4-character ASCII game code such as `AMCE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameCode(String);

impl GameCode {
    /// Validate raw header bytes. Returns `None` if any byte is not ASCII.
    pub fn from_bytes(bytes: [u8; GAME_CODE_LEN]) -> Option<Self> {
        if !bytes.is_ascii() {
            return None;
        }
        // ASCII is always valid UTF-8.
        Some(Self(bytes.iter().map(|&b| b as char).collect()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The leading fields of a cartridge header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomHeader {
    /// Internal title with NUL padding removed. Informational only.
    pub title: String,
    pub game_code: GameCode,
}

impl fmt::Display for GameCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read the game code from the ROM at `path`.
///
/// Files shorter than 16 bytes and codes containing non-ASCII bytes are
/// rejected.
pub fn read_game_code(path: &Path) -> Result<GameCode, HeaderError> {
    read_header(path).map(|header| header.game_code)
}

/// Read the title and game code with one read of the first 16 bytes.
pub fn read_header(path: &Path) -> Result<RomHeader, HeaderError> {
    let io_err = |source| HeaderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(io_err)?;
    let len = file.metadata().map_err(io_err)?.len();
    if len < MIN_HEADER_LEN {
        return Err(HeaderError::TooShort {
            path: path.to_path_buf(),
            len,
        });
    }

    let mut raw = [0u8; MIN_HEADER_LEN as usize];
    if let Err(err) = file.read_exact(&mut raw) {
        // The file shrank between the length check and the read.
        if err.kind() == ErrorKind::UnexpectedEof {
            return Err(HeaderError::TooShort {
                path: path.to_path_buf(),
                len,
            });
        }
        return Err(io_err(err));
    }

    let offset = GAME_CODE_OFFSET as usize;
    let mut bytes = [0u8; GAME_CODE_LEN];
    bytes.copy_from_slice(&raw[offset..offset + GAME_CODE_LEN]);
    let game_code = GameCode::from_bytes(bytes).ok_or_else(|| HeaderError::NotAscii {
        path: path.to_path_buf(),
        bytes,
    })?;

    let title = String::from_utf8_lossy(&raw[..TITLE_LEN]);
    Ok(RomHeader {
        title: title.trim_end_matches('\0').trim().to_string(),
        game_code,
    })
}
